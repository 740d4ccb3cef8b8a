use getset::{CopyGetters, Getters};
use log::debug;

use crate::{
    catalog::{CanonicalCatalog, InventoryCatalog},
    schema::EpisodeNumber,
};

/// A held episode whose file name differs from the canonical one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FilenameMismatch {
    pub episode_number: EpisodeNumber,
    pub expected: String,
    pub actual: String,
}

/// An episode held as more than one file. File names of such episodes are not checked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DuplicateNotice {
    pub episode_number: EpisodeNumber,
    pub count: usize,
}

#[derive(Debug, CopyGetters, Getters)]
pub struct Reconciliation {
    #[getset(get_copy = "pub")]
    canonical_len: usize,
    #[getset(get_copy = "pub")]
    inventory_len: usize,
    /// Canonical episodes without any inventory record, ascending.
    #[getset(get = "pub")]
    missing: Vec<EpisodeNumber>,
    #[getset(get = "pub")]
    mismatches: Vec<FilenameMismatch>,
    #[getset(get = "pub")]
    duplicates: Vec<DuplicateNotice>,
}

impl Reconciliation {
    /// Inventory records over canonical records.
    /// Duplicate files count individually, so this can exceed what is actually held.
    pub fn completion_ratio(&self) -> f64 {
        if self.canonical_len == 0 {
            return 0.0;
        }
        self.inventory_len as f64 / self.canonical_len as f64
    }
}

pub fn reconcile(canonical: &CanonicalCatalog, inventory: &InventoryCatalog) -> Reconciliation {
    let mut missing = vec![];
    let mut mismatches = vec![];
    let mut duplicates = vec![];
    for expected in canonical.iter() {
        let episode_number = expected.episode_number();
        match inventory.get(episode_number) {
            [] => missing.push(episode_number),
            [held] => {
                if held.filename() != expected.filename() {
                    mismatches.push(FilenameMismatch {
                        episode_number,
                        expected: expected.filename().clone(),
                        actual: held.filename().clone(),
                    });
                }
            }
            held => duplicates.push(DuplicateNotice {
                episode_number,
                count: held.len(),
            }),
        }
    }
    debug!(
        "{} missing, {} mismatches, {} duplicates",
        missing.len(),
        mismatches.len(),
        duplicates.len()
    );
    Reconciliation {
        canonical_len: canonical.len(),
        inventory_len: inventory.len(),
        missing,
        mismatches,
        duplicates,
    }
}

/// Canonical episodes without any inventory record, ascending.
pub fn missing(canonical: &CanonicalCatalog, inventory: &InventoryCatalog) -> Vec<EpisodeNumber> {
    canonical
        .iter()
        .map(|record| record.episode_number())
        .filter(|&number| !inventory.contains(number))
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        catalog::{
            tests::{record, renamed},
            CanonicalCatalog, InventoryCatalog,
        },
        schema::EpisodeNumber,
    };

    use super::{missing, reconcile, DuplicateNotice};

    fn numbers(numbers: &[EpisodeNumber]) -> Vec<u32> {
        numbers.iter().map(|n| n.get()).collect_vec()
    }

    #[test]
    fn missing_episodes() {
        let canonical =
            CanonicalCatalog::new([record(1, "a"), record(2, "b"), record(3, "c")]).unwrap();
        let inventory = InventoryCatalog::new([record(3, "c"), record(1, "a")]);
        let result = reconcile(&canonical, &inventory);
        assert_eq!(numbers(result.missing()), [2]);
        assert_eq!(numbers(&missing(&canonical, &inventory)), [2]);
        assert!(result.mismatches().is_empty());
        assert!(result.duplicates().is_empty());
    }

    #[test]
    fn mismatch_is_not_missing() {
        let canonical = CanonicalCatalog::new([record(1, "a"), record(2, "b")]).unwrap();
        let inventory = InventoryCatalog::new([record(1, "a"), renamed(2, "Tatort - 2 - typo")]);
        let result = reconcile(&canonical, &inventory);
        assert!(result.missing().is_empty());
        assert_eq!(result.mismatches().len(), 1);
        let mismatch = &result.mismatches()[0];
        assert_eq!(mismatch.episode_number.get(), 2);
        assert_eq!(mismatch.expected, *record(2, "b").filename());
        assert_eq!(mismatch.actual, "Tatort - 2 - typo");
    }

    #[test]
    fn duplicates_skip_mismatch() {
        let canonical = CanonicalCatalog::new([record(10, "x"), record(11, "y")]).unwrap();
        let inventory = InventoryCatalog::new([
            renamed(10, "Tatort - 10 - first copy"),
            renamed(10, "Tatort - 10 - second copy"),
        ]);
        let result = reconcile(&canonical, &inventory);
        assert_eq!(
            result.duplicates(),
            &[DuplicateNotice {
                episode_number: EpisodeNumber::try_from(10).unwrap(),
                count: 2
            }]
        );
        assert!(result.mismatches().is_empty());
        assert_eq!(numbers(result.missing()), [11]);
    }

    #[test]
    fn completion_ratio() {
        let canonical = CanonicalCatalog::new((1..=200).map(|n| record(n, "t"))).unwrap();
        let inventory = InventoryCatalog::new((1..=150).map(|n| record(n, "t")));
        let result = reconcile(&canonical, &inventory);
        assert_eq!(result.completion_ratio(), 0.75);
        assert_eq!(result.missing().len(), 50);

        // Duplicates inflate the ratio.
        let inventory = InventoryCatalog::new((1..=200).chain(1..=50).map(|n| record(n, "t")));
        assert_eq!(reconcile(&canonical, &inventory).completion_ratio(), 1.25);

        let empty = reconcile(&CanonicalCatalog::default(), &InventoryCatalog::default());
        assert_eq!(empty.completion_ratio(), 0.0);
    }
}
