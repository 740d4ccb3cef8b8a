//! Summaries of missing episodes.
//!
//! Missing values are shown one higher than stored, treating them as zero-based positions
//! in a list starting at episode 1. For a catalog whose numbering is not contiguous from 1
//! the printed numbers are off.

use std::fmt::Display;

use itertools::Itertools;

use crate::{catalog::CanonicalCatalog, schema::EpisodeNumber};

/// A maximal run of consecutive missing values, both ends inclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Gap {
    pub first: u32,
    pub last: u32,
}

impl Gap {
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

pub fn display_number(value: u32) -> u64 {
    u64::from(value) + 1
}

impl Display for Gap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "{:4},", display_number(self.first))
        } else {
            write!(
                f,
                "{:4} - {:4},",
                display_number(self.first),
                display_number(self.last)
            )
        }
    }
}

/// Groups ascending, distinct values into runs of consecutive values.
pub fn group_runs(values: impl IntoIterator<Item = u32>) -> Vec<Gap> {
    values
        .into_iter()
        .enumerate()
        .chunk_by(|&(i, value)| i64::from(value) - i as i64)
        .into_iter()
        .filter_map(|(_, run)| {
            let (first, last) = run.map(|(_, value)| value).minmax().into_option()?;
            Some(Gap { first, last })
        })
        .collect()
}

/// All runs on one line, e.g. `   1 -    3,   6,   8 -    9,`.
pub fn render_compact(gaps: &[Gap]) -> String {
    gaps.iter().join("")
}

/// One padded display number per missing episode.
pub fn render_terse(missing: &[EpisodeNumber]) -> impl Iterator<Item = String> + '_ {
    missing
        .iter()
        .map(|number| format!("{:4}", display_number(number.get())))
}

/// The canonical file name of every missing episode.
pub fn render_verbose<'a>(
    missing: &'a [EpisodeNumber],
    canonical: &'a CanonicalCatalog,
) -> impl Iterator<Item = &'a str> + 'a {
    missing
        .iter()
        .filter_map(|&number| canonical.get(number))
        .map(|record| record.filename().as_str())
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{
        catalog::{tests::record, CanonicalCatalog},
        schema::EpisodeNumber,
    };

    use super::{display_number, group_runs, render_compact, render_terse, render_verbose, Gap};

    #[test]
    fn runs() {
        let gaps = group_runs([0, 1, 2, 5, 7, 8]);
        assert_eq!(
            gaps,
            [
                Gap { first: 0, last: 2 },
                Gap { first: 5, last: 5 },
                Gap { first: 7, last: 8 },
            ]
        );
        assert_eq!(gaps.iter().map(Gap::len).collect_vec(), [3, 1, 2]);
        assert_eq!(render_compact(&gaps), "   1 -    3,   6,   8 -    9,");
    }

    #[test]
    fn singleton() {
        let gaps = group_runs([4]);
        assert_eq!(gaps, [Gap { first: 4, last: 4 }]);
        assert_eq!(render_compact(&gaps), "   5,");
        assert_eq!(render_compact(&gaps).trim(), "5,");
    }

    #[test]
    fn largest_value() {
        assert_eq!(display_number(u32::MAX), 4_294_967_296);
        let gaps = group_runs([u32::MAX - 1, u32::MAX]);
        assert_eq!(render_compact(&gaps), "4294967295 - 4294967296,");
    }

    #[test]
    fn empty() {
        assert!(group_runs([]).is_empty());
        assert_eq!(render_compact(&[]), "");
    }

    #[test]
    fn terse_and_verbose() {
        let canonical = CanonicalCatalog::new([record(1, "a"), record(2, "b")]).unwrap();
        let missing = [EpisodeNumber::try_from(2).unwrap()];
        assert_eq!(render_terse(&missing).collect_vec(), ["   3"]);
        assert_eq!(
            render_verbose(&missing, &canonical).collect_vec(),
            ["Tatort - 002 - 1970-01-03 - Trimmel (2) - b"]
        );
    }
}
