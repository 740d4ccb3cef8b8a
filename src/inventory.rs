use std::path::Path;

use anyhow::Context;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    catalog::InventoryCatalog,
    filename::{is_supplemental, parse_filename, FilenameParseError},
};

/// An inventory line that could not be decoded. It is reported and left out of the catalog.
#[derive(Debug)]
pub struct UnparsedEntry {
    pub entry: String,
    pub reason: FilenameParseError,
}

#[derive(Debug)]
pub struct Inventory {
    pub catalog: InventoryCatalog,
    pub unparsed: Vec<UnparsedEntry>,
    /// Directory placeholders and accompanying files that were skipped.
    pub supplemental: usize,
}

/// Decodes a newline separated file list.
pub fn parse_file_list(content: &str) -> Inventory {
    let mut records = vec![];
    let mut unparsed = vec![];
    let mut supplemental = 0;
    for entry in content.lines().map(str::trim_end) {
        if entry.is_empty() {
            continue;
        }
        if is_supplemental(entry) {
            debug!("Skipping supplemental entry {entry:?}");
            supplemental += 1;
            continue;
        }
        match parse_filename(entry) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("Could not match {entry:?}: {reason}");
                unparsed.push(UnparsedEntry {
                    entry: entry.to_owned(),
                    reason,
                });
            }
        }
    }
    Inventory {
        catalog: InventoryCatalog::new(records),
        unparsed,
        supplemental,
    }
}

pub fn read_file_list(path: &Path) -> anyhow::Result<Inventory> {
    let content = fs_err::read_to_string(path)
        .with_context(|| format!("While reading the inventory list {path:?}"))?;
    Ok(parse_file_list(&content))
}

/// Names of the entries of a directory, sorted.
pub fn list_directory(directory: &Path) -> anyhow::Result<Vec<String>> {
    let names = fs_err::read_dir(directory)?
        .map(|entry| -> anyhow::Result<String> {
            let name = entry?.file_name();
            name.into_string()
                .map_err(|name| anyhow::anyhow!("File name is not valid UTF-8: {name:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    info!("Found {} entries in {directory:?}", names.len());
    Ok(names.into_iter().sorted().collect())
}

pub fn format_file_list(names: &[String]) -> String {
    names.iter().map(|name| format!("{name}\n")).collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{filename::FilenameParseError, schema::EpisodeNumber};

    use super::{format_file_list, parse_file_list};

    const LIST: &str = "\
./
../
.
..
Tatort - 001 - 1970-11-29 - Trimmel (1) - Taxi nach Leipzig.avi
Tatort - 001 - 1970-11-29 - Trimmel (1) - Taxi nach Leipzig.srt
Tatort - 2 - 1971-05-31 - Konrad - Frankfurter Gold.mkv\r
Tatort - 010a - 1971-09-12 - Trimmel (10) - Exklusiv.mp4
Tatort - 010b - 1971-09-12 - Trimmel (10) - Exklusiv.mp4
Tatort - 010b - 1971-09-12 - Trimmel (10) - Exklusiv.ttml
Polizeiruf 110 - Der Fall Lisa Murnau.avi

";

    #[test]
    fn parse_list() {
        let inventory = parse_file_list(LIST);
        assert_eq!(inventory.supplemental, 6);
        assert_eq!(inventory.catalog.len(), 4);
        assert_eq!(
            inventory
                .catalog
                .iter()
                .map(|r| r.episode_number().get())
                .collect_vec(),
            [1, 2, 10, 10]
        );
        assert_eq!(
            inventory
                .catalog
                .get(EpisodeNumber::try_from(2).unwrap())[0]
                .filename(),
            "Tatort - 2 - 1971-05-31 - Konrad - Frankfurter Gold"
        );
        assert_eq!(inventory.unparsed.len(), 1);
        assert_eq!(
            inventory.unparsed[0].entry,
            "Polizeiruf 110 - Der Fall Lisa Murnau.avi"
        );
        assert_eq!(inventory.unparsed[0].reason, FilenameParseError::PatternMismatch);
    }

    #[test]
    fn supplemental_only() {
        let inventory = parse_file_list(".\n..\nfoo.srt\nbar.ttml\n");
        assert!(inventory.catalog.is_empty());
        assert!(inventory.unparsed.is_empty());
        assert_eq!(inventory.supplemental, 4);
    }

    #[test]
    fn format_list() {
        let names = vec!["b".to_owned(), "a".to_owned()];
        assert_eq!(format_file_list(&names), "b\na\n");
        assert_eq!(parse_file_list(&format_file_list(&[])).catalog.len(), 0);
    }
}
