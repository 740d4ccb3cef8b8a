use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use chrono::NaiveDate;
use log::info;
use scraper::Html;

use crate::{
    episode_list_parser::{self, SourceStructureError},
    inventory::{self, UnparsedEntry},
    schema::{EpisodeNumber, EpisodeRecord},
};

/// Episodes as listed by the episode list: exactly one record per episode number.
#[derive(Debug, Default)]
pub struct CanonicalCatalog {
    records: BTreeMap<EpisodeNumber, EpisodeRecord>,
}

impl CanonicalCatalog {
    pub fn new(
        records: impl IntoIterator<Item = EpisodeRecord>,
    ) -> Result<Self, SourceStructureError> {
        let mut map = BTreeMap::new();
        for record in records {
            let number = record.episode_number();
            if map.insert(number, record).is_some() {
                return Err(SourceStructureError::DuplicateEpisode(number));
            }
        }
        Ok(Self { records: map })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, number: EpisodeNumber) -> Option<&EpisodeRecord> {
        self.records.get(&number)
    }

    /// Records in ascending episode order.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.records.values()
    }

    pub fn find_by_title<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a EpisodeRecord> {
        let query = query.to_lowercase();
        self.iter()
            .filter(move |record| record.title().to_string().to_lowercase().contains(&query))
    }

    pub fn find_by_air_date(&self, date: NaiveDate) -> impl Iterator<Item = &EpisodeRecord> {
        self.iter().filter(move |record| record.air_date() == date)
    }
}

/// Episodes found on the storage device.
///
/// An episode number may hold several records: parts of a split episode, or duplicates.
#[derive(Debug, Default)]
pub struct InventoryCatalog {
    records: BTreeMap<EpisodeNumber, Vec<EpisodeRecord>>,
    len: usize,
}

impl InventoryCatalog {
    pub fn new(records: impl IntoIterator<Item = EpisodeRecord>) -> Self {
        let mut map = BTreeMap::<_, Vec<_>>::new();
        let mut len = 0;
        for record in records {
            map.entry(record.episode_number()).or_default().push(record);
            len += 1;
        }
        Self { records: map, len }
    }

    /// Number of records, not of distinct episodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, number: EpisodeNumber) -> &[EpisodeRecord] {
        self.records
            .get(&number)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, number: EpisodeNumber) -> bool {
        self.records.contains_key(&number)
    }

    /// Records in ascending episode order; records of the same episode keep their input order.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.records.values().flatten()
    }
}

/// Both views of the catalog for a single run.
#[derive(Debug)]
pub struct Catalogs {
    pub canonical: CanonicalCatalog,
    pub inventory: InventoryCatalog,
    /// Inventory lines that did not decode.
    pub unparsed: Vec<UnparsedEntry>,
}

impl Catalogs {
    pub fn load(episode_file: &Path, inventory_file: &Path) -> anyhow::Result<Self> {
        let canonical = load_canonical(episode_file)?;
        let inventory = inventory::read_file_list(inventory_file)?;
        info!(
            "Loaded {} episodes from {episode_file:?} and {} files from {inventory_file:?}",
            canonical.len(),
            inventory.catalog.len(),
        );
        Ok(Self {
            canonical,
            inventory: inventory.catalog,
            unparsed: inventory.unparsed,
        })
    }
}

pub fn load_canonical(episode_file: &Path) -> anyhow::Result<CanonicalCatalog> {
    let html = Html::parse_document(&fs_err::read_to_string(episode_file)?);
    let records = episode_list_parser::parse(&html)
        .with_context(|| format!("While parsing the episode list {episode_file:?}"))?;
    Ok(CanonicalCatalog::new(records)?)
}
