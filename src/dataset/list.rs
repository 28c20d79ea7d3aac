//! In-memory dataset over a list of records.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Dataset, PageRecord, Validity};
use crate::error::{Error, Result};
use crate::page::RawPage;

/// A dataset backed by an in-memory list of records.
///
/// Suited to tests and small corpora that already live in memory. Records
/// failing the validity checks are dropped at construction; later records
/// win on duplicate URLs.
#[derive(Debug)]
pub struct ListDataset {
    records: Vec<PageRecord>,
    index: BTreeMap<String, usize>,
}

impl ListDataset {
    /// Builds the dataset, indexing only valid records.
    #[must_use]
    pub fn new(records: Vec<PageRecord>, validity: Validity) -> Self {
        let mut index = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            if validity.is_valid(record) {
                index.insert(record.url.clone(), position);
            }
        }
        debug!(
            n_records = records.len(),
            n_indexed = index.len(),
            "indexed in-memory dataset"
        );
        Self { records, index }
    }
}

impl Dataset for ListDataset {
    fn urls(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    fn get(&self, url: &str) -> Result<RawPage> {
        let Some(&position) = self.index.get(url) else {
            return Err(Error::UnknownUrl(url.to_string()));
        };
        let record = &self.records[position];
        Ok(RawPage::new(record.url.clone(), record.content.clone()))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
