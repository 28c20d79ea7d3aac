//! JSON Lines dataset with a byte-offset index.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{Dataset, PageRecord, Validity};
use crate::error::{Error, Result};
use crate::page::RawPage;

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    offset: u64,
    size: usize,
}

/// A dataset over a JSON Lines file, one `PageRecord` object per line.
///
/// Construction scans the file once and records the byte offset and length
/// of every valid record; page content is only read back from disk on
/// `get`, so the corpus never has to fit in memory. Malformed lines are
/// logged and skipped; on duplicate URLs the later record wins.
#[derive(Debug)]
pub struct JsonLinesDataset {
    path: PathBuf,
    index: BTreeMap<String, IndexEntry>,
}

impl JsonLinesDataset {
    /// Scans `path` and builds the offset index.
    ///
    /// # Errors
    ///
    /// `Error::Io` when the file cannot be opened or read.
    pub fn open(path: impl AsRef<Path>, validity: Validity) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let mut index = BTreeMap::new();
        let mut offset = 0u64;
        let mut n_lines = 0usize;
        let mut n_skipped = 0usize;
        let mut line = String::new();

        loop {
            line.clear();
            let n_read = reader.read_line(&mut line)?;
            if n_read == 0 {
                break;
            }
            n_lines += 1;
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if !trimmed.trim().is_empty() {
                match serde_json::from_str::<PageRecord>(trimmed) {
                    Ok(record) if validity.is_valid(&record) => {
                        index.insert(
                            record.url,
                            IndexEntry {
                                offset,
                                size: trimmed.len(),
                            },
                        );
                    }
                    Ok(_) => n_skipped += 1,
                    Err(err) => {
                        n_skipped += 1;
                        warn!(line = n_lines, %err, "skipping malformed record");
                    }
                }
            }
            offset += n_read as u64;
        }

        info!(
            path = %path.display(),
            n_lines,
            n_indexed = index.len(),
            n_skipped,
            "indexed dataset file"
        );
        Ok(Self { path, index })
    }
}

impl Dataset for JsonLinesDataset {
    fn urls(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    fn get(&self, url: &str) -> Result<RawPage> {
        let Some(entry) = self.index.get(url) else {
            return Err(Error::UnknownUrl(url.to_string()));
        };
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.size];
        file.read_exact(&mut buf)?;
        let record: PageRecord = serde_json::from_slice(&buf)?;
        Ok(RawPage::new(record.url, record.content))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
