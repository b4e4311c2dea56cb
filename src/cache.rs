use std::sync::Arc;

use crate::data::loader::{parse_csv, Upload};
use crate::data::model::Table;
use crate::error::DashboardResult;

// ---------------------------------------------------------------------------
// Parsed-upload cache
// ---------------------------------------------------------------------------

/// Remembers the table parsed from the most recent upload, keyed by the
/// upload's content digest. A different upload replaces the entry.
#[derive(Debug, Default)]
pub struct UploadCache {
    entry: Option<(String, Arc<Table>)>,
    misses: usize,
}

impl UploadCache {
    /// Return the parsed table for `upload`, parsing only on a digest change.
    /// Failed parses are not cached.
    pub fn get_or_parse(&mut self, upload: &Upload) -> DashboardResult<Arc<Table>> {
        if let Some((digest, table)) = &self.entry {
            if *digest == upload.digest {
                log::debug!("Parse cache hit for {}", upload.name);
                return Ok(Arc::clone(table));
            }
        }

        log::debug!("Parse cache miss for {} ({})", upload.name, upload.digest);
        self.misses += 1;
        self.entry = None;
        let table = Arc::new(parse_csv(&upload.bytes)?);
        log::info!(
            "Loaded {} with {} rows and {} columns",
            upload.name,
            table.n_rows(),
            table.n_columns()
        );
        self.entry = Some((upload.digest.clone(), Arc::clone(&table)));
        Ok(table)
    }

    /// Number of parses performed so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
