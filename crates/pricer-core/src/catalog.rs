//! Pricing catalog: the ordered, immutable list of priced models.
//!
//! Loaded once at startup from a CSV file with the columns
//! `model_name,price_per_token,provider,mmlu_score,model_size`.
//! The catalog is never mutated afterwards; share it behind an `Arc`.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::ModelRecord;

/// Minimum number of columns a data row must carry to become a record.
const REQUIRED_FIELDS: usize = 5;

/// Failure to load the catalog. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is empty or has no data rows")]
    Empty,
}

/// The ordered sequence of model records.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<ModelRecord>,
}

impl Catalog {
    /// Build a catalog from records already in memory (tests, fixtures).
    pub fn new(records: Vec<ModelRecord>) -> Self {
        Self { records }
    }

    /// Load the catalog from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Loading catalog from {}", path.display());
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            models = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog CSV from any reader. The first row is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = 0usize;
        let mut records = Vec::new();

        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            rows += 1;
            // +2: one for the header, one for 1-based line numbers
            let line = index + 2;
            if let Some(record) = parse_row(&row, line) {
                records.push(record);
            }
        }

        if rows == 0 {
            return Err(CatalogError::Empty);
        }

        Ok(Self { records })
    }

    /// All records, in catalog order.
    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose provider matches `provider`, case-insensitively.
    pub fn by_provider(&self, provider: &str) -> Vec<ModelRecord> {
        self.records
            .iter()
            .filter(|r| r.is_from(provider))
            .cloned()
            .collect()
    }

    /// Distinct provider tags, in the order they first appear.
    pub fn providers(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in &self.records {
            if !seen.iter().any(|p| p == &record.provider) {
                seen.push(record.provider.clone());
            }
        }
        seen
    }
}

/// Turn one CSV row into a record, or `None` if it must be skipped.
fn parse_row(row: &csv::StringRecord, line: usize) -> Option<ModelRecord> {
    if row.len() < REQUIRED_FIELDS {
        debug!(line, fields = row.len(), "Skipping short catalog row");
        return None;
    }

    let name = row.get(0)?;
    let price = match row.get(1)?.parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => p,
        _ => {
            warn!(line, model = name, value = row.get(1), "Skipping row with invalid price");
            return None;
        }
    };

    Some(ModelRecord {
        name: name.to_string(),
        price_per_unit: price,
        provider: row.get(2)?.to_string(),
        quality_score: parse_score(row.get(3)?),
        size_class: row.get(4)?.to_string(),
    })
}

/// `"N/A"`, empty, or unparsable scores are absent.
fn parse_score(raw: &str) -> Option<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("n/a") {
        return None;
    }
    raw.parse::<f64>().ok()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
