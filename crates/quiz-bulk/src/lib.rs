//! Quiz Bulk: question sets in and out of JSON and CSV
//!
//! Import never persists anything. It returns a [`BulkImportReport`] with a
//! save request for every accepted item and the findings for every rejected
//! one; the caller decides what to store.
//!
//! ```text
//! payload ─parse─▶ items ─┬─ decode ─ validate (save) ─ reconcile ─▶ accepted
//!                         └──────────── any error ──────────────────▶ rejected
//! ```

pub mod csv;
mod decode;
pub mod import;
pub mod json;
pub mod report;
pub mod tabular;

pub use import::ImportOptions;
pub use quiz_registry::FlattenOptions as TabularOptions;
pub use report::{AcceptedItem, BulkImportReport, ExportReport, RawItem, RejectedItem, SkippedRecord};

use quiz_authoring::Reconciler;
use quiz_core::{Question, QuizError};
use quiz_registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" | "tabular" => Ok(Format::Csv),
            other => Err(QuizError::Parse(format!("unknown format '{}'", other))),
        }
    }
}

/// Import/export bound to one validator configuration
#[derive(Debug, Clone)]
pub struct BulkCodec<'r> {
    reconciler: Reconciler<'r>,
    import: ImportOptions,
    tabular: TabularOptions,
}

impl BulkCodec<'static> {
    pub fn standard() -> Self {
        Self::new(Reconciler::standard())
    }
}

impl<'r> BulkCodec<'r> {
    pub fn new(reconciler: Reconciler<'r>) -> Self {
        Self {
            reconciler,
            import: ImportOptions::default(),
            tabular: TabularOptions::default(),
        }
    }

    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.import = options;
        self
    }

    pub fn with_tabular_options(mut self, options: TabularOptions) -> Self {
        self.tabular = options;
        self
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.reconciler.validator().registry()
    }

    pub fn export_json(&self, records: &[Question]) -> Result<String, QuizError> {
        json::export(records)
    }

    pub fn export_tabular(&self, records: &[Question]) -> ExportReport {
        tabular::export(records, self.registry(), &self.tabular)
    }

    pub fn export(&self, records: &[Question], format: Format) -> Result<ExportReport, QuizError> {
        match format {
            Format::Json => Ok(ExportReport {
                payload: self.export_json(records)?,
                exported: records.len(),
                skipped: Vec::new(),
            }),
            Format::Csv => Ok(self.export_tabular(records)),
        }
    }

    pub fn import_json(&self, payload: &str) -> Result<BulkImportReport, QuizError> {
        let items = json::parse_payload(payload)?;
        let registry = self.registry();
        let outcomes = import::run(&items, self.import.workers, |index, value| {
            let decoded = json::decode_item(value, registry);
            import::settle(&self.reconciler, index, decoded, || RawItem::Json(value.clone()))
        });
        let mut report = BulkImportReport {
            format: Format::Json,
            header: None,
            accepted: Vec::new(),
            rejected: Vec::new(),
        };
        import::collect(&mut report, outcomes);
        Ok(report)
    }

    pub fn import_tabular(&self, payload: &str) -> Result<BulkImportReport, QuizError> {
        let (header, rows) = tabular::parse_payload(payload)?;
        let registry = self.registry();
        let outcomes = import::run(&rows, self.import.workers, |index, cells| {
            let decoded = tabular::decode_row(&header, cells, registry);
            import::settle(&self.reconciler, index, decoded, || RawItem::Row(cells.clone()))
        });
        let mut report = BulkImportReport {
            format: Format::Csv,
            header: Some(header),
            accepted: Vec::new(),
            rejected: Vec::new(),
        };
        import::collect(&mut report, outcomes);
        Ok(report)
    }

    pub fn import(&self, payload: &str, format: Format) -> Result<BulkImportReport, QuizError> {
        match format {
            Format::Json => self.import_json(payload),
            Format::Csv => self.import_tabular(payload),
        }
    }
}

pub fn export_json(records: &[Question]) -> Result<String, QuizError> {
    json::export(records)
}

pub fn export_tabular(records: &[Question], options: &TabularOptions) -> ExportReport {
    tabular::export(records, TypeRegistry::global(), options)
}

pub fn import_json(payload: &str) -> Result<BulkImportReport, QuizError> {
    BulkCodec::standard().import_json(payload)
}

pub fn import_tabular(payload: &str) -> Result<BulkImportReport, QuizError> {
    BulkCodec::standard().import_tabular(payload)
}

pub fn import(payload: &str, format: Format) -> Result<BulkImportReport, QuizError> {
    BulkCodec::standard().import(payload, format)
}
