//! Import and export reports

use crate::{csv, Format};
use quiz_authoring::SaveRequest;
use quiz_core::{Finding, QuestionId, QuizError};
use serde::{Deserialize, Serialize};

/// An item as it appeared in the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    Json(serde_json::Value),
    /// Cells in header order
    Row(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedItem {
    pub index: usize,
    pub record: SaveRequest,
    pub warnings: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub index: usize,
    pub findings: Vec<Finding>,
    pub raw: RawItem,
}

/// Outcome of one bulk import, items in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkImportReport {
    pub format: Format,
    /// Column names for tabular payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
    pub accepted: Vec<AcceptedItem>,
    pub rejected: Vec<RejectedItem>,
}

impl BulkImportReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &SaveRequest> {
        self.accepted.iter().map(|item| &item.record)
    }

    /// The rejected items re-serialized in the payload's own format, ready
    /// to be corrected and imported again
    pub fn rejected_payload(&self) -> Result<String, QuizError> {
        match self.format {
            Format::Json => {
                let items: Vec<&RawItem> = self.rejected.iter().map(|item| &item.raw).collect();
                serde_json::to_string_pretty(&items)
                    .map_err(|e| QuizError::Parse(format!("json: {}", e)))
            }
            Format::Csv => {
                let mut out = String::new();
                if let Some(header) = &self.header {
                    csv::write_row(&mut out, header);
                }
                for item in &self.rejected {
                    if let RawItem::Row(cells) = &item.raw {
                        csv::write_row(&mut out, cells);
                    }
                }
                Ok(out)
            }
        }
    }

    pub fn summary(&self) -> String {
        let warnings: usize = self.accepted.iter().map(|item| item.warnings.len()).sum();
        format!(
            "{} items: {} accepted ({} warnings), {} rejected",
            self.total(),
            self.accepted.len(),
            warnings,
            self.rejected.len()
        )
    }
}

/// A record left out of a tabular export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: QuestionId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub payload: String,
    pub exported: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejected(index: usize, raw: RawItem) -> RejectedItem {
        RejectedItem {
            index,
            findings: vec![Finding::error("type.required", "type", "Choose a question type")],
            raw,
        }
    }

    #[test]
    fn test_rejected_payload_json() {
        let report = BulkImportReport {
            format: Format::Json,
            header: None,
            accepted: vec![],
            rejected: vec![rejected(1, RawItem::Json(json!({ "title": "No type" })))],
        };
        let payload = report.rejected_payload().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value, json!([{ "title": "No type" }]));
        assert_eq!(report.summary(), "1 items: 0 accepted (0 warnings), 1 rejected");
    }

    #[test]
    fn test_rejected_payload_csv() {
        let report = BulkImportReport {
            format: Format::Csv,
            header: Some(vec!["type".to_string(), "title".to_string()]),
            accepted: vec![],
            rejected: vec![rejected(0, RawItem::Row(vec![String::new(), "a, b".to_string()]))],
        };
        assert_eq!(report.rejected_payload().unwrap(), "type,title\n,\"a, b\"\n");
    }
}
