//! Tabular (CSV) layout
//!
//! One row per question. The header is the common columns followed by every
//! registered type's own columns; a row leaves the other types' columns
//! empty. Nested values use the sub-field encoding from `quiz_registry::flat`.

use crate::csv;
use crate::decode::{malformed, malformed_content, unknown_type, Decoded};
use crate::report::{ExportReport, SkippedRecord};
use quiz_core::{Difficulty, Draft, Finding, Hint, HintSequence, Question, QuestionId, QuizError};
use quiz_registry::flat::{self, CellReader, Cells, FlattenError, FlattenOptions};
use quiz_registry::TypeRegistry;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

pub const COMMON_COLUMNS: &[&str] = &[
    "id",
    "type",
    "title",
    "description",
    "difficulty",
    "topics",
    "tags",
    "xp_reward",
    "time_limit",
    "hints",
    "explanation",
    "is_public",
];

/// Full header for `registry`
pub fn header(registry: &TypeRegistry) -> Vec<&'static str> {
    COMMON_COLUMNS
        .iter()
        .copied()
        .chain(registry.columns())
        .collect()
}

#[derive(Debug, Error)]
enum RowError {
    #[error(transparent)]
    Flatten(#[from] FlattenError),
    #[error(transparent)]
    Engine(#[from] QuizError),
}

fn common_cells(question: &Question, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let data = &question.data;
    let hints = data
        .hints
        .iter()
        .map(|h| flat::pair(&h.cost_xp.to_string(), &flat::escape(&h.text)))
        .collect();
    Ok(vec![
        ("id", question.id.to_string()),
        ("type", data.question_type().as_str().to_string()),
        ("title", data.title.clone()),
        ("description", flat::encode_optional("description", &data.description)?),
        ("difficulty", data.difficulty.as_str().to_string()),
        ("topics", flat::encode_list("topics", data.topics.iter().map(String::as_str), opts)?),
        ("tags", flat::encode_list("tags", data.tags.iter().map(String::as_str), opts)?),
        ("xp_reward", data.xp_reward.to_string()),
        ("time_limit", flat::encode_number(data.time_limit)),
        ("hints", flat::join_pairs("hints", hints, opts)?),
        ("explanation", flat::encode_optional("explanation", &data.explanation)?),
        ("is_public", data.is_public.to_string()),
    ])
}

fn flatten_record(
    question: &Question,
    registry: &TypeRegistry,
    header: &[&'static str],
    opts: &FlattenOptions,
) -> Result<Vec<String>, RowError> {
    let entry = registry.entry(question.question_type())?;
    let mut cells: BTreeMap<&str, String> = common_cells(question, opts)?.into_iter().collect();
    cells.extend(entry.flatten(&question.data.content, opts)?);
    Ok(header
        .iter()
        .map(|column| cells.remove(column).unwrap_or_default())
        .collect())
}

/// Write `records` as CSV, skipping the ones that cannot be represented
pub fn export(records: &[Question], registry: &TypeRegistry, opts: &FlattenOptions) -> ExportReport {
    let header = header(registry);
    let mut payload = String::new();
    csv::write_row(&mut payload, &header);

    let mut exported = 0;
    let mut skipped = Vec::new();
    for (index, question) in records.iter().enumerate() {
        match flatten_record(question, registry, &header, opts) {
            Ok(row) => {
                csv::write_row(&mut payload, &row);
                exported += 1;
            }
            Err(e) => {
                warn!(index, id = %question.id, reason = %e, "record skipped in tabular export");
                skipped.push(SkippedRecord {
                    index,
                    id: question.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    ExportReport {
        payload,
        exported,
        skipped,
    }
}

/// Split a CSV payload into its header and data rows
pub fn parse_payload(payload: &str) -> Result<(Vec<String>, Vec<Vec<String>>), QuizError> {
    let mut records = csv::parse(payload)?.into_iter();
    let header: Vec<String> = records
        .next()
        .ok_or_else(|| QuizError::Parse("csv: payload has no header row".to_string()))?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if !header.iter().any(|h| h == "type") {
        return Err(QuizError::Parse("csv: header has no 'type' column".to_string()));
    }
    Ok((header, records.collect()))
}

fn parse_number<T: std::str::FromStr>(row: &CellReader<'_>, column: &str, field: &str, findings: &mut Vec<Finding>) -> Option<T> {
    let text = row.optional(column)?;
    match text.trim().parse::<T>() {
        Ok(n) => Some(n),
        Err(_) => {
            findings.push(malformed(field, format!("'{}' is not a whole number", text)));
            None
        }
    }
}

fn parse_hints(row: &CellReader<'_>, findings: &mut Vec<Finding>) -> HintSequence {
    let mut hints = HintSequence::new();
    let pairs = match row.pairs("hints") {
        Ok(pairs) => pairs,
        Err(e) => {
            findings.push(malformed("hints", e.to_string()));
            return hints;
        }
    };
    for (i, (cost, text)) in pairs.into_iter().enumerate() {
        match cost.trim().parse::<u32>() {
            Ok(cost) => hints.append(Hint::new(text, cost)),
            Err(_) => findings.push(malformed(
                format!("hints[{}].costXp", i),
                format!("'{}' is not a hint cost", cost),
            )),
        }
    }
    hints
}

/// Read one data row into a draft, collecting cell-level problems
pub(crate) fn decode_row(header: &[String], cells: &[String], registry: &TypeRegistry) -> Decoded {
    let mut findings = Vec::new();
    if cells.len() > header.len() {
        findings.push(malformed(
            "row",
            format!("{} cells for {} columns", cells.len(), header.len()),
        ));
    }
    let map: BTreeMap<String, String> = header.iter().cloned().zip(cells.iter().cloned()).collect();
    let row = CellReader::new(&map);

    let entry = match row.optional("type") {
        None => None,
        Some(tag) => match registry.resolve(tag.trim()) {
            Ok(entry) => Some(entry),
            Err(e) => return Decoded::rejected(vec![unknown_type(&e)]),
        },
    };

    let difficulty = row.optional("difficulty").and_then(|text| match text.parse::<Difficulty>() {
        Ok(d) => Some(d),
        Err(e) => {
            findings.push(malformed("difficulty", format!("{}", e)));
            None
        }
    });
    let is_public = match row.flag("is_public") {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            findings.push(malformed("isPublic", e.to_string()));
            false
        }
    };
    let content = entry.and_then(|entry| match entry.unflatten(&row) {
        Ok(content) => Some(content),
        Err(e) => {
            findings.push(malformed_content(e.to_string()));
            None
        }
    });

    let draft = Draft {
        question_type: entry.map(|e| e.kind),
        title: row.text("title"),
        description: row.optional("description"),
        difficulty,
        topics: row.list("topics").into_iter().collect(),
        tags: row.list("tags").into_iter().collect(),
        xp_reward: parse_number(&row, "xp_reward", "xpReward", &mut findings).unwrap_or(0),
        time_limit: parse_number(&row, "time_limit", "timeLimit", &mut findings),
        hints: parse_hints(&row, &mut findings),
        explanation: row.optional("explanation"),
        is_public,
        content,
    };
    let existing = row.optional("id").map(|id| QuestionId::new(id.trim()));
    Decoded::new(draft, existing, findings)
}
