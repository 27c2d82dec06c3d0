//! Bulk import
//!
//! Every item is decoded, validated for save and reconciled on its own, so
//! one bad item never affects another. Items are spread over scoped worker
//! threads; the report is always in input order.

use crate::decode::{covered_by, unknown_type, Decoded};
use crate::report::{AcceptedItem, BulkImportReport, RawItem, RejectedItem};
use quiz_authoring::{Reconciler, SaveError};
use quiz_core::Finding;
use serde::{Deserialize, Serialize};
use std::thread;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Worker threads; 1 processes items on the calling thread
    pub workers: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }
}

impl ImportOptions {
    pub fn sequential() -> Self {
        Self { workers: 1 }
    }
}

pub(crate) enum Outcome {
    Accepted(AcceptedItem),
    Rejected(RejectedItem),
}

/// Validate and reconcile one decoded item; `raw` is only built on rejection
pub(crate) fn settle<R>(reconciler: &Reconciler<'_>, index: usize, decoded: Decoded, raw: R) -> Outcome
where
    R: FnOnce() -> RawItem,
{
    match check(reconciler, index, decoded) {
        Ok(item) => Outcome::Accepted(item),
        Err(findings) => Outcome::Rejected(RejectedItem {
            index,
            findings,
            raw: raw(),
        }),
    }
}

fn check(reconciler: &Reconciler<'_>, index: usize, decoded: Decoded) -> Result<AcceptedItem, Vec<Finding>> {
    let Some(draft) = decoded.draft else { return Err(decoded.findings) };
    let mut findings = decoded.findings;

    match reconciler.reconcile(&draft, decoded.existing.as_ref()) {
        Ok((record, result)) if findings.is_empty() => Ok(AcceptedItem {
            index,
            record,
            warnings: result.findings,
        }),
        Ok((_, result)) | Err(SaveError::Invalid(result)) => {
            // Validation findings on fields that failed to decode only repeat the problem.
            let decoded_fields: Vec<String> = findings.iter().map(|f| f.field.clone()).collect();
            findings.extend(
                result
                    .findings
                    .into_iter()
                    .filter(|f| !decoded_fields.iter().any(|d| covered_by(d, &f.field))),
            );
            Err(findings)
        }
        Err(SaveError::Engine(e)) => {
            findings.push(unknown_type(&e));
            Err(findings)
        }
    }
}

/// Run `process` over every item on up to `workers` threads, in input order
pub(crate) fn run<T, F>(items: &[T], workers: usize, process: F) -> Vec<Outcome>
where
    T: Sync,
    F: Fn(usize, &T) -> Outcome + Sync,
{
    let workers = workers.clamp(1, items.len().max(1));
    if workers == 1 {
        return items.iter().enumerate().map(|(i, item)| process(i, item)).collect();
    }

    let chunk = (items.len() + workers - 1) / workers;
    let process = &process;
    let mut outcomes: Vec<(usize, Outcome)> = thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk)
            .enumerate()
            .map(|(c, slice)| {
                scope.spawn(move || {
                    slice
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            let index = c * chunk + i;
                            (index, process(index, item))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Fold outcomes into a report
pub(crate) fn collect(report: &mut BulkImportReport, outcomes: Vec<Outcome>) {
    for outcome in outcomes {
        match outcome {
            Outcome::Accepted(item) => report.accepted.push(item),
            Outcome::Rejected(item) => {
                warn!(
                    index = item.index,
                    errors = item.findings.iter().filter(|f| f.is_error()).count(),
                    first = item.findings.first().map(|f| f.rule_id.as_str()).unwrap_or(""),
                    "import item rejected"
                );
                report.rejected.push(item);
            }
        }
    }
    info!(
        format = %report.format,
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "bulk import finished"
    );
}
