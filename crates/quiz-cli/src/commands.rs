//! Subcommand implementations

use anyhow::{bail, Context as _, Result};
use quiz_authoring::{Reconciler, SaveRequest};
use quiz_bulk::{BulkCodec, BulkImportReport, Format, ImportOptions, TabularOptions};
use quiz_core::{has_role, Question, QuestionId, Role, ValidationLimits};
use quiz_validate::ContentValidator;
use std::fs;
use std::path::Path;
use tracing::info;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct Context {
    pub role: Role,
    pub limits: ValidationLimits,
    pub import: ImportOptions,
}

impl Context {
    pub fn load(role: Role, limits: Option<&Path>, workers: Option<usize>) -> Result<Self> {
        let limits = match limits {
            Some(path) => ValidationLimits::from_yaml(&read(path)?)?,
            None => ValidationLimits::default(),
        };
        let import = match workers {
            Some(workers) => ImportOptions { workers },
            None => ImportOptions::default(),
        };
        Ok(Self { role, limits, import })
    }

    fn codec(&self) -> BulkCodec<'static> {
        let validator = ContentValidator::standard().with_limits(self.limits.clone());
        BulkCodec::new(Reconciler::new(validator)).with_import_options(self.import)
    }

    fn require(&self, required: Role, action: &str) -> Result<()> {
        if !has_role(self.role, required) {
            bail!("{} requires the {} role, running as {}", action, required, self.role);
        }
        Ok(())
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn resolve_format(explicit: Option<Format>, path: &Path) -> Result<Format> {
    match explicit.or_else(|| Format::from_path(path)) {
        Some(format) => Ok(format),
        None => bail!("cannot tell the format of {}; pass --format", path.display()),
    }
}

fn tabular_options(max_sub_fields: Option<usize>) -> TabularOptions {
    match max_sub_fields {
        Some(0) => TabularOptions::unlimited(),
        Some(n) => TabularOptions { max_sub_fields: Some(n) },
        None => TabularOptions::default(),
    }
}

/// Accepted items as records. Items without an id keep an empty one, which
/// reads back as a create.
fn accepted_records(report: &BulkImportReport) -> Vec<Question> {
    report
        .records()
        .map(|request| match request {
            SaveRequest::Update(question) => question.clone(),
            SaveRequest::Create(data) => Question::new(QuestionId::new(""), data.clone()),
        })
        .collect()
}

/// Every command returns whether the whole input went through cleanly
pub fn validate(ctx: &Context, file: &Path, format: Option<Format>) -> Result<bool> {
    let format = resolve_format(format, file)?;
    let report = ctx.codec().import(&read(file)?, format)?;

    for item in &report.accepted {
        println!("item {}: ok", item.index);
        for finding in &item.warnings {
            println!("  {}", finding);
        }
    }
    for item in &report.rejected {
        println!("item {}: rejected", item.index);
        for finding in &item.findings {
            println!("  {}", finding);
        }
    }
    println!("{}", report.summary());
    Ok(report.is_clean())
}

pub fn import(ctx: &Context, file: &Path, format: Option<Format>, rejected_out: Option<&Path>) -> Result<bool> {
    ctx.require(Role::Creator, "import")?;
    let format = resolve_format(format, file)?;
    let report = ctx.codec().import(&read(file)?, format)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(path) = rejected_out {
        if !report.is_clean() {
            write(path, &report.rejected_payload()?)?;
            info!(path = %path.display(), rejected = report.rejected.len(), "rejected items written");
        }
    }
    Ok(report.is_clean())
}

pub fn convert(
    ctx: &Context,
    input: &Path,
    output: &Path,
    from: Option<Format>,
    to: Option<Format>,
    max_sub_fields: Option<usize>,
) -> Result<bool> {
    ctx.require(Role::Creator, "convert")?;
    let from = resolve_format(from, input)?;
    let to = resolve_format(to, output)?;

    let codec = ctx.codec().with_tabular_options(tabular_options(max_sub_fields));
    let report = codec.import(&read(input)?, from)?;
    let export = codec.export(&accepted_records(&report), to)?;
    write(output, &export.payload)?;

    println!(
        "{} -> {}: {} written, {} skipped, {} rejected",
        from,
        to,
        export.exported,
        export.skipped.len(),
        report.rejected.len()
    );
    for skipped in &export.skipped {
        println!("  skipped {} ({}): {}", skipped.index, skipped.id, skipped.reason);
    }
    Ok(report.is_clean() && export.is_complete())
}
