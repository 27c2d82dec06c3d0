//! quizctl: the file-based front-end to the authoring engine
//!
//! The engine never touches the filesystem or checks roles; this binary
//! does both and then hands payloads to `quiz-bulk`.

mod commands;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quiz_bulk::Format;
use quiz_core::{Role, ENGINE_VERSION};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "quizctl", version = ENGINE_VERSION, about = "Validate, import and convert question sets")]
struct Cli {
    /// Role of the person running the command
    #[arg(long, global = true, default_value = "creator")]
    role: Role,

    /// YAML file overriding the validation limits
    #[arg(long, global = true)]
    limits: Option<PathBuf>,

    /// Worker threads for validation (defaults to available parallelism)
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every question in a file and list the findings
    Validate {
        file: PathBuf,

        /// json or csv; guessed from the extension when omitted
        #[arg(long)]
        format: Option<Format>,
    },

    /// Validate a file and print the import report as JSON
    Import {
        file: PathBuf,

        #[arg(long)]
        format: Option<Format>,

        /// Write the rejected items here, in the input format
        #[arg(long)]
        rejected_out: Option<PathBuf>,
    },

    /// Rewrite a question set in the other format
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Input format; guessed from the extension when omitted
        #[arg(long)]
        from: Option<Format>,

        /// Output format; guessed from the output extension when omitted
        #[arg(long)]
        to: Option<Format>,

        /// Sub-field cap per CSV cell; 0 removes the cap
        #[arg(long)]
        max_sub_fields: Option<usize>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init_tracing();

    let ctx = Context::load(cli.role, cli.limits.as_deref(), cli.workers)?;
    let clean = match cli.command {
        Command::Validate { file, format } => commands::validate(&ctx, &file, format),
        Command::Import {
            file,
            format,
            rejected_out,
        } => commands::import(&ctx, &file, format, rejected_out.as_deref()),
        Command::Convert {
            input,
            output,
            from,
            to,
            max_sub_fields,
        } => commands::convert(&ctx, &input, &output, from, to, max_sub_fields),
    }?;
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
