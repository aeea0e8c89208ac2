//! Annotext: compact, versioned JSON for annotated text.
//!
//! An annotated-text document is a string plus named attributes describing
//! spans of it: tokens, sentences, entities, translations, and so on. This
//! crate provides the in-memory model for such documents and the JSON codec
//! that reads and writes them.
//!
//! The codec writes element types once per collection rather than once per
//! element, keeps any JSON member it does not understand, and reads every
//! document version back to 1.0, upgrading legacy entity data on the way in.
//!
//! # Modules
//!
//! - [`model`]: attribute types, collections, the type registry and the document
//! - [`codec`]: JSON encoding and decoding, and the version gate
//! - [`migrate`]: rewriting legacy entity data into the current model
//! - [`validation`]: document validation and error reporting
//! - [`inspect`]: document summaries
//! - [`error`]: error types for annotext operations

pub mod codec;
pub mod error;
pub mod inspect;
pub mod migrate;
pub mod model;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use codec::{
    from_json_slice, from_json_str, read_document, to_json_string, to_json_string_pretty,
    write_document,
};
pub use error::AnnotextError;
pub use model::AnnotatedText;

/// The annotext CLI application.
#[derive(Parser)]
#[command(name = "annotext")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Decode and validate a document.
    Check(CheckArgs),
    /// Rewrite a document in the current format version.
    Upgrade(UpgradeArgs),
    /// Summarize a document's attributes and entities.
    Inspect(InspectArgs),
}

/// Report output style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Document to check.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

#[derive(clap::Args)]
struct UpgradeArgs {
    /// Document to upgrade.
    input: PathBuf,

    /// Where to write the upgraded document.
    #[arg(short, long)]
    output: PathBuf,

    /// Indent the written JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Document to inspect.
    input: PathBuf,

    /// Number of entity types to show.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Run the annotext CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AnnotextError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Upgrade(args)) => run_upgrade(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("annotext {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Compact, versioned JSON for annotated text.");
            println!();
            println!("Run 'annotext --help' for usage information.");
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AnnotextError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), AnnotextError> {
    let document = codec::read_document(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_document(&document, &opts);

    match args.format {
        ReportFormat::Json => print_json(&report.summary())?,
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(AnnotextError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the upgrade subcommand.
fn run_upgrade(args: UpgradeArgs) -> Result<(), AnnotextError> {
    let (document, report) = codec::read_document_with_report(&args.input)?;
    codec::write_document(&args.output, &document, args.pretty)?;

    if report.migrated() {
        println!(
            "Upgraded {} -> {} (format {})",
            args.input.display(),
            args.output.display(),
            codec::CURRENT_VERSION
        );
    } else {
        println!(
            "Rewrote {} -> {} (already on the current entity model)",
            args.input.display(),
            args.output.display()
        );
    }
    print!("{}", report);
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), AnnotextError> {
    let (document, migration) = codec::read_document_with_report(&args.input)?;
    let opts = inspect::InspectOptions {
        top_labels: args.top,
        ..Default::default()
    };
    let report = inspect::inspect_document(&document, migration.from, &opts);

    match args.format {
        ReportFormat::Json => print_json(&report),
        ReportFormat::Text => {
            print!("{}", report);
            Ok(())
        }
    }
}
