// FieldLoom CLI - headless review of multi-agent extraction documents

mod decisions;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use fieldloom_engine::{Confidence, ReviewSession};

use exit_codes::{EXIT_DECISIONS, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "floom")]
#[command(about = "Human-in-the-loop review for extraction documents (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every reviewable field discovered in a document
    #[command(after_help = "\
Examples:
  floom fields extraction.json
  floom fields extraction.json --json")]
    Fields {
        /// Path to the extraction document (JSON)
        input: PathBuf,

        /// Output the field list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Parse a document and report extraction statistics
    #[command(after_help = "\
Examples:
  floom validate extraction.json")]
    Validate {
        /// Path to the extraction document (JSON)
        input: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a decisions file and write the reconciled document
    #[command(after_help = "\
Examples:
  floom export extraction.json --decisions review.toml
  floom export extraction.json --decisions review.toml --clean -o final.json")]
    Export {
        /// Path to the extraction document (JSON)
        input: PathBuf,

        /// Path to the TOML decisions file
        #[arg(long)]
        decisions: Option<PathBuf>,

        /// Strip alternatives, reviewed flags, and comments from the output
        #[arg(long)]
        clean: bool,

        /// Output path (defaults to validated_<stem>.json next to the input)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fields { input, json } => cmd_fields(&input, json),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Export { input, decisions, clean, output } => {
            cmd_export(&input, decisions.as_deref(), clean, output)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn parse_err(message: impl Into<String>) -> CliError {
    CliError {
        code: EXIT_PARSE,
        message: message.into(),
        hint: Some("the input must be SFF-style JSON with an object or array root".into()),
    }
}

fn load_session(input: &Path) -> Result<ReviewSession, CliError> {
    let document = fieldloom_io::load_document(input)
        .map_err(|e| parse_err(format!("cannot load {}: {e}", input.display())))?;
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("export")
        .to_string();
    ReviewSession::new(document, file_name).map_err(|e| parse_err(e.to_string()))
}

fn cmd_fields(input: &Path, json_output: bool) -> Result<(), CliError> {
    let session = load_session(input)?;

    if json_output {
        let text = serde_json::to_string_pretty(session.fields())
            .map_err(|e| parse_err(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "{:<28} {:<40} {:<8} {:<9} VALUE",
        "SECTION", "ADDRESS", "CONF", "RESOLVED"
    );
    for field in session.fields() {
        println!(
            "{:<28} {:<40} {:<8} {:<9} {}",
            field.section,
            field.path,
            field.confidence.to_string(),
            if field.resolved { "yes" } else { "no" },
            render_value(&field.value),
        );
    }
    Ok(())
}

fn cmd_validate(input: &Path, json_output: bool) -> Result<(), CliError> {
    let session = load_session(input)?;

    let count = |tier: Confidence| {
        session
            .fields()
            .iter()
            .filter(|f| f.confidence == tier)
            .count()
    };
    let mut sections: Vec<&str> = session.fields().iter().map(|f| f.section.as_str()).collect();
    sections.sort_unstable();
    sections.dedup();

    if json_output {
        #[derive(serde::Serialize)]
        struct Report<'a> {
            file: &'a str,
            fields: usize,
            high: usize,
            medium: usize,
            low: usize,
            sections: usize,
        }
        let report = Report {
            file: session.file_name(),
            fields: session.fields().len(),
            high: count(Confidence::High),
            medium: count(Confidence::Medium),
            low: count(Confidence::Low),
            sections: sections.len(),
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| parse_err(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    println!("{}: {} field(s) in {} section(s)", session.file_name(), session.fields().len(), sections.len());
    println!("  high:   {}", count(Confidence::High));
    println!("  medium: {}", count(Confidence::Medium));
    println!("  low:    {}", count(Confidence::Low));
    Ok(())
}

fn cmd_export(
    input: &Path,
    decisions_path: Option<&Path>,
    clean: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut session = load_session(input)?;

    if let Some(decisions_path) = decisions_path {
        let text = std::fs::read_to_string(decisions_path).map_err(|e| CliError {
            code: EXIT_IO,
            message: format!("cannot read {}: {e}", decisions_path.display()),
            hint: None,
        })?;
        let file = decisions::DecisionsFile::from_toml(&text).map_err(|e| CliError {
            code: EXIT_DECISIONS,
            message: format!("invalid decisions file: {e}"),
            hint: Some("see [[decision]] entries with path/value/resolve/delete".into()),
        })?;
        for warning in decisions::apply(&mut session, &file) {
            eprintln!("note: {warning}");
        }
    }

    let document = session.export(clean);
    let out_path = output.unwrap_or_else(|| {
        let name = fieldloom_io::export_file_name(session.file_name());
        input.parent().unwrap_or_else(|| Path::new(".")).join(name)
    });
    fieldloom_io::write_document(&out_path, &document).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot write {}: {e}", out_path.display()),
        hint: None,
    })?;

    let progress = session.progress();
    println!(
        "wrote {} ({} field(s), {} resolved{})",
        out_path.display(),
        progress.total,
        progress.resolved,
        if clean { ", clean" } else { "" },
    );
    Ok(())
}

/// Human rendering of a field value: bare strings, comma-joined arrays,
/// compact JSON for the rest.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
