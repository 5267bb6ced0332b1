//! Parse command - extract the record of a single receipt.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use rcpt_core::report::{write_records, UTF8_BOM};
use rcpt_core::{
    normalize, FilenameDeriver, PdfTextExtractor, ReceiptAssembler, Record, RecordAssembler,
    TextExtractor,
};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Receipt PDF, or text already extracted from one
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the input as extracted text instead of a PDF (implied for .txt)
    #[arg(long)]
    text_input: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    #[serde(flatten)]
    record: &'a Record,
    fully_failed: bool,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let is_text = args.text_input
        || args
            .input
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    let raw = if is_text {
        fs::read_to_string(&args.input)?
    } else {
        PdfTextExtractor::new().extract_document_text(&args.input)?
    };
    info!("Read {} characters from {}", raw.len(), args.input.display());

    let text = normalize(&raw);
    let assembly = ReceiptAssembler::from_config(&config).assemble(&text);
    let mut record = assembly.record;
    record.source_file = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    record.renamed_file = FilenameDeriver::new(&config.template).derive(&record).into();

    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&ParseOutput {
            record: &record,
            fully_failed: assembly.fully_failed,
        })?,
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_records(
                &mut buffer,
                std::slice::from_ref(&record),
                config.output.header_style,
            )?;
            String::from_utf8(buffer.split_off(UTF8_BOM.len()))?
        }
        OutputFormat::Text => format_record_text(&record, assembly.fully_failed),
    };

    if let Some(output) = args.output {
        fs::write(&output, content)?;
        info!("Wrote output to {}", output.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn format_record_text(record: &Record, fully_failed: bool) -> String {
    let mut output = String::new();

    // The section is multi-line; it goes last, below the fields
    let row = record.to_row();
    for (name, value) in Record::FIELD_NAMES.iter().zip(row).take(row.len() - 1) {
        output.push_str(&format!("{:<16} {}\n", name, value));
    }
    if fully_failed {
        output.push_str("\nNothing could be extracted from this receipt.\n");
    }

    output.push_str("\nReceipt section:\n");
    output.push_str(record.receipt_section.as_str());
    output.push('\n');

    output
}
