//! Batch command - process every receipt under an input folder.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use rcpt_core::{BatchProcessor, DocumentSource, FolderSource, ReportWriter};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input folder (default: `output.input_dir` from the config)
    input: Option<PathBuf>,

    /// Root folder for renamed copies
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Folder for the CSV list and the error report
    #[arg(short, long)]
    report_dir: Option<PathBuf>,

    /// Copy each receipt under its derived filename
    #[arg(long, conflicts_with = "no_copy")]
    copy: bool,

    /// Only write the list, even if the config enables copies
    #[arg(long)]
    no_copy: bool,

    /// Folder levels to scan (1 = input folder only, 0 = unlimited)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Reject dates that are not real calendar dates
    #[arg(long)]
    strict_dates: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(input) = args.input {
        config.output.input_dir = input;
    }
    if let Some(output_dir) = args.output_dir {
        config.output.output_dir = output_dir;
    }
    if let Some(report_dir) = args.report_dir {
        config.output.report_dir = report_dir;
    }
    if let Some(max_depth) = args.max_depth {
        config.output.max_depth = max_depth;
    }
    if args.copy {
        config.output.copy_renamed = true;
    } else if args.no_copy {
        config.output.copy_renamed = false;
    }
    if args.strict_dates {
        config.extraction.strict_dates = true;
    }

    let input_dir = &config.output.input_dir;
    if !input_dir.is_dir() {
        anyhow::bail!("Input folder not found: {}", input_dir.display());
    }

    let source = FolderSource::new(input_dir).with_max_depth(config.output.max_depth);
    let documents = source.documents()?;

    println!(
        "{} Found {} receipts in {}",
        style("ℹ").blue(),
        documents.len(),
        input_dir.display()
    );
    if config.output.copy_renamed {
        println!(
            "{} Renamed copies go to {}",
            style("ℹ").blue(),
            config.output.output_dir.display()
        );
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let processor = BatchProcessor::from_config(&config);
    let outcome = processor.process_all(&documents, |document, processed| {
        debug!(
            "{} -> {}",
            document.id,
            processed.record.renamed_file
        );
        pb.set_message(document.id.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let reports = ReportWriter::now(&config.output.report_dir, &config.output.timestamp_format)?
        .with_header_style(config.output.header_style);
    let list_path = reports.write_list(&outcome.dataset)?;
    let error_path = reports.write_errors(&outcome.dataset.error_log)?;

    // Print summary
    let failed = outcome.dataset.error_log.len();
    println!(
        "{} Processed {} receipts in {:?}",
        style("✓").green(),
        outcome.dataset.len(),
        start.elapsed()
    );
    println!(
        "   {} usable, {} with nothing extracted",
        style(outcome.dataset.len() - failed).green(),
        style(failed).red()
    );
    if config.output.copy_renamed {
        println!(
            "   {} copied, {} copy failures",
            style(outcome.copied).green(),
            style(outcome.copy_failures).red()
        );
    }
    if outcome.unreadable > 0 {
        println!(
            "   {} receipts had no readable text",
            style(outcome.unreadable).yellow()
        );
    }

    println!(
        "{} List written to {}",
        style("✓").green(),
        list_path.display()
    );
    if let Some(error_path) = error_path {
        println!(
            "{} Text of failed receipts written to {}",
            style("!").yellow(),
            error_path.display()
        );
    }

    Ok(())
}
