//! irr - Inter-rater reliability CLI
//!
//! Computes a multi-label Krippendorff's alpha between two raters' CSV
//! annotation exports.
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline: two rater directories plus a label vocabulary file
//! irr compute --rater1 data/rater1 --rater2 data/rater2 --labels data/labels.txt
//!
//! # Rater 2's tool exported labels under a different header
//! irr compute --rater1 a/ --rater2 b/ --labels labels.txt --rater2-label-column Code
//!
//! # Machine-readable report
//! irr compute --rater1 a/ --rater2 b/ --labels labels.txt --json
//!
//! # Dump the reconciled table for spreadsheet cross-checks
//! irr table --rater1 a/ --rater2 b/ --labels labels.txt --output table.csv
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use irr::ingest::{extract_rater_data, RaterFileConfig};
use irr::{
    alpha_interpretation, AgreementTableBuilder, LabelVocabulary, MergeConfig, ReconciledTable,
    ReliabilityCalculator, UnknownLabelPolicy,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Inter-rater reliability for multi-label annotation
#[derive(Parser)]
#[command(name = "irr")]
#[command(author, version, about = "Inter-rater reliability for multi-label annotation")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the reliability coefficient from two raters' CSV exports
    Compute(ComputeArgs),
    /// Write the reconciled agreement table as CSV
    Table(TableArgs),
}

/// Input options shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Directory of rater 1's CSV files (searched recursively)
    #[arg(long, value_name = "DIR")]
    rater1: PathBuf,

    /// Directory of rater 2's CSV files (searched recursively)
    #[arg(long, value_name = "DIR")]
    rater2: PathBuf,

    /// Comma-separated label vocabulary file
    #[arg(long, value_name = "FILE")]
    labels: PathBuf,

    /// Header of the column holding the annotated item text
    #[arg(long, default_value = "Data")]
    item_column: String,

    /// Header of the column holding the comma-separated labels
    #[arg(long, default_value = "Label")]
    label_column: String,

    /// Override the label column header for rater 2's exports
    #[arg(long, value_name = "NAME")]
    rater2_label_column: Option<String>,

    /// Drop labels missing from the vocabulary instead of failing
    #[arg(long)]
    ignore_unknown_labels: bool,
}

#[derive(Args)]
struct ComputeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Emit the full report as pretty JSON
    #[arg(long)]
    json: bool,

    /// List every disagreement and single-rater item
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct TableArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

// ============================================================================
// Commands
// ============================================================================

struct LoadedInputs {
    vocabulary: LabelVocabulary,
    table: ReconciledTable,
    config: MergeConfig,
}

/// Run the shared front half of every command: load the vocabulary, extract
/// both raters, merge.
fn load_inputs(args: &InputArgs) -> Result<LoadedInputs, String> {
    let vocabulary = LabelVocabulary::from_file(&args.labels).map_err(|e| e.to_string())?;

    let rater1_files = RaterFileConfig::new(&args.item_column, &args.label_column);
    let rater2_files = RaterFileConfig::new(
        &args.item_column,
        args.rater2_label_column
            .as_deref()
            .unwrap_or(&args.label_column),
    );
    let rater1 = extract_rater_data(&args.rater1, &rater1_files).map_err(|e| e.to_string())?;
    let rater2 = extract_rater_data(&args.rater2, &rater2_files).map_err(|e| e.to_string())?;

    let config = MergeConfig {
        unknown_labels: if args.ignore_unknown_labels {
            UnknownLabelPolicy::Ignore
        } else {
            UnknownLabelPolicy::Reject
        },
        ..MergeConfig::default()
    };
    let table = AgreementTableBuilder::new(config.clone())
        .build(&rater1, &rater2, &vocabulary)
        .map_err(|e| e.to_string())?;

    Ok(LoadedInputs {
        vocabulary,
        table,
        config,
    })
}

fn cmd_compute(args: ComputeArgs) -> Result<(), String> {
    let inputs = load_inputs(&args.input)?;
    let report = ReliabilityCalculator::nominal()
        .report(&inputs.table, &inputs.vocabulary)
        .map_err(|e| e.to_string())?;
    let diagnostics = &inputs.table.diagnostics;

    if args.json {
        let output = serde_json::json!({
            "report": report,
            "diagnostics": diagnostics,
        });
        let rendered = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        println!("{rendered}");
        return Ok(());
    }

    println!("alpha: {:.4} ({})", report.alpha, alpha_interpretation(report.alpha));
    println!(
        "items: {}   mean raters/item: {:.2}   ratings: {}",
        report.n_items, report.mean_raters_per_item, report.total_ratings
    );
    println!(
        "observed agreement: {:.4}   expected agreement: {:.4}",
        report.observed_agreement, report.expected_agreement
    );
    println!(
        "single-rater items: {}   disagreements: {}",
        diagnostics.single_rater_count(),
        diagnostics.disagreements.len()
    );

    if args.verbose {
        for item in &diagnostics.single_rater_items {
            println!("  single rater: {item}");
        }
        for d in &diagnostics.disagreements {
            println!(
                "  disagreement on `{}`: {}=[{}] {}=[{}]",
                d.item,
                inputs.config.rater1_column,
                d.rater1_labels.join(", "),
                inputs.config.rater2_column,
                d.rater2_labels.join(", ")
            );
        }
    }

    Ok(())
}

fn cmd_table(args: TableArgs) -> Result<(), String> {
    let inputs = load_inputs(&args.input)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(|e| e.to_string())?),
        None => Box::new(io::stdout()),
    };
    write_table_csv(out, &inputs.table, &inputs.vocabulary, &inputs.config)
        .map_err(|e| e.to_string())
}

/// Write the reconciled table: item column, one column per label, rater count.
fn write_table_csv(
    out: Box<dyn Write>,
    table: &ReconciledTable,
    vocabulary: &LabelVocabulary,
    config: &MergeConfig,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    let mut header = vec![config.item_column.as_str()];
    header.extend(vocabulary.iter());
    header.push("num_raters");
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.item.clone()];
        record.extend(row.label_counts.iter().map(u32::to_string));
        record.push(row.rater_count.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Compute(args) => cmd_compute(args),
        Commands::Table(args) => cmd_table(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
