use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pim_api::services::transfer::{
    detect_format, format_products, parse_products, validate_product_data, RecordValue,
    TransferFormat, ValidationResult,
};
use serde::Serialize;

/// Offline conversion and validation of product import/export files.
#[derive(Parser)]
#[command(
    name = "pim-transfer",
    about = "Convert and validate product files (JSON, XML, CSV)",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render reports as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a product file into another format
    Convert {
        #[arg(help = "Input file, or '-' for stdin")]
        input: PathBuf,
        #[arg(long, value_parser = parse_format, help = "Input format; detected when omitted")]
        from: Option<TransferFormat>,
        #[arg(long, value_parser = parse_format, help = "Output format")]
        to: TransferFormat,
        #[arg(short, long, help = "Output file; stdout when omitted")]
        output: Option<PathBuf>,
    },
    /// Check every product in a file for the required import fields
    Validate {
        #[arg(help = "Input file, or '-' for stdin")]
        input: PathBuf,
        #[arg(long, value_parser = parse_format, help = "Input format; detected when omitted")]
        format: Option<TransferFormat>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    format: TransferFormat,
    total: usize,
    invalid: usize,
    records: Vec<RecordReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordReport {
    index: usize,
    #[serde(flatten)]
    result: ValidationResult,
}

fn parse_format(raw: &str) -> Result<TransferFormat, String> {
    TransferFormat::from_str(raw).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
        } => {
            let content = read_input(&input)?;
            let from = from.unwrap_or_else(|| detect_format(&file_name(&input), &content));
            let converted = convert(&content, from, to)?;
            match output {
                Some(path) => {
                    fs::write(&path, converted)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Converted {} to {} ({})", from, to, path.display());
                }
                None => io::stdout().write_all(converted.as_bytes())?,
            }
        }
        Commands::Validate { input, format } => {
            let content = read_input(&input)?;
            let format = format.unwrap_or_else(|| detect_format(&file_name(&input), &content));
            let report = validate(&content, format)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if report.invalid > 0 {
                bail!("{} of {} products are invalid", report.invalid, report.total);
            }
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn convert(content: &str, from: TransferFormat, to: TransferFormat) -> Result<String> {
    let products = parse_products(from, content).map_err(|e| anyhow!(e))?;
    let records: Vec<RecordValue> = products.into_iter().map(RecordValue::from).collect();
    format_products(to, &records).map_err(|e| anyhow!(e))
}

fn validate(content: &str, format: TransferFormat) -> Result<FileReport> {
    let products = parse_products(format, content).map_err(|e| anyhow!(e))?;
    let records: Vec<RecordReport> = products
        .iter()
        .enumerate()
        .map(|(index, product)| RecordReport {
            index,
            result: validate_product_data(product),
        })
        .collect();
    let invalid = records.iter().filter(|r| !r.result.valid).count();
    Ok(FileReport {
        format,
        total: records.len(),
        invalid,
        records,
    })
}

fn print_report(report: &FileReport) {
    println!(
        "{} products ({}), {} invalid",
        report.total, report.format, report.invalid
    );
    for record in report.records.iter().filter(|r| !r.result.valid) {
        println!("  #{}: {}", record.index, record.result.errors.join("; "));
    }
}
