// KTP field extraction from OCR detail files into the CSV record store

use clap::Parser;
use ktp_reader::{
    ktp_extractor::source_name,
    models::{Field, HEADERS},
    AppConfig, KtpExtractor, ProcessedDocument,
};
use log::error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ktp_reader")]
#[command(
    about = "Extract KTP identity card fields from OCR detail files and append them to a CSV store"
)]
#[command(version)]
struct Cli {
    #[arg(help = "OCR detail files (Text: '...' lines) to process")]
    detail_files: Vec<PathBuf>,

    #[arg(short, long, help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "CSV record store to append to")]
    output: Option<PathBuf>,

    #[arg(short, long, help = "JSON file overriding typo, alias and occupation tables")]
    rules: Option<PathBuf>,

    #[arg(short, long, help = "Provenance name stored with the row (single file only)")]
    source_name: Option<String>,

    #[arg(long, help = "Process the newest detail file in the detail directory")]
    latest: bool,

    #[arg(short, long, help = "Directory searched by --latest")]
    detail_dir: Option<PathBuf>,

    #[arg(long, help = "Drop tokens scored below this confidence (0..1)")]
    confidence: Option<f32>,

    #[arg(long, help = "Print processed documents as JSON")]
    json: bool,

    #[arg(short, long, help = "Logging level (error, warn, info, debug, trace)")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<AppConfig, ktp_reader::utils::KtpError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(rules) = &cli.rules {
        config.rules_path = Some(rules.clone());
    }
    if let Some(dir) = &cli.detail_dir {
        config.detail_dir = dir.clone();
    }
    if let Some(confidence) = cli.confidence {
        config.confidence_threshold = confidence;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.check()?;
    Ok(config)
}

fn print_report(doc: &ProcessedDocument) {
    println!("\n=== {} ({} tokens) ===", doc.source_file, doc.token_count);
    for (field, value) in doc.record.iter() {
        println!("  {:<20} {}", field.column(), value);
    }
    for issue in &doc.validation.issues {
        println!("  ! {}", issue.message);
    }
    println!(
        "  Saved to {} ({} of {} fields, {} columns)",
        doc.location.display(),
        doc.record.filled_count(),
        Field::COUNT,
        HEADERS.len()
    );
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {}", err);
            std::process::exit(2);
        }
    };

    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    if cli.source_name.is_some() && cli.detail_files.len() != 1 {
        error!("--source-name needs exactly one detail file");
        std::process::exit(2);
    }
    if cli.detail_files.is_empty() && !cli.latest {
        error!("Nothing to do: pass detail files or --latest");
        std::process::exit(2);
    }

    let pipeline = match KtpExtractor::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!("Failed to set up extractor: {}", err);
            std::process::exit(2);
        }
    };

    let mut documents = Vec::new();
    let mut failures = 0;

    if cli.latest {
        match pipeline.process_latest(&config.detail_dir, &config.detail_suffix) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {}
            Err(err) => {
                error!("Failed to process latest detail file: {}", err);
                failures += 1;
            }
        }
    }

    for path in &cli.detail_files {
        let source = cli.source_name.clone().unwrap_or_else(|| source_name(path));
        match pipeline.process_detail_file(path, &source) {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                error!("Failed to process {}: {}", path.display(), err);
                failures += 1;
            }
        }
    }

    if cli.json {
        match serde_json::to_string_pretty(&documents) {
            Ok(json) => println!("{}", json),
            Err(err) => error!("Failed to serialise results: {}", err),
        }
    } else {
        for doc in &documents {
            print_report(doc);
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
