// Reads one OCR token per line from stdin and prints the inferred record.
// Nothing is persisted; useful for trying out rules files.

use ktp_reader::{
    models::ExtractionRules,
    processing::FieldExtractor,
};
use std::io::{self, BufRead};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let rules = match std::env::args().nth(1) {
        Some(path) => match ExtractionRules::from_json_file(Path::new(&path)) {
            Ok(rules) => rules,
            Err(err) => {
                eprintln!("❌ {}", err);
                std::process::exit(2);
            }
        },
        None => ExtractionRules::default(),
    };

    let extractor = match FieldExtractor::new(&rules) {
        Ok(extractor) => extractor,
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(2);
        }
    };

    let tokens: Vec<String> = io::stdin()
        .lock()
        .lines()
        .map_while(Result::ok)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    println!("Tokens:");
    for token in &tokens {
        println!("  {:<40} -> {}", token, extractor.normalizer().normalize(token));
    }

    let record = extractor.parse(&tokens);
    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("\nRecord:\n{}", json),
        Err(err) => eprintln!("❌ {}", err),
    }
}
