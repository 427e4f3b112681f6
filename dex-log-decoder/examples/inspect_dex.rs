//! Inspect DEX files to see which record types they contain
//!
//! Usage:
//!   cargo run --example inspect_dex -- <file.log> [more.log ...]

use dex_log_decoder::{read_dex_text, tokenize, Decoder, RecordDecoder};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();

    let files: Vec<String> = env::args().skip(1).collect();
    if files.is_empty() {
        eprintln!("Usage: inspect_dex <file.log> [more.log ...]");
        std::process::exit(1);
    }

    let decoder = Decoder::new();

    for file in &files {
        let path = Path::new(file);
        println!("\n═══════════════════════════════════════");
        println!("Inspecting: {:?}", path);
        println!("═══════════════════════════════════════");

        let text = match read_dex_text(path) {
            Ok(text) => text,
            Err(e) => {
                println!("✗ Error: {}", e);
                continue;
            }
        };

        let processed = decoder.process_text(&text, path);

        println!("Record Type Statistics:");
        println!("─────────────────────────");
        for (tag, count) in &processed.stats.by_tag {
            let handled = if RecordDecoder::decoder_for(tag).is_some() { "decoded" } else { "ignored" };
            println!("  {:<4} {:5} records  ({})", tag, count, handled);
        }

        println!("\n{}", processed.stats);
        println!("Machine: {:?}", processed.machine_info.machine_id);
        println!("Slots:   {}", processed.sales_rows.len());

        if let Some(first) = tokenize(&text, decoder.config().field_separator).next() {
            println!("First record: {} {:?} (line {})", first.tag, first.fields, first.line);
        }
    }
}
