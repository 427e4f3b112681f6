//! DEX Log Decoder Library
//!
//! A stateless, reusable library for decoding DEX (Data Exchange) logs captured
//! from vending machines into per-slot sales rows and per-file machine info.
//!
//! # Architecture
//!
//! Each file goes through the same pipeline:
//! - Tokenizer: file text to `(tag, fields)` records
//! - Record decoder: PA1 / PA2 / PA5 / ID1 / VA1 records to typed values
//! - Slot aggregator: one sales row per product slot
//! - Machine info extractor: machine id and VA1 totals
//!
//! Bad records and fields never abort a file; only unreadable files are errors.
//!
//! The library does NOT:
//! - Expand glob patterns
//! - Write CSV or JSON
//! - Print reports
//!
//! All of that is in the application layer (dex-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use dex_log_decoder::{Decoder, DecoderConfig};
//!
//! let decoder = Decoder::with_config(DecoderConfig::new().with_unknown_machine_id("Unknown")).unwrap();
//! let batch = decoder.process_multiple_files(["a.log", "b.log"]);
//!
//! for row in &batch.sales_rows {
//!     println!("{} slot {}: {} vends", row.machine_id, row.slot, row.total_vends);
//! }
//! for failure in &batch.failures {
//!     eprintln!("{:?}: {}", failure.path, failure.error);
//! }
//! ```

// Public modules
pub mod aggregator;
pub mod config;
pub mod decoder;
pub mod machine_info;
pub mod record_decoder;
pub mod tokenizer;
pub mod types;

// Re-export main types for convenience
pub use aggregator::SlotAggregator;
pub use config::DecoderConfig;
pub use decoder::{read_dex_text, BatchResult, Decoder, FileFailure, ProcessedFile};
pub use machine_info::MachineInfoExtractor;
pub use record_decoder::{parse_int_or_default, DecodeOutcome, RecordDecoder};
pub use tokenizer::tokenize;
pub use types::{
    DecodeStats, DecoderError, DexRecord, LastSaleTime, MachineId, MachineInfo, MachineTotals,
    ProductInfo, RawRecord, Result, SalesCounters, SalesRow,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
