//! Main decoder API
//!
//! This module provides the primary interface for the decoder library. The
//! [`Decoder`] runs the single-file pipeline (tokenize, decode, aggregate) and
//! folds several files into a [`BatchResult`].

use crate::aggregator::SlotAggregator;
use crate::config::DecoderConfig;
use crate::machine_info::MachineInfoExtractor;
use crate::record_decoder::{DecodeOutcome, RecordDecoder};
use crate::tokenizer::tokenize;
use crate::types::{DecodeStats, DecoderError, MachineInfo, Result, SalesRow};
use std::path::{Path, PathBuf};

/// Everything decoded from one DEX file
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub sales_rows: Vec<SalesRow>,
    pub machine_info: MachineInfo,
    pub stats: DecodeStats,
}

impl ProcessedFile {
    /// Split into `(sales_rows, machine_info)`
    pub fn into_parts(self) -> (Vec<SalesRow>, MachineInfo) {
        (self.sales_rows, self.machine_info)
    }
}

/// A file that could not be processed in a batch
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: DecoderError,
}

/// Concatenated results of several files, in input order
#[derive(Debug, Default)]
pub struct BatchResult {
    pub sales_rows: Vec<SalesRow>,
    pub machine_info: Vec<MachineInfo>,
    pub failures: Vec<FileFailure>,
    pub stats: DecodeStats,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's outcome into the batch
    ///
    /// Failures are kept and logged; they never stop the batch.
    pub fn record(&mut self, path: &Path, result: Result<ProcessedFile>) {
        match result {
            Ok(file) => {
                self.stats.merge(&file.stats);
                self.sales_rows.extend(file.sales_rows);
                self.machine_info.push(file.machine_info);
            }
            Err(error) => {
                log::warn!("Skipping {:?}: {}", path, error);
                self.failures.push(FileFailure { path: path.to_path_buf(), error });
            }
        }
    }

    /// Number of files processed successfully
    pub fn files_processed(&self) -> usize {
        self.machine_info.len()
    }

    /// Split into `(sales_rows, machine_info)`
    pub fn into_parts(self) -> (Vec<SalesRow>, Vec<MachineInfo>) {
        (self.sales_rows, self.machine_info)
    }
}

/// The main decoder struct - entry point for all decoding operations
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom configuration
    ///
    /// # Returns
    /// * `Err(DecoderError::InvalidConfig)` if the configuration is unusable
    pub fn with_config(config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Read and decode a single DEX file
    ///
    /// Only I/O failures are errors. Malformed records are skipped and counted
    /// in the returned stats.
    ///
    /// # Example
    /// ```no_run
    /// use dex_log_decoder::Decoder;
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::new();
    /// let file = decoder.process_dex_file(Path::new("DEX-files/machine.log")).unwrap();
    /// println!("{} slots from {}", file.sales_rows.len(), file.machine_info.machine_id);
    /// ```
    pub fn process_dex_file(&self, path: &Path) -> Result<ProcessedFile> {
        log::info!("Processing DEX file: {:?}", path);
        let text = read_dex_text(path)?;
        Ok(self.process_text(&text, path))
    }

    /// Decode DEX text that was read from `path`
    ///
    /// `path` only names the file in the machine info. The result depends on
    /// nothing but the arguments.
    pub fn process_text(&self, text: &str, path: &Path) -> ProcessedFile {
        let mut aggregator = SlotAggregator::new();
        let mut extractor = MachineInfoExtractor::new();
        let mut stats = DecodeStats::default();

        for raw in tokenize(text, self.config.field_separator) {
            stats.records += 1;
            *stats.by_tag.entry(raw.tag.to_string()).or_insert(0) += 1;

            match RecordDecoder::decode(&raw, &self.config) {
                DecodeOutcome::Decoded(record) => {
                    stats.decoded += 1;
                    aggregator.apply(&record);
                    extractor.apply(&record);
                }
                DecodeOutcome::Unrecognized => stats.unrecognized += 1,
                DecodeOutcome::Malformed => stats.malformed += 1,
            }
        }

        if aggregator.is_empty() {
            log::debug!("{:?}: no product slots", path);
        } else {
            log::debug!("{:?}: {} product slot(s)", path, aggregator.len());
        }

        let unknown = self.config.unknown_machine_id.as_str();
        let sales_rows = aggregator.finish(extractor.machine_id(unknown));
        let machine_info = extractor.finish(path, unknown);

        log::debug!("{:?}: {}", path, stats);
        log::info!(
            "Decoded {} sales rows for machine {:?} from {:?}",
            sales_rows.len(),
            machine_info.machine_id,
            path
        );

        ProcessedFile { sales_rows, machine_info, stats }
    }

    /// Decode several files independently and concatenate the results
    ///
    /// Unreadable files end up in [`BatchResult::failures`]; the remaining
    /// files are still processed.
    pub fn process_multiple_files<I, P>(&self, paths: I) -> BatchResult
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut batch = BatchResult::new();
        for path in paths {
            let path = path.as_ref();
            batch.record(path, self.process_dex_file(path));
        }
        log::info!(
            "Processed {} file(s), {} failed, {} sales rows",
            batch.files_processed(),
            batch.failures.len(),
            batch.sales_rows.len()
        );
        batch
    }
}

/// Read a DEX capture as text
///
/// Captures are normally ASCII; anything that is not valid UTF-8 is mapped
/// byte-for-byte as Latin-1.
pub fn read_dex_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| DecoderError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8(bytes).unwrap_or_else(|e| {
        log::warn!("DEX file {:?} is not UTF-8, decoding as Latin-1", path);
        e.into_bytes().iter().map(|&b| b as char).collect()
    }))
}
