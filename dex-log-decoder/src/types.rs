//! Core types for the DEX log decoder library
//!
//! This module defines the values flowing through the decoding pipeline: the raw
//! records produced by the tokenizer, the typed records produced by the record
//! decoder, and the sales rows / machine info emitted per file.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that can occur while reading DEX files
///
/// Malformed records and unparsable fields are not errors: they are skipped or
/// defaulted and counted in [`DecodeStats`].
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to read DEX file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(String),
}

/// One separator-delimited record, as split out of the file text
///
/// Borrowed from the input text and only alive while the file is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Record type tag (e.g. "PA1", "ID1")
    pub tag: &'a str,
    /// Fields following the tag, trimmed, in file order
    pub fields: Vec<&'a str>,
    /// 1-based line number the record started on
    pub line: usize,
}

impl<'a> RawRecord<'a> {
    /// Field at `index`, or `""` if the record is shorter
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or("")
    }
}

/// Product price (PA1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub slot: String,
    pub price_cents: u64,
}

/// Per-slot sales counters (PA2)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesCounters {
    pub slot: String,
    pub cash_vends: u64,
    pub cash_cents: u64,
    pub cashless_vends: u64,
    pub cashless_cents: u64,
}

/// Last sale timestamp of a slot (PA5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSaleTime {
    pub slot: String,
    /// `None` when the date/time fields could not be decoded
    pub datetime: Option<NaiveDateTime>,
}

/// Machine identity (ID1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineId {
    pub machine_id: String,
}

/// Machine-level totals (VA1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachineTotals {
    pub total_sales_cents: u64,
    pub total_vends: u64,
}

/// A decoded DEX record - the output of the record decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DexRecord {
    ProductInfo(ProductInfo),
    SalesCounters(SalesCounters),
    LastSaleTime(LastSaleTime),
    MachineId(MachineId),
    MachineTotals(MachineTotals),
}

/// One output row per product slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRow {
    pub machine_id: String,
    pub slot: String,
    pub price_cents: u64,
    pub price_dollars: f64,
    pub vends_cash: u64,
    pub cash_sales_cents: u64,
    pub cash_sales_dollars: f64,
    pub vends_cashless: u64,
    pub cashless_sales_cents: u64,
    pub cashless_sales_dollars: f64,
    pub total_vends: u64,
    pub total_sales_cents: u64,
    pub total_sales_dollars: f64,
    #[serde(serialize_with = "serialize_datetime")]
    pub last_sale_datetime: Option<NaiveDateTime>,
    pub last_sale_date: String,
    pub last_sale_time: String,
}

/// Machine summary, exactly one per processed file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineInfo {
    pub machine_id: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub total_sales_cents: u64,
    pub total_sales_dollars: f64,
    pub total_vends: u64,
}

/// Record counts gathered while decoding a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    /// Records produced by the tokenizer
    pub records: usize,
    /// Records turned into a [`DexRecord`]
    pub decoded: usize,
    /// Records with a tag no decoder handles
    pub unrecognized: usize,
    /// Records with a known tag but an unusable payload
    pub malformed: usize,
    /// Number of records seen per tag
    pub by_tag: BTreeMap<String, usize>,
}

impl DecodeStats {
    /// Add another file's counts to this one
    pub fn merge(&mut self, other: &DecodeStats) {
        self.records += other.records;
        self.decoded += other.decoded;
        self.unrecognized += other.unrecognized;
        self.malformed += other.malformed;
        for (tag, count) in &other.by_tag {
            *self.by_tag.entry(tag.clone()).or_insert(0) += count;
        }
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} decoded, {} unrecognized, {} malformed)",
            self.records, self.decoded, self.unrecognized, self.malformed
        )
    }
}

/// Convert an amount in cents to dollars
pub fn cents_to_dollars(cents: u64) -> f64 {
    cents as f64 / 100.0
}

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

fn serialize_datetime<S>(value: &Option<NaiveDateTime>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string()),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_to_dollars() {
        assert_eq!(cents_to_dollars(0), 0.0);
        assert_eq!(cents_to_dollars(75), 0.75);
        assert_eq!(cents_to_dollars(2625), 26.25);
    }

    #[test]
    fn test_raw_record_missing_field() {
        let record = RawRecord { tag: "PA2", fields: vec!["041", "0035"], line: 1 };
        assert_eq!(record.field(1), "0035");
        assert_eq!(record.field(4), "");
    }

    #[test]
    fn test_stats_merge() {
        let mut a = DecodeStats { records: 3, decoded: 2, unrecognized: 1, ..Default::default() };
        a.by_tag.insert("PA1".to_string(), 2);
        let mut b = DecodeStats { records: 2, decoded: 1, malformed: 1, ..Default::default() };
        b.by_tag.insert("PA1".to_string(), 1);
        b.by_tag.insert("ID1".to_string(), 1);

        a.merge(&b);
        assert_eq!(a.records, 5);
        assert_eq!(a.decoded, 3);
        assert_eq!(a.unrecognized, 1);
        assert_eq!(a.malformed, 1);
        assert_eq!(a.by_tag["PA1"], 3);
        assert_eq!(a.by_tag["ID1"], 1);
        assert_eq!(a.to_string(), "5 records (3 decoded, 1 unrecognized, 1 malformed)");
    }
}
