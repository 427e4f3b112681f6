//! Record Decoding Engine
//!
//! Turns a [`RawRecord`] into a typed [`DexRecord`]. Every supported tag has a
//! pure decode function; adding a record type means adding a function and an
//! entry in [`RECORD_DECODERS`].
//!
//! Numeric fields that are missing or not plain digits decode as 0. A record is
//! only rejected when the field identifying it (slot or machine id) is empty.

use crate::config::DecoderConfig;
use crate::types::{
    DexRecord, LastSaleTime, MachineId, MachineTotals, ProductInfo, RawRecord, SalesCounters,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Field positions, zero-based after the tag
pub mod fields {
    pub const PA1_SLOT: usize = 0;
    pub const PA1_PRICE: usize = 1;

    pub const PA2_SLOT: usize = 0;
    pub const PA2_CASH_VENDS: usize = 1;
    pub const PA2_CASH_CENTS: usize = 2;
    pub const PA2_CASHLESS_VENDS: usize = 3;
    pub const PA2_CASHLESS_CENTS: usize = 4;

    pub const PA5_SLOT: usize = 0;
    pub const PA5_DATE: usize = 1;
    pub const PA5_TIME: usize = 2;

    pub const ID1_MACHINE_ID: usize = 0;

    pub const VA1_TOTAL_SALES: usize = 0;
    pub const VA1_TOTAL_VENDS: usize = 1;
}

/// Decode function for one record tag
pub type DecodeFn = fn(&RawRecord<'_>, &DecoderConfig) -> Option<DexRecord>;

/// Tag to decoder mapping
pub const RECORD_DECODERS: &[(&str, DecodeFn)] = &[
    ("PA1", decode_pa1),
    ("PA2", decode_pa2),
    ("PA5", decode_pa5),
    ("ID1", decode_id1),
    ("VA1", decode_va1),
];

/// What became of a raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded(DexRecord),
    /// No decoder for this tag
    Unrecognized,
    /// Known tag, unusable payload
    Malformed,
}

/// Record decoder - dispatches raw records on their tag
pub struct RecordDecoder;

impl RecordDecoder {
    /// Look up the decode function for `tag`
    pub fn decoder_for(tag: &str) -> Option<DecodeFn> {
        RECORD_DECODERS
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, decode)| *decode)
    }

    /// Decode a raw record
    ///
    /// Never fails: unknown tags and bad payloads come back as
    /// [`DecodeOutcome::Unrecognized`] / [`DecodeOutcome::Malformed`] so the
    /// caller can carry on with the next record.
    pub fn decode(raw: &RawRecord<'_>, config: &DecoderConfig) -> DecodeOutcome {
        let Some(decode) = Self::decoder_for(raw.tag) else {
            log::trace!("line {}: no decoder for {} record", raw.line, raw.tag);
            return DecodeOutcome::Unrecognized;
        };

        match decode(raw, config) {
            Some(record) => DecodeOutcome::Decoded(record),
            None => {
                log::debug!("line {}: skipping malformed {} record {:?}", raw.line, raw.tag, raw.fields);
                DecodeOutcome::Malformed
            }
        }
    }
}

/// Parse an unsigned decimal field, defaulting to 0
///
/// DEX counters are zero-padded digit strings. Anything else (empty, signs,
/// decimal points, overflow) yields 0 rather than rejecting the record.
pub fn parse_int_or_default(field: &str) -> u64 {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    field.parse().unwrap_or(0)
}

/// Decode a DEX date and time into a timestamp
///
/// Dates are `YYMMDD` (two-digit years offset by `century_base`) or
/// `YYYYMMDD`; times are `HHMM` or `HHMMSS`. Returns `None` if either part is
/// missing or not a valid calendar value.
pub fn parse_dex_datetime(date: &str, time: &str, century_base: i32) -> Option<NaiveDateTime> {
    let date = parse_dex_date(date.trim(), century_base)?;
    let time = parse_dex_time(time.trim())?;
    Some(NaiveDateTime::new(date, time))
}

fn parse_dex_date(date: &str, century_base: i32) -> Option<NaiveDate> {
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (year, rest) = match date.len() {
        6 => (century_base.checked_add(date[..2].parse::<i32>().ok()?)?, &date[2..]),
        8 => (date[..4].parse::<i32>().ok()?, &date[4..]),
        _ => return None,
    };
    let month = rest[..2].parse().ok()?;
    let day = rest[2..4].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_dex_time(time: &str) -> Option<NaiveTime> {
    if !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let second = match time.len() {
        4 => 0,
        6 => time[4..6].parse().ok()?,
        _ => return None,
    };
    let hour = time[..2].parse().ok()?;
    let minute = time[2..4].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn slot_of(raw: &RawRecord<'_>, index: usize) -> Option<String> {
    let slot = raw.field(index);
    (!slot.is_empty()).then(|| slot.to_string())
}

fn decode_pa1(raw: &RawRecord<'_>, _config: &DecoderConfig) -> Option<DexRecord> {
    Some(DexRecord::ProductInfo(ProductInfo {
        slot: slot_of(raw, fields::PA1_SLOT)?,
        price_cents: parse_int_or_default(raw.field(fields::PA1_PRICE)),
    }))
}

fn decode_pa2(raw: &RawRecord<'_>, _config: &DecoderConfig) -> Option<DexRecord> {
    Some(DexRecord::SalesCounters(SalesCounters {
        slot: slot_of(raw, fields::PA2_SLOT)?,
        cash_vends: parse_int_or_default(raw.field(fields::PA2_CASH_VENDS)),
        cash_cents: parse_int_or_default(raw.field(fields::PA2_CASH_CENTS)),
        cashless_vends: parse_int_or_default(raw.field(fields::PA2_CASHLESS_VENDS)),
        cashless_cents: parse_int_or_default(raw.field(fields::PA2_CASHLESS_CENTS)),
    }))
}

fn decode_pa5(raw: &RawRecord<'_>, config: &DecoderConfig) -> Option<DexRecord> {
    let slot = slot_of(raw, fields::PA5_SLOT)?;
    let datetime = parse_dex_datetime(
        raw.field(fields::PA5_DATE),
        raw.field(fields::PA5_TIME),
        config.century_base,
    );
    if datetime.is_none() {
        log::debug!("line {}: unparsable last sale time for slot {}", raw.line, slot);
    }
    Some(DexRecord::LastSaleTime(LastSaleTime { slot, datetime }))
}

fn decode_id1(raw: &RawRecord<'_>, _config: &DecoderConfig) -> Option<DexRecord> {
    let machine_id = raw.field(fields::ID1_MACHINE_ID).trim();
    if machine_id.is_empty() {
        return None;
    }
    Some(DexRecord::MachineId(MachineId { machine_id: machine_id.to_string() }))
}

fn decode_va1(raw: &RawRecord<'_>, _config: &DecoderConfig) -> Option<DexRecord> {
    Some(DexRecord::MachineTotals(MachineTotals {
        total_sales_cents: parse_int_or_default(raw.field(fields::VA1_TOTAL_SALES)),
        total_vends: parse_int_or_default(raw.field(fields::VA1_TOTAL_VENDS)),
    }))
}
