//! DEX record tokenizer
//!
//! Splits raw file text into [`RawRecord`]s. A record starts at the beginning of
//! a line, or after an empty field (`**`) when the next token looks like a
//! record tag. Both of these layouts therefore tokenize the same way:
//!
//! ```text
//! PA1*041*0075
//! PA2*041*0035*0002625*0000*0000
//!
//! *PA1*041*0075**PA2*041*0035*0002625*0000*0000**
//! ```
//!
//! Whitespace around fields, blank lines and CR / LF / CRLF line endings are
//! stripped. Text that does not start with a tag, and tags without any field,
//! are dropped.

use crate::types::RawRecord;
use std::collections::VecDeque;
use std::iter::Enumerate;
use std::str::Lines;

/// Shortest record tag ("SE")
const MIN_TAG_LEN: usize = 2;
/// Longest record tag
const MAX_TAG_LEN: usize = 4;

/// Tokenize `text` using `separator` between fields
pub fn tokenize(text: &str, separator: char) -> RecordTokenizer<'_> {
    RecordTokenizer {
        lines: text.lines().enumerate(),
        separator,
        pending: VecDeque::new(),
    }
}

/// Lazy iterator over the records of a DEX text
pub struct RecordTokenizer<'a> {
    lines: Enumerate<Lines<'a>>,
    separator: char,
    pending: VecDeque<RawRecord<'a>>,
}

impl<'a> Iterator for RecordTokenizer<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(record);
            }

            let (index, line) = self.lines.next()?;
            // Lone CRs (classic Mac endings) are not split by `lines()`
            for chunk in line.split('\r') {
                split_records(chunk, self.separator, index + 1, &mut self.pending);
            }
        }
    }
}

/// Whether `token` has the shape of a DEX record tag
///
/// An uppercase ASCII letter followed by uppercase letters or digits,
/// 2 to 4 characters in total.
pub fn is_record_tag(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_with_letter = matches!(chars.next(), Some(c) if c.is_ascii_uppercase());

    starts_with_letter
        && (MIN_TAG_LEN..=MAX_TAG_LEN).contains(&token.len())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Split one line into records and append them to `out`
fn split_records<'a>(line: &'a str, separator: char, line_no: usize, out: &mut VecDeque<RawRecord<'a>>) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let mut current: Option<RawRecord<'a>> = None;
    // Start of line counts as a boundary
    let mut after_empty = true;

    for token in line.split(separator).map(str::trim) {
        if token.is_empty() {
            if let Some(record) = current.as_mut() {
                record.fields.push(token);
            }
            after_empty = true;
            continue;
        }

        if after_empty && is_record_tag(token) {
            if let Some(record) = current.take() {
                finish_record(record, out);
            }
            current = Some(RawRecord { tag: token, fields: Vec::new(), line: line_no });
        } else if let Some(record) = current.as_mut() {
            record.fields.push(token);
        } else {
            log::trace!("line {}: dropping token {:?} outside any record", line_no, token);
        }
        after_empty = false;
    }

    if let Some(record) = current {
        finish_record(record, out);
    }
}

fn finish_record<'a>(mut record: RawRecord<'a>, out: &mut VecDeque<RawRecord<'a>>) {
    while record.fields.last().is_some_and(|f| f.is_empty()) {
        record.fields.pop();
    }

    if record.fields.is_empty() {
        log::trace!("line {}: dropping {} record without fields", record.line, record.tag);
        return;
    }
    out.push_back(record);
}
