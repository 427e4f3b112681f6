//! Slot aggregation
//!
//! Joins PA1 prices, PA2 counters and PA5 timestamps into one [`SalesRow`] per
//! slot. Rows stay as builders until [`SlotAggregator::finish`]; totals and
//! dollar amounts are only computed there.

use crate::types::{
    cents_to_dollars, DexRecord, SalesCounters, SalesRow, DATE_FORMAT, TIME_FORMAT,
};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Partially merged row for one slot
#[derive(Debug, Clone, Default)]
struct SlotBuilder {
    slot: String,
    price_cents: u64,
    counters: SalesCounters,
    last_sale: Option<NaiveDateTime>,
}

impl SlotBuilder {
    fn build(self, machine_id: &str) -> SalesRow {
        let c = self.counters;
        // Counters are up to 20 digits; totals clamp instead of overflowing
        let total_vends = c.cash_vends.saturating_add(c.cashless_vends);
        let total_sales_cents = c.cash_cents.saturating_add(c.cashless_cents);

        SalesRow {
            machine_id: machine_id.to_string(),
            slot: self.slot,
            price_cents: self.price_cents,
            price_dollars: cents_to_dollars(self.price_cents),
            vends_cash: c.cash_vends,
            cash_sales_cents: c.cash_cents,
            cash_sales_dollars: cents_to_dollars(c.cash_cents),
            vends_cashless: c.cashless_vends,
            cashless_sales_cents: c.cashless_cents,
            cashless_sales_dollars: cents_to_dollars(c.cashless_cents),
            total_vends,
            total_sales_cents,
            total_sales_dollars: cents_to_dollars(total_sales_cents),
            last_sale_datetime: self.last_sale,
            last_sale_date: self
                .last_sale
                .map(|dt| dt.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            last_sale_time: self
                .last_sale
                .map(|dt| dt.format(TIME_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

/// Merges per-slot records of one file, keeping first-seen slot order
#[derive(Debug, Default)]
pub struct SlotAggregator {
    rows: Vec<SlotBuilder>,
    index: HashMap<String, usize>,
}

impl SlotAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a decoded record; machine-level records are ignored
    ///
    /// A later record of the same kind for a slot replaces the fields that
    /// kind defines and leaves the others alone.
    pub fn apply(&mut self, record: &DexRecord) {
        match record {
            DexRecord::ProductInfo(info) => {
                self.entry(&info.slot).price_cents = info.price_cents;
            }
            DexRecord::SalesCounters(counters) => {
                self.entry(&counters.slot).counters = counters.clone();
            }
            DexRecord::LastSaleTime(last) => {
                self.entry(&last.slot).last_sale = last.datetime;
            }
            DexRecord::MachineId(_) | DexRecord::MachineTotals(_) => {}
        }
    }

    /// Number of distinct slots seen so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Emit one row per slot, in the order slots were first seen
    pub fn finish(self, machine_id: &str) -> Vec<SalesRow> {
        self.rows
            .into_iter()
            .map(|builder| builder.build(machine_id))
            .collect()
    }

    fn entry(&mut self, slot: &str) -> &mut SlotBuilder {
        let next = self.rows.len();
        let idx = *self.index.entry(slot.to_string()).or_insert(next);
        if idx == next {
            self.rows.push(SlotBuilder {
                slot: slot.to_string(),
                ..Default::default()
            });
        }
        &mut self.rows[idx]
    }
}
