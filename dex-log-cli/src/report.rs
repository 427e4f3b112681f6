//! Report generation
//!
//! CSV export of sales rows, JSON export of machine info, and the text summary.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use dex_log_decoder::{MachineInfo, SalesRow};
use std::cmp::Reverse;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// How many slots the summary lists
const TOP_PRODUCTS: usize = 10;

/// Sort rows by machine, then slot
pub fn sort_rows(rows: &mut [SalesRow]) {
    rows.sort_by(|a, b| (&a.machine_id, &a.slot).cmp(&(&b.machine_id, &b.slot)));
}

/// Write sales rows as CSV, header first
pub fn write_sales_csv<W: Write>(writer: W, rows: &[SalesRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for row in rows {
        wtr.serialize(row).context("Failed to serialize sales row")?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write sales rows to a CSV file
pub fn write_sales_csv_file(path: &Path, rows: &[SalesRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    write_sales_csv(BufWriter::new(file), rows)
        .with_context(|| format!("Failed to write CSV file: {:?}", path))
}

/// Write machine info as pretty-printed JSON
pub fn write_machine_info_json(path: &Path, machines: &[MachineInfo]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create JSON file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, machines)
        .with_context(|| format!("Failed to write JSON file: {:?}", path))?;
    writer.flush()?;
    Ok(())
}

/// Sum a counter over rows, clamping at `u64::MAX`
fn total(rows: &[SalesRow], field: impl Fn(&SalesRow) -> u64) -> u64 {
    rows.iter().map(field).fold(0, u64::saturating_add)
}

/// Write the text summary of a batch
pub fn write_summary<W: Write>(out: &mut W, rows: &[SalesRow], machines: &[MachineInfo]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No sales data found.");
    }

    let latest_sale: Option<NaiveDateTime> = rows.iter().filter_map(|r| r.last_sale_datetime).max();

    writeln!(out, "\n=== SALES SUMMARY ===")?;
    writeln!(out, "Total products: {}", rows.len())?;
    writeln!(out, "Total vends: {}", total(rows, |r| r.total_vends))?;
    writeln!(out, "Total sales: {}", format_dollars(total(rows, |r| r.total_sales_cents)))?;
    writeln!(out, "Cash sales: {}", format_dollars(total(rows, |r| r.cash_sales_cents)))?;
    writeln!(out, "Cashless sales: {}", format_dollars(total(rows, |r| r.cashless_sales_cents)))?;
    if let Some(latest) = latest_sale {
        writeln!(out, "Latest sale: {}", latest.format("%Y-%m-%d %H:%M"))?;
    }

    writeln!(out, "\n=== TOP SELLING PRODUCTS ===")?;
    let mut top: Vec<&SalesRow> = rows.iter().collect();
    // Stable, so ties keep file order
    top.sort_by_key(|r| Reverse(r.total_vends));
    for row in top.into_iter().take(TOP_PRODUCTS) {
        writeln!(
            out,
            "Slot {}: {} vends, {} revenue, {} each",
            row.slot,
            row.total_vends,
            format_dollars(row.total_sales_cents),
            format_dollars(row.price_cents)
        )?;
    }

    writeln!(out, "\n=== MACHINE INFORMATION ===")?;
    for info in machines {
        let machine_id = if info.machine_id.is_empty() { "Unknown" } else { &info.machine_id };
        writeln!(out, "Machine ID: {}", machine_id)?;
        writeln!(out, "File: {}", info.file_name)?;
        writeln!(out, "Total machine sales: {}", format_dollars(info.total_sales_cents))?;
        writeln!(out, "Total machine vends: {}", info.total_vends)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Format cents as `$D.CC` without going through floating point
fn format_dollars(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
