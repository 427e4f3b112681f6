// End-to-end decoding of DEX captures
use dex_log_decoder::{Decoder, DecoderError, SalesRow};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE: &str = "\
DXS*RST7654321*VA*V0/6*1
ST*001*0001
ID1*WTN11241500105*VE5 *6*1234**0
VA1*0006425*0085*0000*0000
PA1*010*0075
PA2*010*0035*0002625*0000*0000
PA5*010*250804*1345
PA1*020*0100
PA2*020*0030*0003000*0020*0002000
PA5*020*250803*0910
EA2*EGS*0*0
PA1*030*0125
G85*1234
SE*12*0001
DXE*1*1
";

fn process(text: &str) -> (Vec<SalesRow>, dex_log_decoder::MachineInfo) {
    Decoder::new().process_text(text, Path::new("sample.log")).into_parts()
}

#[test]
fn test_scenario_inline_records() {
    let (rows, info) = process("*PA1*041*0075**PA2*041*0035*0002625*0000*0000**ID1*WTN11241500105**");

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.slot, "041");
    assert_eq!(row.price_cents, 75);
    assert_eq!(row.vends_cash, 35);
    assert_eq!(row.cash_sales_cents, 2625);
    assert_eq!(row.vends_cashless, 0);
    assert_eq!(row.cashless_sales_cents, 0);
    assert_eq!(row.total_vends, 35);
    assert_eq!(row.total_sales_cents, 2625);
    assert_eq!(info.machine_id, "WTN11241500105");
}

#[test]
fn test_scenario_empty_file() {
    let (rows, info) = process("");
    assert!(rows.is_empty());
    assert_eq!(info.machine_id, "");
    assert_eq!(info.total_vends, 0);
    assert_eq!(info.total_sales_cents, 0);
    assert_eq!(info.file_name, "sample.log");
}

#[test]
fn test_sample_capture() {
    let file = Decoder::new().process_text(SAMPLE, Path::new("sample.log"));
    let rows = &file.sales_rows;

    let slots: Vec<_> = rows.iter().map(|r| r.slot.as_str()).collect();
    assert_eq!(slots, vec!["010", "020", "030"]);

    assert_eq!(rows[1].price_dollars, 1.0);
    assert_eq!(rows[1].total_vends, 50);
    assert_eq!(rows[1].total_sales_cents, 5000);
    assert_eq!(rows[1].last_sale_date, "2025-08-03");
    assert_eq!(rows[1].last_sale_time, "09:10");

    // Price only, no counters
    assert_eq!(rows[2].price_cents, 125);
    assert_eq!(rows[2].total_vends, 0);
    assert!(rows[2].last_sale_datetime.is_none());

    assert_eq!(file.machine_info.machine_id, "WTN11241500105");
    assert_eq!(file.machine_info.total_sales_cents, 6425);
    assert_eq!(file.machine_info.total_vends, 85);
    assert_eq!(file.stats.malformed, 0);
    assert_eq!(file.stats.unrecognized, 6);
}

#[test]
fn test_price_property() {
    for price in [0u64, 1, 75, 125, 9999, 123456] {
        let (rows, _) = process(&format!("PA1*007*{:06}\n", price));
        assert_eq!(rows[0].price_cents, price);
        assert_eq!(rows[0].price_dollars, price as f64 / 100.0);
    }
}

#[test]
fn test_totals_are_additive() {
    let (rows, _) = process(SAMPLE);
    for row in &rows {
        assert_eq!(row.total_vends, row.vends_cash + row.vends_cashless);
        assert_eq!(row.total_sales_cents, row.cash_sales_cents + row.cashless_sales_cents);
    }
}

#[test]
fn test_idempotent() {
    let decoder = Decoder::new();
    let first = decoder.process_text(SAMPLE, Path::new("sample.log"));
    let second = decoder.process_text(SAMPLE, Path::new("sample.log"));
    assert_eq!(first, second);
}

#[test]
fn test_pa1_pa2_order_invariance() {
    let (a, _) = process("PA1*041*0075\nPA2*041*3*225*1*75\n");
    let (b, _) = process("PA2*041*3*225*1*75\nPA1*041*0075\n");
    assert_eq!(a, b);
}

#[test]
fn test_unrecognized_record_does_not_change_output() {
    let (baseline, baseline_info) = process(SAMPLE);

    let lines: Vec<&str> = SAMPLE.lines().collect();
    for at in 0..=lines.len() {
        let mut patched = lines.clone();
        patched.insert(at, "ZZ9*041*9999*9999");
        let (rows, info) = process(&patched.join("\n"));
        assert_eq!(rows, baseline, "inserted at line {}", at);
        assert_eq!(info, baseline_info);
    }
}

#[test]
fn test_bad_fields_default_to_zero() {
    let (rows, _) = process("PA1*041*7X5\nPA2*041*abc*0002625\nPA5*041*notadate*1345\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price_cents, 0);
    assert_eq!(rows[0].vends_cash, 0);
    assert_eq!(rows[0].cash_sales_cents, 2625);
    assert_eq!(rows[0].last_sale_datetime, None);
    assert_eq!(rows[0].last_sale_date, "");
}

#[test]
fn test_batch_with_unreadable_file() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.log");
    let missing = dir.path().join("missing.log");
    fs::write(&good, SAMPLE).unwrap();

    let batch = Decoder::new().process_multiple_files([&missing, &good]);

    assert_eq!(batch.sales_rows.len(), 3);
    assert_eq!(batch.machine_info.len(), 1);
    assert_eq!(batch.machine_info[0].file_name, "good.log");
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].path, missing);
    assert!(matches!(batch.failures[0].error, DecoderError::FileRead { .. }));
}

#[test]
fn test_batch_keeps_input_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("b.log");
    let second = dir.path().join("a.log");
    fs::write(&first, "ID1*FIRST\nPA1*1*10\n").unwrap();
    fs::write(&second, "ID1*SECOND\nPA1*1*20\nPA1*2*30\n").unwrap();

    let batch = Decoder::new().process_multiple_files([&first, &second]);
    let ids: Vec<_> = batch.sales_rows.iter().map(|r| r.machine_id.as_str()).collect();
    assert_eq!(ids, vec!["FIRST", "SECOND", "SECOND"]);
    assert_eq!(batch.stats.records, 5);

    // Same slot in two files stays two rows
    let (rows, infos) = batch.into_parts();
    assert_eq!(rows.iter().filter(|r| r.slot == "1").count(), 2);
    assert_eq!(infos.len(), 2);
}

#[test]
fn test_max_counter_values_do_not_overflow() {
    let (rows, _) = process("PA2*041*18446744073709551615*0*1*0\nPA2*042*5*18446744073709551615*0*1\n");

    assert_eq!(rows[0].vends_cash, u64::MAX);
    assert_eq!(rows[0].vends_cashless, 1);
    assert_eq!(rows[0].total_vends, u64::MAX);
    assert_eq!(rows[1].total_sales_cents, u64::MAX);
}
