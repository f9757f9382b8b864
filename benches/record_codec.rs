//! Benchmark suite for the record codec and streaming parser
//!
//! Compares parse and render throughput on generated files of increasing
//! size using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::{NaiveDate, NaiveTime};
use nacha_engine::records::{BatchHeader, EntryDetail, FileHeader};
use nacha_engine::{Batch, File, Reader, Writer};
use std::io::Cursor;

fn main() {
    divan::main();
}

/// Build a one-batch PPD file with the given number of entries
fn generate_file(entry_count: u64) -> File {
    let header = FileHeader {
        immediate_destination: "231380104".to_string(),
        immediate_origin: "121042882".to_string(),
        file_creation_date: NaiveDate::from_ymd_opt(2018, 6, 21).unwrap(),
        file_creation_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        ..FileHeader::default()
    };
    let batch_header = BatchHeader {
        service_class_code: 220,
        company_name: "ACME Corporation".to_string(),
        company_identification: "121042882".to_string(),
        standard_entry_class_code: "PPD".to_string(),
        company_entry_description: "PAYROLL".to_string(),
        effective_entry_date: NaiveDate::from_ymd_opt(2018, 6, 21).unwrap(),
        odfi_identification: "12104288".to_string(),
        ..BatchHeader::default()
    };

    let mut batch = Batch::new(batch_header).unwrap();
    for _ in 0..entry_count {
        let mut entry = EntryDetail {
            transaction_code: 22,
            dfi_account_number: "123456789".to_string(),
            amount: 10_500,
            individual_name: "Wade Arnold".to_string(),
            ..EntryDetail::default()
        };
        entry.set_rdfi("231380104");
        batch.add_entry(entry);
    }
    batch.create().expect("batch builds");

    let mut file = File::new(header);
    file.add_batch(batch);
    file.create().expect("file builds");
    file
}

fn render(file: &File) -> String {
    let mut out = Vec::new();
    Writer::new(&mut out).write(file).expect("writes");
    String::from_utf8(out).expect("ascii output")
}

/// Render a small file (100 entries)
#[divan::bench]
fn write_small(bencher: divan::Bencher) {
    let file = generate_file(100);
    bencher.bench(|| render(&file));
}

/// Render a large file (10,000 entries)
#[divan::bench]
fn write_large(bencher: divan::Bencher) {
    let file = generate_file(10_000);
    bencher.bench(|| render(&file));
}

/// Parse a small file (100 entries)
#[divan::bench]
fn read_small(bencher: divan::Bencher) {
    let content = render(&generate_file(100));
    bencher.bench(|| {
        Reader::new(Cursor::new(content.clone()))
            .read()
            .expect("parses")
    });
}

/// Parse a large file (10,000 entries)
#[divan::bench]
fn read_large(bencher: divan::Bencher) {
    let content = render(&generate_file(10_000));
    bencher.bench(|| {
        Reader::new(Cursor::new(content.clone()))
            .read()
            .expect("parses")
    });
}
