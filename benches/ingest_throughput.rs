//! Decode and ingest throughput benchmarks.
//!
//! # Benchmarks
//!
//! - `decode_line`: single-row decode, with and without a focal-mechanism block
//! - `ingest_reader`: full import of an in-memory catalog into `MemoryStore`
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench ingest_throughput
//! ```

use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quakebase_core::{IngestOptions, Ingestor, MemoryStore, decode_line};

const PRIMARY_ROW: &str = "eq001,2020-01-01 00:00:00.000000+00:00,34.05,-118.25,5.2,Mw,10.0,120,15.3,California,USGS";
const FM_ROW: &str = "eq002,2020-01-01 00:00:00+00:00,34.05,-118.25,5.2,Mw,10.0,120,15.3,California,USGS,2020-01-01 00:00:01.500000+00:00,34.1,-118.2,5.1,Mw,11.0,80,20.0";

fn catalog(rows: usize) -> String {
    let mut out = String::from("eventID,datetime,latitude,longitude,magnitude,magType,depth,phasecount,azimuthGap,location,agency\n");
    for i in 0..rows {
        out.push_str(&format!(
            "ev{i},2020-01-01 00:00:{:02}.000000+00:00,34.05,-118.25,{:.1},Mw,10.0,120,15.3,California,USGS\n",
            i % 60,
            (i % 70) as f64 / 10.0
        ));
    }
    out
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_line");
    group.bench_function("primary", |b| b.iter(|| decode_line(black_box(PRIMARY_ROW))));
    group.bench_function("focal_mechanism", |b| b.iter(|| decode_line(black_box(FM_ROW))));
    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_reader");
    for rows in [1_000usize, 10_000] {
        let source = catalog(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &source, |b, source| {
            b.iter(|| {
                let mut ingestor =
                    Ingestor::with_options(MemoryStore::new(), IngestOptions::default()).unwrap();
                ingestor
                    .ingest_reader(Cursor::new(source.as_bytes()))
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_ingest);
criterion_main!(benches);
