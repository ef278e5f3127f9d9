use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use stringcol_core::{HeapResource, StringColumn};
use stringcol_wrap::{WrapOptions, wrap_with_options};

/// Deterministic mixed-content column: prose rows, long unbroken tokens,
/// empty rows, and a sprinkling of nulls.
fn build_column(rows: usize) -> StringColumn {
    let owned: Vec<Option<String>> = (0..rows)
        .map(|i| match i % 8 {
            0 => None,
            1 => Some(String::new()),
            2 => Some(format!("{}{}", "x".repeat(40 + i % 13), i)),
            _ => Some(format!(
                "the quick brown fox number {i} jumps over the lazy dog again and again"
            )),
        })
        .collect();
    let refs: Vec<Option<&str>> = owned.iter().map(|r| r.as_deref()).collect();
    StringColumn::from_rows(&refs)
}

fn bench_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");

    for &rows in &[1_000usize, 50_000] {
        let col = build_column(rows);
        group.throughput(Throughput::Bytes(col.buffer().len() as u64));

        for &threads in &[1usize, 4] {
            let options = WrapOptions::new(16).max_threads(threads);
            group.bench_with_input(
                BenchmarkId::new(format!("rows_{rows}"), format!("threads_{threads}")),
                &options,
                |b, options| {
                    b.iter(|| {
                        let out =
                            wrap_with_options(col.view(), options, &HeapResource).unwrap();
                        black_box(out.buffer().len())
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_wrap);
criterion_main!(benches);
