use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use silver_diagnostics::{DiagnosticIndex, DiagnosticRecord, LogParser};

fn large_document(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        out.push_str(&format!("  var x{i:06}: Int := {i} // silver benchmark line\n"));
    }
    out
}

fn error_log(line_count: usize, diagnostics: usize) -> String {
    let step = (line_count / diagnostics).max(1);
    (0..diagnostics)
        .map(|i| {
            let line = 1 + i * step;
            let end = line + 1;
            format!("bench.vpr,{line}:3,{end}:20,Assertion might not hold.\n")
        })
        .collect()
}

fn records(line_count: usize, diagnostics: usize) -> Vec<DiagnosticRecord> {
    LogParser::new()
        .parse_str(&error_log(line_count, diagnostics))
        .unwrap()
}

fn bench_parse_log(c: &mut Criterion) {
    let log = error_log(10_000, 500);
    c.bench_function("parse_log/500_lines", |b| {
        b.iter(|| black_box(LogParser::new().parse_str(black_box(&log)).unwrap().len()))
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = large_document(10_000);
    let records = records(10_000, 500);
    c.bench_function("replace_all/500_diagnostics_10k_lines", |b| {
        b.iter_batched(
            DiagnosticIndex::new,
            |mut index| {
                index.replace_all(black_box(&records), black_box(&text)).unwrap();
                black_box(index.len());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cursor_lookup(c: &mut Criterion) {
    let text = large_document(10_000);
    let mut index = DiagnosticIndex::new();
    index.replace_all(&records(10_000, 50), &text).unwrap();

    let char_count = text.chars().count();
    let mut rng = rand::thread_rng();
    let offsets: Vec<usize> = (0..1_000).map(|_| rng.gen_range(0..char_count)).collect();

    c.bench_function("lookup/1000_cursor_moves_50_diagnostics", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(index.lookup(black_box(offset)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_parse_log,
    bench_replace_all,
    bench_cursor_lookup
);
criterion_main!(benches);
