use cc_compactor::scorer::ImportanceScorer;
use cc_compactor::{Compactor, CompressionConfig, CompressionLevel, Declaration, SecurityFinding, Severity, SourceFile};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

const LINES: &[&str] = &[
    "import os",
    "# a comment describing the next few lines in some detail",
    "",
    "    total = left + right",
    "    return total",
    "if ready:",
    "    for item in items:",
    "        print(item)",
    "    rows = cursor.execute(query)",
    "    timeout = config.get(\"timeout\")",
    "    await worker.join()",
    "    do_work()",
];

fn generate_source(lines: usize, language: &str) -> SourceFile {
    let mut rng = rand::thread_rng();
    let body: Vec<&str> = (0..lines).map(|_| LINES[rng.gen_range(0..LINES.len())]).collect();
    let findings = (0..lines / 100)
        .map(|_| SecurityFinding::new(rng.gen_range(1..=lines), Severity::High, "bench"))
        .collect();
    let declarations = (0..lines / 50)
        .map(|i| Declaration::new("function", format!("f{i}"), i * 50 + 1, i * 50 + 40))
        .collect();
    SourceFile::new("bench.py", language, body.join("\n"))
        .with_findings(findings)
        .with_declarations(declarations)
}

fn bench_process(c: &mut Criterion) {
    let small = generate_source(200, "javascript");
    let large = generate_source(5_000, "javascript");

    for &(name, level) in &[
        ("low", CompressionLevel::Low),
        ("medium", CompressionLevel::Medium),
        ("aggressive", CompressionLevel::Aggressive),
    ] {
        let compactor = Compactor::new(CompressionConfig::new(level));
        c.bench_function(&format!("process_{name}_200"), |b| {
            b.iter(|| black_box(compactor.process(black_box(&small))))
        });
        c.bench_function(&format!("process_{name}_5000"), |b| {
            b.iter(|| black_box(compactor.process(black_box(&large))))
        });
    }
}

fn bench_process_python(c: &mut Criterion) {
    let file = generate_source(1_000, "python");
    let compactor = Compactor::new(CompressionConfig::new(CompressionLevel::High));
    c.bench_function("process_python_guarded_1000", |b| {
        b.iter(|| black_box(compactor.process(black_box(&file))))
    });
}

fn bench_score(c: &mut Criterion) {
    let file = generate_source(5_000, "javascript");
    let lines = file.lines();
    let scorer = ImportanceScorer::from_config(&CompressionConfig::default());
    c.bench_function("score_5000", |b| {
        b.iter(|| black_box(scorer.score(black_box(&lines), &file)))
    });
}

criterion_group!(benches, bench_process, bench_process_python, bench_score);
criterion_main!(benches);
