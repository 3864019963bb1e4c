// benches/matcher_bench.rs

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rrangetree::{
    DigitSequence, DigitSequenceMatcher, RangeTree, RegexBasedMatcher, RegexCache, RegexGenerator,
};

/// A realistic national numbering plan fragment: fixed lines, mobiles and
/// toll-free ranges of mixed lengths.
fn setup_range() -> RangeTree {
    [
        "11[2-7]xxxxxxx",
        "[2-7]xxxxxxxxx",
        "800xxxxxx",
        "800xxxxxxx",
        "1860xxxxxxx",
        "9[6-9]xxxxxxxx",
    ]
    .iter()
    .fold(RangeTree::empty(), |acc, p| {
        acc.union(&RangeTree::from_pattern(p).expect("valid pattern"))
    })
}

/// Inputs mixing matches, near misses and dead ends.
fn setup_inputs() -> Vec<DigitSequence> {
    [
        "1123456789",
        "112345",
        "11234567890",
        "5123456789",
        "800123456",
        "8001234567",
        "18601234567",
        "9612345678",
        "0123456789",
        "99999",
    ]
    .iter()
    .map(|s| s.parse().expect("valid digit sequence"))
    .collect()
}

fn matching_benchmark(c: &mut Criterion) {
    let range = setup_range();
    let inputs = setup_inputs();

    let bytecode = DigitSequenceMatcher::for_tree(&range);
    let cache = RegexCache::with_capacity(16);
    let generator = RegexGenerator::new()
        .with_tail_optimization()
        .with_dfa_factorization();
    let regex = RegexBasedMatcher::for_tree(&cache, &generator, &range);

    let mut group = c.benchmark_group("Range Matching");

    group.bench_function("bytecode: classify()", |b| {
        b.iter(|| {
            for seq in &inputs {
                let _ = bytecode.classify(black_box(seq));
            }
        })
    });

    group.bench_function("regex: classify()", |b| {
        b.iter(|| {
            for seq in &inputs {
                let _ = regex.classify(black_box(seq));
            }
        })
    });

    group.finish();
}

fn compilation_benchmark(c: &mut Criterion) {
    let range = setup_range();

    let mut group = c.benchmark_group("Range Compilation");

    group.bench_function("bytecode: compile", |b| {
        b.iter(|| DigitSequenceMatcher::for_tree(black_box(&range)))
    });

    group.bench_function("regex: generate", |b| {
        let generator = RegexGenerator::new().with_tail_optimization();
        b.iter(|| generator.generate(black_box(&range)).expect("non-empty range"))
    });

    group.finish();
}

criterion_group!(benches, matching_benchmark, compilation_benchmark);
criterion_main!(benches);
