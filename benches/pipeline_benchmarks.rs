use criterion::{Criterion, black_box, criterion_group, criterion_main};

use quizdr::generator::balancer::BalanceStrategy;
use quizdr::generator::pipeline::LocalGenerator;
use quizdr::generator::{QuestionSource, analyzer, chunker};

fn make_document(paragraphs: usize) -> String {
    let base = "The Water Cycle is a core concept in earth science. Evaporation moves \
        water from the surface into the atmosphere over time. However, the analysis \
        suggests that local conditions shift the balance considerably. Precipitation \
        returns the water to the ground as rain or snow. Groundwater has a slower \
        path back to the ocean than surface runoff does. ";
    base.repeat(paragraphs)
}

fn bench_chunking(c: &mut Criterion) {
    let text = make_document(40);

    c.bench_function("chunk (200 sentences)", |b| {
        b.iter(|| chunker::chunk(black_box(&text)))
    });
}

fn bench_analysis(c: &mut Criterion) {
    let text = make_document(40);
    let chunks = chunker::chunk(&text);

    c.bench_function("analyze (all chunks)", |b| {
        b.iter(|| {
            chunks
                .iter()
                .map(|chunk| analyzer::analyze(black_box(chunk)))
                .collect::<Vec<_>>()
        })
    });
}

fn bench_full_generation(c: &mut Criterion) {
    let text = make_document(40);

    c.bench_function("generate (30 questions)", |b| {
        b.iter(|| {
            let mut generator = LocalGenerator::seeded(BalanceStrategy::FirstN, 7);
            generator.generate(black_box(&text), 30).unwrap()
        })
    });
}

criterion_group!(benches, bench_chunking, bench_analysis, bench_full_generation);
criterion_main!(benches);
