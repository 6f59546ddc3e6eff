use criterion::{black_box, criterion_group, criterion_main, Criterion};

use puzzle_adventure::core::{decode, encode};
use puzzle_adventure::gen::{GenerateRequest, LocalGenerator};
use puzzle_adventure::sim::{InputState, SimulationEngine};
use puzzle_adventure::types::TICK_MS;

fn bench_codec(c: &mut Criterion) {
    let generator = LocalGenerator::new();
    let spec = generator.generate(&GenerateRequest::new(10, "bench"), 1);
    let grid = spec.layout.to_grid().unwrap();
    let runs = encode(&grid);

    c.bench_function("codec_encode_8x8", |b| {
        b.iter(|| encode(black_box(&grid)))
    });

    c.bench_function("codec_decode_8x8", |b| {
        b.iter(|| decode(black_box(&runs), grid.size()).unwrap())
    });
}

fn bench_local_generation(c: &mut Criterion) {
    let generator = LocalGenerator::new();
    let request = GenerateRequest::new(7, "bench");

    c.bench_function("local_generate_skill_7", |b| {
        b.iter(|| generator.generate(black_box(&request), 1))
    });
}

fn bench_engine_tick(c: &mut Criterion) {
    let generator = LocalGenerator::new();
    let spec = generator.generate(&GenerateRequest::new(6, "bench"), 1);
    let mut engine = SimulationEngine::new();
    engine.load(spec).expect("bench level must load");

    let input = InputState {
        right: true,
        down: true,
        ..Default::default()
    };

    c.bench_function("engine_tick_16ms", |b| {
        b.iter(|| {
            engine.tick(black_box(TICK_MS), &input);
        })
    });
}

criterion_group!(benches, bench_codec, bench_local_generation, bench_engine_tick);
criterion_main!(benches);
