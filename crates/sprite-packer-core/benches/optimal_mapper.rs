use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use sprite_packer_core::prelude::*;

fn generate_items(count: usize, min_size: u32, max_size: u32) -> Vec<Item<String>> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            Item::new(w, h, format!("img_{}", i))
        })
        .collect()
}

fn bench_mappers(c: &mut Criterion) {
    let mut group = c.benchmark_group("mappers");

    for count in [25, 50, 100] {
        let items = generate_items(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("Optimal", count), &items, |b, items| {
            let mut mapper = OptimalMapper::default();
            b.iter(|| black_box(mapper.map(items).unwrap()));
        });

        group.bench_with_input(
            BenchmarkId::new("Optimal_5_candidates", count),
            &items,
            |b, items| {
                let mut mapper = OptimalMapper::new(1.0, 5);
                b.iter(|| black_box(mapper.map(items).unwrap()));
            },
        );

        group.bench_with_input(BenchmarkId::new("Horizontal", count), &items, |b, items| {
            let mut mapper = HorizontalMapper;
            b.iter(|| black_box(mapper.map(items).unwrap()));
        });
    }

    group.finish();
}

fn bench_canvas(c: &mut Criterion) {
    let items = generate_items(200, 4, 32);
    c.bench_function("canvas_add_200", |b| {
        let mut canvas = Canvas::new();
        b.iter(|| {
            canvas.set_dimensions(512, 4096).unwrap();
            for it in &items {
                black_box(canvas.add_rectangle(it.width, it.height).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_mappers, bench_canvas);
criterion_main!(benches);
