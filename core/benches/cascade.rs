use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use minedirector_core::*;
use std::hint::black_box;

const TIERS: [(&str, GameConfig); 3] = [
    ("beginner", GameConfig::new((9, 9), 10, EmulationMode::Win7)),
    ("intermediate", GameConfig::new((16, 16), 40, EmulationMode::Win7)),
    ("expert", GameConfig::EXPERT),
];

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in TIERS {
        let center = (config.size.0 / 2, config.size.1 / 2);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                RandomMineGenerator::new(seed)
                    .generate(config.size, config.mines, black_box(center), config.mode)
                    .map(|layout| layout.mine_count())
            })
        });
    }
    group.finish();
}

fn bench_flood_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");
    for (name, config) in TIERS {
        let layout = RandomMineGenerator::new(7)
            .generate(config.size, config.mines, (0, 0), config.mode)
            .expect("tier configs are valid");
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, layout| {
            b.iter_batched(
                || Game::with_layout(layout).expect("layout is valid"),
                |mut game| game.apply(black_box(Move::reveal((0, 0)))),
                BatchSize::SmallInput,
            )
        });
    }

    let open = MineLayout::from_mine_coords((200, 200), &[(199, 199)]).expect("mine is in bounds");
    group.bench_function("open_200x200", |b| {
        b.iter_batched(
            || Game::with_layout(&open).expect("layout is valid"),
            |mut game| game.apply(black_box(Move::reveal((0, 0)))),
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_generation, bench_flood_fill);
criterion_main!(benches);
