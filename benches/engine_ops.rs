use console_2048::autoplay;
use console_2048::engine::{self as GameEngine, Direction, Grid};
use console_2048::game::Game;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = Vec::new();
    // Empty and two-tile starts
    grids.push(Grid::EMPTY);
    let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    grids.push(g);
    // Derive a variety of densities deterministically
    for i in 0..40 {
        let dir = Direction::ALL[i % Direction::ALL.len()];
        if g.shift(dir).changed {
            GameEngine::spawn_tile(&mut g, &mut rng);
        }
        grids.push(g);
    }
    grids
}

fn bench_shift(c: &mut Criterion) {
    let grids = corpus();
    for dir in Direction::ALL {
        c.bench_function(&format!("shift/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &g in &grids {
                    acc = acc.wrapping_add(g.shifted(dir).1.score);
                }
                black_box(acc)
            })
        });
    }
    c.bench_function("rotate/quarter", |bch| {
        bch.iter(|| {
            let mut acc = 0u8;
            for &g in &grids {
                acc ^= g.rotated().get(0, 0);
            }
            black_box(acc)
        })
    });
}

fn bench_queries(c: &mut Criterion) {
    let grids = corpus();
    c.bench_function("query/is_game_over", |bch| {
        bch.iter(|| grids.iter().filter(|g| GameEngine::is_game_over(g)).count())
    });
    c.bench_function("query/count_empty", |bch| {
        bch.iter(|| grids.iter().map(|g| g.count_empty()).sum::<usize>())
    });
}

fn bench_game(c: &mut Criterion) {
    c.bench_function("game/apply_move_cycle", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                let game = Game::new(&mut rng);
                (game, rng)
            },
            |(mut game, mut rng)| {
                for i in 0..64 {
                    if game.apply_move(Direction::ALL[i % 4], &mut rng).is_err() {
                        break;
                    }
                }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("autoplay/one_game", |bch| {
        let mut seed = 0;
        bch.iter(|| {
            seed += 1;
            black_box(autoplay::play_random_game(seed, 100_000).score)
        })
    });
}

criterion_group!(engine_ops, bench_shift, bench_queries, bench_game);
criterion_main!(engine_ops);
