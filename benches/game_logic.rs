use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridfall::core::{sweep, GamePiece, Grid, PieceSpawner, ScoreState};

fn bench_place_and_sweep(c: &mut Criterion) {
    c.bench_function("place_and_sweep_full_row", |b| {
        b.iter(|| {
            let mut grid = Grid::new(5, 5);
            let mut scores = ScoreState::new();
            grid.place(&GamePiece::with_id(0), 1, 2);
            grid.place(&GamePiece::with_id(14), 4, 2);
            black_box(sweep(&mut grid, &mut scores))
        })
    });
}

fn bench_can_place(c: &mut Criterion) {
    let grid = Grid::new(5, 5);
    let plus = GamePiece::with_id(2);

    c.bench_function("can_place_scan", |b| {
        b.iter(|| {
            let mut fits = 0u32;
            for x in 0..5 {
                for y in 0..5 {
                    if grid.can_place(black_box(&plus), x, y) {
                        fits += 1;
                    }
                }
            }
            fits
        })
    });
}

fn bench_rotation(c: &mut Criterion) {
    c.bench_function("rotate_and_expand", |b| {
        b.iter(|| {
            let mut piece = GamePiece::with_id(5);
            piece.rotate(black_box(3));
            black_box(piece.blocks())
        })
    });
}

fn bench_piece_spawn(c: &mut Criterion) {
    let mut spawner = PieceSpawner::new(12345);

    c.bench_function("spawn_piece", |b| {
        b.iter(|| black_box(spawner.spawn()))
    });
}

criterion_group!(
    benches,
    bench_place_and_sweep,
    bench_can_place,
    bench_rotation,
    bench_piece_spawn
);
criterion_main!(benches);
