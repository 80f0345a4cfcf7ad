use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gridsweep::{BoardEngine, MineLayout};

fn flood_fill(c: &mut Criterion) {
    // single far-corner mine, so one reveal floods almost the whole board
    let layout = MineLayout::from_mine_coords((200, 200), &[(0, 0)]).unwrap();
    let engine = BoardEngine::with_layout(layout);

    c.bench_function("flood_fill_200x200", |b| {
        b.iter_batched(
            || engine.clone(),
            |mut engine| engine.reveal((199, 199)).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, flood_fill);
criterion_main!(benches);
