use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stackerz::core::{Board, GameState};
use stackerz::engine::best_move;
use stackerz::replay::{RecordedGame, ReplayPlayer};
use stackerz::types::{Action, Cell, PieceKind, TICK_MS};

fn bench_update(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("update_16ms", |b| {
        b.iter(|| {
            state.update(black_box(TICK_MS));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Cell::Block(PieceKind::I));
                }
            }
            let full = board.full_rows();
            board.clear_rows(black_box(&full))
        })
    });
}

fn bench_hard_drop_and_lock(c: &mut Criterion) {
    c.bench_function("hard_drop_lock", |b| {
        b.iter(|| {
            let mut state = GameState::new(black_box(7));
            state.hard_drop();
            state.update(TICK_MS);
            state.pieces_spawned()
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    let mut dx = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !state.try_move(dx) {
                dx = -dx;
            }
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut state = GameState::new(12345);

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            state.try_rotate();
        })
    });
}

fn bench_best_move(c: &mut Criterion) {
    let mut board = Board::new();
    for y in 14..20 {
        for x in 0..10 {
            if (x + y) % 4 != 0 {
                board.set(x, y, Cell::Garbage);
            }
        }
    }

    c.bench_function("best_move_lookahead", |b| {
        b.iter(|| best_move(black_box(&board), PieceKind::T, Some(PieceKind::S), 0.35))
    });
}

fn bench_replay(c: &mut Criterion) {
    let mut live = RecordedGame::new(99);
    for frame in 0..2000u32 {
        if frame % 30 == 0 {
            live.apply(Action::Rotate);
            live.apply(Action::Drop);
        }
        live.update(TICK_MS);
    }
    let (_, blob) = live.finish();

    c.bench_function("replay_2000_ticks", |b| {
        b.iter(|| {
            let mut player = ReplayPlayer::new(blob.clone()).unwrap();
            player.run_to_end();
            player.state().score()
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_line_clear,
    bench_hard_drop_and_lock,
    bench_try_move,
    bench_try_rotate,
    bench_best_move,
    bench_replay
);
criterion_main!(benches);
