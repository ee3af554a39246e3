//! `duplex_core::engine` の性能計測（選択可能手の列挙、着手適用）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::Criterion;
use duplex_core::engine;
use duplex_core::engine::movegen;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 初期局面（赤番）の代表的な1手を返す。
fn opening_choice(position: &engine::Position) -> Option<(engine::PieceId, engine::Move)> {
    let options = movegen::selectable_moves(position);
    let entry = match options.first() {
        Some(value) => value,
        None => return None,
    };
    match entry.moves.first() {
        Some(mv) => Some((entry.piece, *mv)),
        None => None,
    }
}

/// `Position::apply_move` を計測する。
fn bench_apply_move(criterion: &mut Criterion) {
    let position = engine::Position::initial(engine::Variant::Stacked);
    let (piece, mv) = match opening_choice(&position) {
        Some(value) => value,
        None => return,
    };

    criterion.bench_function("engine/apply_move_opening", |bench| {
        bench.iter_batched(
            || position.clone(),
            |fresh| black_box(fresh.apply_move(piece, mv)),
            BatchSize::SmallInput,
        );
    });
}

/// `movegen::selectable_moves` を計測する。
fn bench_selectable_moves(criterion: &mut Criterion) {
    let position = engine::Position::initial(engine::Variant::Stacked);

    criterion.bench_function("engine/selectable_moves_initial", |bench| {
        bench.iter(|| black_box(movegen::selectable_moves(&position)));
    });
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    bench_apply_move(&mut criterion);
    bench_selectable_moves(&mut criterion);

    criterion.final_summary();
}
