//! `duplex_core::ai::minimax` の性能計測（探索1回）。

use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::black_box;
use duplex_core::ai::types::Ai;
use duplex_core::{ai, engine};

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 深さ別に `minimax::Agent::select_move` を計測する。
fn bench_search_depths(criterion: &mut Criterion) {
    let position = engine::Position::initial(engine::Variant::Stacked);

    let mut group = criterion.benchmark_group("ai/minimax_select_move");
    for depth in [1_u8, 2, 3] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |bench, &d| {
            bench.iter_batched(
                || ai::minimax::Agent::new(d, u64::MIN),
                |mut agent| black_box(agent.select_move(&position)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    bench_search_depths(&mut criterion);

    criterion.final_summary();
}
