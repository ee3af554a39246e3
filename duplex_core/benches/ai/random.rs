//! `duplex_core::ai::random` の性能計測（1手選択）。

use criterion::BatchSize;
use criterion::Criterion;
use criterion::black_box;
use duplex_core::ai::types::Ai;
use duplex_core::{ai, engine};

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// 指定手数だけランダムに進めた局面を返す（途中終局ならその時点の局面）。
fn position_after_plies(plies: u16) -> engine::Position {
    let mut game = engine::Game::initial(engine::Variant::Stacked);
    let mut red_agent = ai::random::Agent::new(u64::MIN);
    let mut blue_agent = ai::random::Agent::new(u64::MIN.wrapping_add(1));

    for _turn in u16::MIN..plies {
        if matches!(game.status(), engine::GameStatus::GameOver { .. }) {
            break;
        }

        let options = game.selectable();
        let choice_opt = match game.position().current_player() {
            engine::Color::Blue => blue_agent.choose(game.position(), &options),
            engine::Color::Red => red_agent.choose(game.position(), &options),
            _ => None,
        };
        let choice = match choice_opt {
            Some(value) => value,
            None => break,
        };

        if game.select(choice.piece).is_err() {
            break;
        }
        if game.play(choice.mv).is_err() {
            break;
        }
    }

    game.position().clone()
}

/// `random::Agent::select_move` を計測する。
fn bench_select_move(criterion: &mut Criterion) {
    let position = position_after_plies(12);

    criterion.bench_function("ai/random_select_move", |bench| {
        bench.iter_batched(
            || ai::random::Agent::new(42),
            |mut agent| black_box(agent.select_move(&position)),
            BatchSize::SmallInput,
        );
    });
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();

    bench_select_move(&mut criterion);

    criterion.final_summary();
}
