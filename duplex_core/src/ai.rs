use crate::ai::types::Ai;
use crate::engine::movegen::PieceMoves;
use crate::engine::position::Position;

/// 盤面評価つき貪欲AI。
pub mod greedy;
/// αβ枝刈りつきミニマックス探索AI。
pub mod minimax;
/// 合法手からランダムに1手選ぶAI。
pub mod random;
/// seed 決定的な乱数生成器。
mod rng;
pub mod types;

pub type Choice = types::Choice;
pub type Difficulty = types::Difficulty;

/// Hard（ミニマックス）の探索深さ（ply）。
const MINIMAX_DEPTH: u8 = 4;

/// 難易度に応じた戦略のディスパッチ。
#[derive(Debug)]
#[non_exhaustive]
pub enum Engine {
    /// Medium: 盤面評価つき貪欲戦略。
    Greedy(greedy::Agent),
    /// Hard: αβ枝刈りつきミニマックス探索。
    Minimax(minimax::Agent),
    /// Easy: ランダム戦略。
    Random(random::Agent),
}

impl Engine {
    /// 難易度と乱数 seed から戦略を生成する。
    #[inline]
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Random(random::Agent::new(seed)),
            Difficulty::Hard => Self::Minimax(minimax::Agent::new(MINIMAX_DEPTH, seed)),
            Difficulty::Medium => Self::Greedy(greedy::Agent::new(seed)),
        }
    }
}

impl Ai for Engine {
    #[inline]
    fn choose(&mut self, position: &Position, options: &[PieceMoves]) -> Option<Choice> {
        match self {
            Self::Greedy(agent) => agent.choose(position, options),
            Self::Minimax(agent) => agent.choose(position, options),
            Self::Random(agent) => agent.choose(position, options),
        }
    }
}

/// 難易度を指定して現在局面の1手を選ぶ（UI 層向けの入口）。
///
/// エンジンは時計や乱数源を持たないため、揺らぎの `seed` は呼び出し側が渡す。
/// 指せる手が無ければ `None`。
#[must_use]
pub fn choose_move(position: &Position, difficulty: Difficulty, seed: u64) -> Option<Choice> {
    let mut strategy = Engine::for_difficulty(difficulty, seed);
    strategy.select_move(position)
}
