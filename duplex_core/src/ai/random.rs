use crate::ai::rng::Lcg64;
use crate::ai::types::{Ai, Choice, flatten};
use crate::engine::movegen::PieceMoves;
use crate::engine::position::Position;

/// 候補からランダムに1手を選択するAI。
#[derive(Debug)]
#[non_exhaustive]
pub struct Agent {
    /// 乱数生成器。
    rng: Lcg64,
}

impl Agent {
    /// `seed` を用いて初期化する。
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Lcg64::new(seed),
        }
    }
}

impl Ai for Agent {
    #[inline]
    fn choose(&mut self, _position: &Position, options: &[PieceMoves]) -> Option<Choice> {
        let choices = flatten(options);
        let index = match self.rng.next_index(choices.len()) {
            Some(value) => value,
            None => return None,
        };
        choices.get(index).copied()
    }
}
