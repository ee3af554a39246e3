use crate::ai::rng::Lcg64;
use crate::ai::types::{Ai, Choice, flatten};
use crate::engine::movegen::PieceMoves;
use crate::engine::position::Position;
use crate::engine::types::{Coord, Piece};

/// 中央寄りスコアの基準値。
const CENTER_BASE: i32 = 14;

/// スコア上位の何手から一様に選ぶか。
const TOP_WINDOW: usize = 3;

/// 前進1段あたりの重み。
const WEIGHT_ADVANCE: i32 = 8;

/// 捕獲の重み（支配項）。
const WEIGHT_CAPTURE: i32 = 40;

/// 昇格マス到達の重み。
const WEIGHT_PROMOTION: i32 = 60;

/// 盤面評価つきの貪欲AI。
///
/// 全候補をヒューリスティックで採点して降順に並べ、上位3手（足りなければ
/// ある分だけ）から一様に選ぶ。毎回同じ手にならないようにするための揺らぎ。
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
    fn choose(&mut self, position: &Position, options: &[PieceMoves]) -> Option<Choice> {
        let mut scored: Vec<(i32, Choice)> = flatten(options)
            .into_iter()
            .map(|choice| (score_choice(position, choice), choice))
            .collect();
        if scored.is_empty() {
            return None;
        }

        scored.sort_by(|&(score_a, choice_a), &(score_b, choice_b)| {
            score_b
                .cmp(&score_a)
                .then_with(|| tie_key(choice_a).cmp(&tie_key(choice_b)))
        });

        let window = scored.len().min(TOP_WINDOW);
        let index = match self.rng.next_index(window) {
            Some(value) => value,
            None => return None,
        };
        scored.get(index).map(|&(_score, choice)| choice)
    }
}

/// 盤中央への近さを採点する（中央ほど大きい）。
fn centrality(target: Coord) -> i32 {
    let dx = i32::from(target.x)
        .wrapping_mul(2)
        .wrapping_sub(7)
        .wrapping_abs();
    let dz = i32::from(target.z)
        .wrapping_mul(2)
        .wrapping_sub(7)
        .wrapping_abs();
    CENTER_BASE.wrapping_sub(dx.wrapping_add(dz))
}

/// 前進量を返す（自色の前進方向に進んだ段数。後退は負）。
fn forward_progress(piece: &Piece, target: Coord) -> i32 {
    let diff = i32::from(target.z).wrapping_sub(i32::from(piece.pos.z));
    diff.wrapping_mul(i32::from(piece.color.forward()))
}

/// 候補1手を採点する。捕獲・昇格・前進・中央寄りを重み付けして合算する。
fn score_choice(position: &Position, choice: Choice) -> i32 {
    let piece = match position.piece(choice.piece) {
        Some(value) => value,
        None => return i32::MIN,
    };
    let target = choice.mv.target();

    let mut score = 0_i32;
    if choice.mv.is_capture() {
        score = score.wrapping_add(WEIGHT_CAPTURE);
    }
    score = score.wrapping_add(forward_progress(piece, target).wrapping_mul(WEIGHT_ADVANCE));
    score = score.wrapping_add(centrality(target));
    if !piece.is_king && position.variant().promotes_at(piece.color, target) {
        score = score.wrapping_add(WEIGHT_PROMOTION);
    }
    score
}

/// 同点時の決定的な並び順キー。
const fn tie_key(choice: Choice) -> (u8, u8, u8, u8) {
    let target = choice.mv.target();
    (choice.piece.index(), target.x, target.z, target.level)
}
