use crate::ai::greedy;
use crate::ai::types::{Ai, Choice, flatten};
use crate::engine::movegen::{self, PieceMoves};
use crate::engine::position::Position;
use crate::engine::types::{BOARD_LEN, Color, Piece};

/// 探索窓の初期幅（±∞の代用）。
const INF: i32 = 1_000_000;

/// 指し手なし（手詰まり・全滅）の終局評価の基準点。
const SCORE_WIN: i32 = 10_000;

/// キングの基礎価値。
const WEIGHT_KING: i32 = 50;

/// 通常駒の基礎価値。
const WEIGHT_MAN: i32 = 30;

/// αβ枝刈りつきミニマックス探索を行うAI。
///
/// 探索が1手も返せない退化した局面では貪欲戦略にフォールバックする。
#[derive(Debug)]
#[non_exhaustive]
pub struct Agent {
    /// 探索深さ（ply）。
    depth: u8,
    /// フォールバック用の貪欲戦略。
    fallback: greedy::Agent,
}

impl Agent {
    /// 探索深さを返す。
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// `depth` とフォールバック用の `seed` を指定して初期化する。
    #[inline]
    #[must_use]
    pub const fn new(depth: u8, seed: u64) -> Self {
        Self {
            depth,
            fallback: greedy::Agent::new(seed),
        }
    }
}

impl Ai for Agent {
    fn choose(&mut self, position: &Position, options: &[PieceMoves]) -> Option<Choice> {
        let depth = normalize_depth(self.depth);
        match select_best(position, options, depth) {
            Some(choice) => Some(choice),
            None => self.fallback.choose(position, options),
        }
    }
}

/// 静的評価（手番視点）。
///
/// 各駒の基礎価値（キング > 通常駒）に前進度を加え、
/// 手番側の合計から相手側の合計を引く。
fn evaluate(position: &Position) -> i32 {
    let side = position.current_player();
    let mut score = 0_i32;
    for piece in position.pieces() {
        let value = piece_value(piece);
        if piece.color == side {
            score = score.wrapping_add(value);
        } else {
            score = score.wrapping_sub(value);
        }
    }
    score
}

/// ネガマックス（αβ付き、手番視点）。
///
/// 指し手が無いノードは手番側の即負けとして扱い、深さが尽きたら
/// 静的評価を返す。後続局面では手番は常に交代する（連続捕獲の継続は
/// `Game` 層の責務であり、探索では追跡しない）。
fn negamax(position: &Position, depth: u8, alpha: i32, beta: i32) -> i32 {
    let options = movegen::selectable_moves(position);
    if options.is_empty() {
        return SCORE_WIN.wrapping_neg();
    }
    if depth == u8::MIN {
        return evaluate(position);
    }

    let mut alpha_mut = alpha;
    let mut best = i32::MIN;
    let next_depth = depth.wrapping_sub(1);

    for choice in flatten(&options) {
        let next = match position.successor(choice.piece, choice.mv) {
            Some(value) => value,
            None => continue,
        };
        let score = negamax(
            &next,
            next_depth,
            beta.wrapping_neg(),
            alpha_mut.wrapping_neg(),
        )
        .wrapping_neg();
        if score > best {
            best = score;
        }
        if best > alpha_mut {
            alpha_mut = best;
        }
        if alpha_mut >= beta {
            break;
        }
    }

    best
}

/// 探索深さを正規化する（0の場合は1にする）。
#[inline]
const fn normalize_depth(depth: u8) -> u8 {
    if depth == u8::MIN {
        u8::MIN.wrapping_add(1)
    } else {
        depth
    }
}

/// 駒1つの価値（基礎価値＋前進ボーナス）。
fn piece_value(piece: &Piece) -> i32 {
    let base = if piece.is_king {
        WEIGHT_KING
    } else {
        WEIGHT_MAN
    };
    let advance = match piece.color {
        Color::Blue => i32::from(BOARD_LEN - 1).wrapping_sub(i32::from(piece.pos.z)),
        Color::Red => i32::from(piece.pos.z),
    };
    base.wrapping_add(advance)
}

/// 候補から最善手を探索して返す（候補が空なら `None`）。
fn select_best(position: &Position, options: &[PieceMoves], depth: u8) -> Option<Choice> {
    let mut alpha = INF.wrapping_neg();
    let beta = INF;
    let mut best: Option<Choice> = None;
    let mut best_score = i32::MIN;
    let next_depth = depth.saturating_sub(1);

    for choice in flatten(options) {
        let next = match position.successor(choice.piece, choice.mv) {
            Some(value) => value,
            None => continue,
        };
        let score = negamax(&next, next_depth, beta.wrapping_neg(), alpha.wrapping_neg())
            .wrapping_neg();
        if score > best_score {
            best_score = score;
            best = Some(choice);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    if best.is_some() {
        tracing::debug!(depth, score = best_score, "minimax selected");
    }
    best
}
