use crate::engine::movegen::{self, PieceMoves};
use crate::engine::position::Position;
use crate::engine::types::{Move, PieceId};

/// AIが選択した1手（駒と手の組）。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Choice {
    /// 指す手。
    pub mv: Move,
    /// 動かす駒の識別子。
    pub piece: PieceId,
}

/// コンピュータ対戦相手の難易度。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Difficulty {
    /// ランダム戦略。
    Easy,
    /// αβ枝刈りつきミニマックス探索。
    Hard,
    /// 盤面評価つき貪欲戦略。
    Medium,
}

impl Difficulty {
    /// 難易度の説明文を返す。
    #[inline]
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Easy => "Makes random moves",
            Self::Hard => "Uses advanced strategy with 4-move lookahead",
            Self::Medium => "Prioritizes captures and advancement",
        }
    }
}

/// 手を選択するAI。
pub trait Ai {
    /// 与えられた候補（選択可能な駒とその手の一覧）から1手選ぶ。
    ///
    /// 候補が空なら `None` を返す。連続捕獲の継続手の選択にも、
    /// 候補を絞った上でこのメソッドが使われる。
    fn choose(&mut self, position: &Position, options: &[PieceMoves]) -> Option<Choice>;

    /// 現在局面の選択可能手（強制捕獲ルール適用済み）から1手選ぶ。
    fn select_move(&mut self, position: &Position) -> Option<Choice> {
        let options = movegen::selectable_moves(position);
        self.choose(position, &options)
    }
}

/// 候補一覧を（駒, 手）の組へ平坦化する。
pub(crate) fn flatten(options: &[PieceMoves]) -> Vec<Choice> {
    let mut choices = Vec::new();
    for entry in options {
        for mv in &entry.moves {
            choices.push(Choice {
                mv: *mv,
                piece: entry.piece,
            });
        }
    }
    choices
}
