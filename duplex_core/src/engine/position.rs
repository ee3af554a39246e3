use crate::engine::movegen;
use crate::engine::types::{
    BOARD_LEN, CapturedPiece, Color, Coord, EndReason, LEVEL_LOWER, LEVEL_UPPER, LogEntry, Move,
    Piece, PieceId, PieceKind, Variant,
};

/// 1段盤変種の片側あたり通常駒数。
const CLASSIC_REGULARS: u8 = 12;

/// 初期配置で駒を並べる段数（片側）。
const HOME_ROWS: u8 = 3;

/// 2段盤変種の片側あたり通常駒数（三角駒を除く）。
const STACKED_REGULARS: u8 = 11;

/// 青の三角駒の初期マス（x, z）。
const TRIANGLE_BLUE: (u8, u8) = (4, 7);

/// 赤の三角駒の初期マス（x, z）。
const TRIANGLE_RED: (u8, u8) = (3, u8::MIN);

/// 着手の適用に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ApplyMoveError {
    /// すでに終局している。
    GameOver,
    /// 指定された手が合法手ではない（強制捕獲の制限を含む）。
    IllegalMove,
    /// 手番ではない色の駒を動かそうとした。
    NotYourTurn,
    /// 指定された識別子の駒が存在しない。
    UnknownPiece,
}

/// 着手適用の結果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MoveOutcome {
    /// 同じ駒による連続捕獲が続くかどうか。true の間は手番が交代しない。
    pub continues_capture: bool,
    /// 着手適用後の新しい局面。
    pub position: Position,
}

/// アンドゥ履歴に積まれる着手前のスナップショット。
#[derive(Clone, Debug, Eq, PartialEq)]
struct Snapshot {
    /// 着手前の手番。
    current_player: Color,
    /// 着手前の棋譜。
    log: Vec<LogEntry>,
    /// 着手前の駒の集合。
    pieces: Vec<Piece>,
    /// 着手前の勝者。
    winner: Option<Color>,
}

/// 局面（駒の集合＋手番＋勝者＋棋譜＋アンドゥ履歴）。
///
/// 局面は不変であり、すべての遷移は新しい `Position` を生成する。
/// アンドゥ履歴と棋譜はこの局面が単独で所有し、局面間で共有されない。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    /// 現在の手番。
    current_player: Color,
    /// 棋譜（追記のみ）。
    log: Vec<LogEntry>,
    /// 盤上の駒の集合。
    pieces: Vec<Piece>,
    /// アンドゥ履歴（着手前スナップショットのスタック）。
    undo: Vec<Snapshot>,
    /// 盤面構成。
    variant: Variant,
    /// 勝者（終局時のみ）。
    winner: Option<Color>,
}

impl Position {
    /// 着手を適用し、新しい局面を返す。
    ///
    /// 着手前の局面はスナップショットとしてアンドゥ履歴に積まれる。
    /// 捕獲後に同じ駒へさらに捕獲手が残る場合、手番は交代せず
    /// `continues_capture` が true になる。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `ApplyMoveError::GameOver`: すでに終局している場合
    /// - `ApplyMoveError::UnknownPiece`: 指定識別子の駒が存在しない場合
    /// - `ApplyMoveError::NotYourTurn`: 手番ではない色の駒を指定した場合
    /// - `ApplyMoveError::IllegalMove`: 強制捕獲の制限を含め合法手でない場合
    ///
    pub fn apply_move(&self, piece: PieceId, mv: Move) -> Result<MoveOutcome, ApplyMoveError> {
        if self.winner.is_some() {
            return Err(ApplyMoveError::GameOver);
        }

        let mover = match self.piece(piece) {
            Some(value) => *value,
            None => return Err(ApplyMoveError::UnknownPiece),
        };
        if mover.color != self.current_player {
            return Err(ApplyMoveError::NotYourTurn);
        }
        if !movegen::allowed_moves(self, piece).contains(&mv) {
            return Err(ApplyMoveError::IllegalMove);
        }

        let captured = match mv.captured() {
            Some(id) => self.piece(id).map(|victim| CapturedPiece {
                color: victim.color,
                id,
                kind: victim.kind,
            }),
            None => None,
        };

        let snapshot = Snapshot {
            current_player: self.current_player,
            log: self.log.clone(),
            pieces: self.pieces.clone(),
            winner: self.winner,
        };
        let mut undo = self.undo.clone();
        undo.push(snapshot);

        let (pieces, was_kinged) = self.moved_pieces(&mover, mv);
        let mut next = Self {
            current_player: mover.color,
            log: self.log.clone(),
            pieces,
            undo,
            variant: self.variant,
            winner: None,
        };

        let continues = mv.is_capture() && !movegen::legal_moves(&next, piece, true).is_empty();
        let next_player = if continues {
            mover.color
        } else {
            mover.color.opponent()
        };
        next.current_player = next_player;

        let move_number = next_move_number(&self.log);
        next.log.push(LogEntry::Moved {
            captured,
            color: mover.color,
            from: mover.pos,
            kind: mover.kind,
            level_jump: mv.is_level_jump(),
            move_number,
            piece,
            to: mv.target(),
            was_kinged,
        });
        if was_kinged {
            next.log.push(LogEntry::Promoted {
                color: mover.color,
                move_number,
                piece,
                square: mv.target(),
            });
        }

        let opponent = mover.color.opponent();
        let winner = if next.count_of(opponent) == u8::MIN {
            Some((mover.color, EndReason::NoPieces(opponent)))
        } else if movegen::has_any_move(&next, next_player) {
            None
        } else {
            Some((next_player.opponent(), EndReason::NoLegalMoves))
        };

        match winner {
            Some((victor, reason)) => {
                next.winner = Some(victor);
                next.log.push(LogEntry::GameEnd {
                    blue_count: next.count_of(Color::Blue),
                    reason,
                    red_count: next.count_of(Color::Red),
                    total_moves: move_number,
                    winner: victor,
                });
                tracing::info!(winner = ?victor, reason = ?reason, "game over");
            }
            None => {
                if !continues {
                    next.log.push(LogEntry::TurnChanged { next: next_player });
                }
            }
        }

        tracing::debug!(
            piece = piece.index(),
            capture = mv.is_capture(),
            continues_capture = continues,
            "applied move"
        );

        Ok(MoveOutcome {
            continues_capture: continues,
            position: next,
        })
    }

    /// 指定色の残り駒数を返す。
    #[inline]
    #[must_use]
    pub fn count_of(&self, color: Color) -> u8 {
        let count = self.pieces_of(color).count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// 現在の手番を返す。
    #[inline]
    #[must_use]
    pub const fn current_player(&self) -> Color {
        self.current_player
    }

    /// 任意の駒集合から局面を生成する（テスト用）。
    ///
    /// - 駒は暗色マス上にあり、(x, z, level) が重複しないこと
    /// - 合法性（勝敗が未確定か等）は呼び出し側が保証する
    #[cfg(test)]
    #[must_use]
    pub(crate) fn from_raw(variant: Variant, pieces: Vec<Piece>, current_player: Color) -> Self {
        Self {
            current_player,
            log: Vec::new(),
            pieces,
            undo: Vec::new(),
            variant,
            winner: None,
        }
    }

    /// 指定変種の初期局面を返す。先手は赤。
    #[must_use]
    pub fn initial(variant: Variant) -> Self {
        Self {
            current_player: Color::Red,
            log: Vec::new(),
            pieces: initial_pieces(variant),
            undo: Vec::new(),
            variant,
            winner: None,
        }
    }

    /// 棋譜を返す。
    #[inline]
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// 着手適用後の駒集合を構築する（捕獲の除去・移動・昇格）。
    ///
    /// 戻り値の bool はこの着手で昇格が起きたかどうか。
    fn moved_pieces(&self, mover: &Piece, mv: Move) -> (Vec<Piece>, bool) {
        let target = mv.target();
        let was_kinged = !mover.is_king && self.variant.promotes_at(mover.color, target);

        let mut pieces = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            if Some(piece.id) == mv.captured() {
                continue;
            }
            if piece.id == mover.id {
                pieces.push(Piece {
                    color: piece.color,
                    id: piece.id,
                    is_king: piece.is_king || was_kinged,
                    kind: piece.kind,
                    pos: target,
                });
            } else {
                pieces.push(*piece);
            }
        }
        (pieces, was_kinged)
    }

    /// 指定識別子の駒を返す（存在しなければ `None`）。
    #[inline]
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    /// 指定マスを占有する駒を返す（空きマスなら `None`）。
    #[inline]
    #[must_use]
    pub fn piece_at(&self, coord: Coord) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.pos == coord)
    }

    /// 盤上の全駒を返す。
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// 指定色の駒を列挙する。
    #[inline]
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |piece| piece.color == color)
    }

    /// 探索用の軽量な後続局面を返す（crate 内部向け）。
    ///
    /// 捕獲の除去・移動・昇格のみを適用し、手番は常に交代する。
    /// 棋譜・アンドゥ履歴・勝者判定は持たない。連続捕獲の扱いは
    /// 呼び出し側（`Game` 層）の責務。
    pub(crate) fn successor(&self, piece: PieceId, mv: Move) -> Option<Self> {
        let mover = match self.piece(piece) {
            Some(value) => *value,
            None => return None,
        };

        let (pieces, _was_kinged) = self.moved_pieces(&mover, mv);
        Some(Self {
            current_player: mover.color.opponent(),
            log: Vec::new(),
            pieces,
            undo: Vec::new(),
            variant: self.variant,
            winner: None,
        })
    }

    /// 直前のスナップショットを丸ごと復元した局面を返す。
    ///
    /// 復元されるのは駒・手番・棋譜・勝者で、勝者の復元により終局が
    /// 取り消されることもある。履歴が空の場合は自身と等しい局面を返す。
    #[must_use]
    pub fn undo(&self) -> Self {
        let mut undo = self.undo.clone();
        match undo.pop() {
            Some(snapshot) => Self {
                current_player: snapshot.current_player,
                log: snapshot.log,
                pieces: snapshot.pieces,
                undo,
                variant: self.variant,
                winner: snapshot.winner,
            },
            None => self.clone(),
        }
    }

    /// 盤面構成を返す。
    #[inline]
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// 勝者を返す（終局していなければ `None`）。
    #[inline]
    #[must_use]
    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }
}

/// 指定変種の初期駒配置を生成する。
///
/// 2段盤変種では三角駒のマスを予約してから通常駒を詰める
/// （1マス1駒の不変条件を保つため）。
fn initial_pieces(variant: Variant) -> Vec<Piece> {
    let blue_rows = BOARD_LEN - HOME_ROWS;
    let mut pieces = Vec::new();

    match variant {
        Variant::Classic => {
            push_regulars(
                &mut pieces,
                Color::Red,
                LEVEL_LOWER,
                u8::MIN,
                HOME_ROWS,
                None,
                CLASSIC_REGULARS,
            );
            push_regulars(
                &mut pieces,
                Color::Blue,
                LEVEL_LOWER,
                blue_rows,
                BOARD_LEN,
                None,
                CLASSIC_REGULARS,
            );
        }
        Variant::Stacked => {
            push_regulars(
                &mut pieces,
                Color::Red,
                LEVEL_LOWER,
                u8::MIN,
                HOME_ROWS,
                Some(TRIANGLE_RED),
                STACKED_REGULARS,
            );
            push_triangle(&mut pieces, Color::Red, LEVEL_LOWER, TRIANGLE_RED);
            push_regulars(
                &mut pieces,
                Color::Blue,
                LEVEL_UPPER,
                blue_rows,
                BOARD_LEN,
                Some(TRIANGLE_BLUE),
                STACKED_REGULARS,
            );
            push_triangle(&mut pieces, Color::Blue, LEVEL_UPPER, TRIANGLE_BLUE);
        }
    }
    pieces
}

/// 棋譜から次の着手番号（1始まり）を求める。
fn next_move_number(log: &[LogEntry]) -> u16 {
    let moved = log
        .iter()
        .filter(|entry| matches!(entry, LogEntry::Moved { .. }))
        .count();
    let moved_u16 = u16::try_from(moved).unwrap_or(u16::MAX);
    moved_u16.saturating_add(1)
}

/// 指定した段範囲の暗色マスへ通常駒を x 優先順で詰める。
///
/// `reserved` のマスは飛ばし、`cap` 個で打ち切る。
fn push_regulars(
    pieces: &mut Vec<Piece>,
    color: Color,
    level: u8,
    z_start: u8,
    z_end: u8,
    reserved: Option<(u8, u8)>,
    cap: u8,
) {
    let mut count = u8::MIN;
    for x in u8::MIN..BOARD_LEN {
        for z in z_start..z_end {
            let pos = Coord { level, x, z };
            if !pos.is_dark() || reserved == Some((x, z)) || count >= cap {
                continue;
            }
            let index = u8::try_from(pieces.len()).unwrap_or(u8::MAX);
            pieces.push(Piece {
                color,
                id: PieceId::from_index_unchecked(index),
                is_king: false,
                kind: PieceKind::Regular,
                pos,
            });
            count = count.saturating_add(1);
        }
    }
}

/// 三角駒を1つ追加する。
fn push_triangle(pieces: &mut Vec<Piece>, color: Color, level: u8, square: (u8, u8)) {
    let (x, z) = square;
    let index = u8::try_from(pieces.len()).unwrap_or(u8::MAX);
    pieces.push(Piece {
        color,
        id: PieceId::from_index_unchecked(index),
        is_king: false,
        kind: PieceKind::Triangle,
        pos: Coord { level, x, z },
    });
}
