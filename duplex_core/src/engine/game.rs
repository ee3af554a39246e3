use crate::engine::movegen::{self, PieceMoves};
use crate::engine::position::{ApplyMoveError, Position};
use crate::engine::types::{Color, Move, PieceId, Variant};

/// ゲーム進行の段階。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Phase {
    /// 駒選択済みで、移動先の指定待ち。
    AwaitingDestination {
        /// 選択中の駒。
        piece: PieceId,
    },
    /// 駒の選択待ち。
    AwaitingSelection,
    /// 連続捕獲の継続中。同じ駒の捕獲手しか指せず、選択解除もできない。
    ContinuedCapture {
        /// 連続捕獲中の駒。
        piece: PieceId,
    },
    /// 終局。以後の操作は受け付けない。
    Terminal {
        /// 勝者。
        winner: Color,
    },
}

/// 手の適用（指す）に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum PlayError {
    /// すでに終局している。
    GameOver,
    /// 指定された手が現在の選択に対する合法手ではない。
    IllegalMove,
    /// 駒が選択されていない。
    NoSelection,
}

/// 駒の選択に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SelectError {
    /// すでに終局している。
    GameOver,
    /// 強制捕獲（または連続捕獲の継続）により他の駒を動かさなければならない。
    MoveElsewhereForced,
    /// その駒には合法手が無い。
    NoMoves,
    /// 手番ではない色の駒を選択した。
    NotYourTurn,
    /// 指定された識別子の駒が存在しない。
    UnknownPiece,
}

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
    /// 終局。
    GameOver {
        /// 勝者。
        winner: Color,
    },
    /// 進行中。
    InProgress {
        /// 現在の手番。
        current: Color,
    },
}

/// 1ゲームの進行（選択→着手→連続捕獲→終局）を管理する構造体。
///
/// 局面そのものの遷移は `Position` が担い、ここでは選択状態と
/// 連続捕獲の制限（同じ駒しか続けられない）を強制する。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    /// 現在の進行段階。
    phase: Phase,
    /// 現在の局面。
    position: Position,
}

impl Game {
    /// 現在の選択（または連続捕獲中の駒）に対して指せる手を返す。
    ///
    /// 駒が未選択・終局時は空を返す。連続捕獲中は捕獲手のみ返す。
    #[must_use]
    pub fn available_moves(&self) -> Vec<Move> {
        match self.phase {
            Phase::AwaitingDestination { piece } => movegen::allowed_moves(&self.position, piece),
            Phase::ContinuedCapture { piece } => movegen::legal_moves(&self.position, piece, true),
            Phase::AwaitingSelection | Phase::Terminal { .. } => Vec::new(),
        }
    }

    /// 駒の選択を解除する。
    ///
    /// 解除できるのは移動先待ちのときだけで、連続捕獲中の駒は解除できない。
    /// 解除したら true を返す。
    pub fn cancel_selection(&mut self) -> bool {
        match self.phase {
            Phase::AwaitingDestination { .. } => {
                self.phase = Phase::AwaitingSelection;
                true
            }
            Phase::AwaitingSelection | Phase::ContinuedCapture { .. } | Phase::Terminal { .. } => {
                false
            }
        }
    }

    /// 指定変種の初期局面からゲームを開始する。
    #[must_use]
    pub fn initial(variant: Variant) -> Self {
        Self::new(Position::initial(variant))
    }

    /// 既存の局面からゲームを再開する。
    #[must_use]
    pub fn new(position: Position) -> Self {
        let phase = match position.winner() {
            Some(winner) => Phase::Terminal { winner },
            None => Phase::AwaitingSelection,
        };
        Self { phase, position }
    }

    /// 現在の進行段階を返す。
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// 選択中の駒で1手指す。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `PlayError::GameOver`: すでに終局している場合
    /// - `PlayError::NoSelection`: 駒が選択されていない場合
    /// - `PlayError::IllegalMove`: 現在の選択に対する合法手でない場合
    ///
    pub fn play(&mut self, mv: Move) -> Result<Status, PlayError> {
        let piece = match self.phase {
            Phase::AwaitingDestination { piece } | Phase::ContinuedCapture { piece } => piece,
            Phase::AwaitingSelection => return Err(PlayError::NoSelection),
            Phase::Terminal { .. } => return Err(PlayError::GameOver),
        };

        if !self.available_moves().contains(&mv) {
            return Err(PlayError::IllegalMove);
        }

        let outcome = match self.position.apply_move(piece, mv) {
            Ok(value) => value,
            Err(err) => {
                return Err(match err {
                    ApplyMoveError::GameOver => PlayError::GameOver,
                    ApplyMoveError::IllegalMove
                    | ApplyMoveError::NotYourTurn
                    | ApplyMoveError::UnknownPiece => PlayError::IllegalMove,
                });
            }
        };

        self.position = outcome.position;
        self.phase = match self.position.winner() {
            Some(winner) => Phase::Terminal { winner },
            None => {
                if outcome.continues_capture {
                    Phase::ContinuedCapture { piece }
                } else {
                    Phase::AwaitingSelection
                }
            }
        };

        Ok(self.status())
    }

    /// 現在の局面を返す。
    #[inline]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// 駒を選択し、その駒で指せる手を返す。
    ///
    /// 選択済みの駒がある状態で別の駒を選び直すこともできる。
    /// 連続捕獲中は同じ駒の再選択のみ許される。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `SelectError::GameOver`: すでに終局している場合
    /// - `SelectError::UnknownPiece`: 指定識別子の駒が存在しない場合
    /// - `SelectError::NotYourTurn`: 手番ではない色の駒を選択した場合
    /// - `SelectError::MoveElsewhereForced`: 強制捕獲・連続捕獲により
    ///   別の駒を動かさなければならない場合
    /// - `SelectError::NoMoves`: その駒に合法手が無い場合
    ///
    pub fn select(&mut self, piece: PieceId) -> Result<Vec<Move>, SelectError> {
        match self.phase {
            Phase::Terminal { .. } => return Err(SelectError::GameOver),
            Phase::ContinuedCapture { piece: chained } => {
                if chained != piece {
                    return Err(SelectError::MoveElsewhereForced);
                }
                return Ok(self.available_moves());
            }
            Phase::AwaitingDestination { .. } | Phase::AwaitingSelection => {}
        }

        let found = match self.position.piece(piece) {
            Some(value) => *value,
            None => return Err(SelectError::UnknownPiece),
        };
        if found.color != self.position.current_player() {
            return Err(SelectError::NotYourTurn);
        }

        let forced = movegen::forced_captures(&self.position, found.color);
        if forced.is_empty() {
            let moves = movegen::legal_moves(&self.position, piece, false);
            if moves.is_empty() {
                return Err(SelectError::NoMoves);
            }
            self.phase = Phase::AwaitingDestination { piece };
            return Ok(moves);
        }

        match forced.into_iter().find(|entry| entry.piece == piece) {
            Some(entry) => {
                self.phase = Phase::AwaitingDestination { piece };
                Ok(entry.moves)
            }
            None => Err(SelectError::MoveElsewhereForced),
        }
    }

    /// いま選択できる駒とその手の一覧を返す。
    ///
    /// 連続捕獲中は継続中の駒だけが、その捕獲手とともに返る。
    #[must_use]
    pub fn selectable(&self) -> Vec<PieceMoves> {
        match self.phase {
            Phase::ContinuedCapture { piece } => {
                let moves = movegen::legal_moves(&self.position, piece, true);
                if moves.is_empty() {
                    return Vec::new();
                }
                vec![PieceMoves { moves, piece }]
            }
            Phase::Terminal { .. } => Vec::new(),
            Phase::AwaitingDestination { .. } | Phase::AwaitingSelection => {
                movegen::selectable_moves(&self.position)
            }
        }
    }

    /// 現在のゲーム状態を返す。
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        match self.position.winner() {
            Some(winner) => Status::GameOver { winner },
            None => Status::InProgress {
                current: self.position.current_player(),
            },
        }
    }

    /// 直前の着手を取り消す。
    ///
    /// 局面のスナップショットを丸ごと復元し、選択状態はリセットされる
    /// （連続捕獲の途中でも、復元後は駒の選択からやり直す）。
    /// 取り消す履歴が無ければ何もしない（false）。
    pub fn undo(&mut self) -> bool {
        let restored = self.position.undo();
        if restored == self.position {
            return false;
        }
        self.position = restored;
        self.phase = match self.position.winner() {
            Some(winner) => Phase::Terminal { winner },
            None => Phase::AwaitingSelection,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, Phase, PlayError, SelectError, Status};
    use crate::engine::position::Position;
    use crate::engine::types::{
        Color, Coord, LEVEL_LOWER, Move, Piece, PieceId, PieceKind, Variant,
    };

    /// テスト用の駒を生成する。
    fn piece(index: u8, color: Color, kind: PieceKind, x: u8, z: u8) -> Piece {
        Piece {
            color,
            id: PieceId::from_index_unchecked(index),
            is_king: false,
            kind,
            pos: Coord {
                level: LEVEL_LOWER,
                x,
                z,
            },
        }
    }

    #[test]
    fn select_then_play_advances_turn() {
        let mut game = Game::initial(Variant::Classic);
        assert_eq!(game.phase(), Phase::AwaitingSelection);

        let selectable = game.selectable();
        let entry = match selectable.first() {
            Some(value) => value.clone(),
            None => panic!("initial position must offer selectable pieces"),
        };

        let moves = match game.select(entry.piece) {
            Ok(value) => value,
            Err(err) => panic!("selection must succeed, got={err:?}"),
        };
        assert_eq!(game.phase(), Phase::AwaitingDestination { piece: entry.piece });

        let mv = match moves.first() {
            Some(value) => *value,
            None => panic!("selected piece must have moves"),
        };
        let status = match game.play(mv) {
            Ok(value) => value,
            Err(err) => panic!("play must succeed, got={err:?}"),
        };
        assert_eq!(status, Status::InProgress { current: Color::Blue });
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn play_without_selection_is_rejected() {
        let mut game = Game::initial(Variant::Classic);
        let mv = Move::Simple {
            target: Coord {
                level: LEVEL_LOWER,
                x: 1,
                z: 3,
            },
        };
        assert_eq!(game.play(mv), Err(PlayError::NoSelection));
    }

    #[test]
    fn forced_capture_blocks_other_selection() {
        let attacker = piece(0, Color::Red, PieceKind::Regular, 1, 2);
        let victim = piece(1, Color::Blue, PieceKind::Regular, 2, 3);
        let idle = piece(2, Color::Red, PieceKind::Regular, 6, 1);
        let bystander = piece(3, Color::Blue, PieceKind::Regular, 1, 6);
        let position = Position::from_raw(
            Variant::Classic,
            vec![attacker, victim, idle, bystander],
            Color::Red,
        );
        let mut game = Game::new(position);

        assert_eq!(game.select(idle.id), Err(SelectError::MoveElsewhereForced));

        let moves = match game.select(attacker.id) {
            Ok(value) => value,
            Err(err) => panic!("forced piece must be selectable, got={err:?}"),
        };
        assert!(moves.iter().all(|mv| mv.is_capture()), "got={moves:?}");
    }

    #[test]
    fn chained_capture_locks_the_selection() {
        let red = piece(0, Color::Red, PieceKind::Regular, 2, 1);
        let first = piece(1, Color::Blue, PieceKind::Regular, 3, 2);
        let second = piece(2, Color::Blue, PieceKind::Regular, 5, 4);
        let bystander = piece(3, Color::Blue, PieceKind::Regular, 1, 6);
        let position = Position::from_raw(
            Variant::Classic,
            vec![red, first, second, bystander],
            Color::Red,
        );
        let mut game = Game::new(position);

        let moves = match game.select(red.id) {
            Ok(value) => value,
            Err(err) => panic!("selection must succeed, got={err:?}"),
        };
        let jump = match moves.first() {
            Some(value) => *value,
            None => panic!("capture must be offered"),
        };
        let status = match game.play(jump) {
            Ok(value) => value,
            Err(err) => panic!("capture must apply, got={err:?}"),
        };

        // 連続捕獲中: 手番は赤のまま、選択は固定される。
        assert_eq!(status, Status::InProgress { current: Color::Red });
        assert_eq!(game.phase(), Phase::ContinuedCapture { piece: red.id });
        assert!(!game.cancel_selection());
        assert_eq!(
            game.select(bystander.id),
            Err(SelectError::MoveElsewhereForced)
        );

        let continuation = game.available_moves();
        assert!(
            continuation.iter().all(|mv| mv.is_capture()),
            "got={continuation:?}"
        );
        let follow_up = match continuation.first() {
            Some(value) => *value,
            None => panic!("continuation capture must exist"),
        };
        let final_status = match game.play(follow_up) {
            Ok(value) => value,
            Err(err) => panic!("continuation must apply, got={err:?}"),
        };
        assert_eq!(final_status, Status::InProgress { current: Color::Blue });
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn terminal_phase_rejects_selection() {
        let red = piece(0, Color::Red, PieceKind::Regular, 1, 2);
        let victim = piece(1, Color::Blue, PieceKind::Regular, 2, 3);
        let position = Position::from_raw(Variant::Classic, vec![red, victim], Color::Red);
        let mut game = Game::new(position);

        let moves = match game.select(red.id) {
            Ok(value) => value,
            Err(err) => panic!("selection must succeed, got={err:?}"),
        };
        let jump = match moves.first() {
            Some(value) => *value,
            None => panic!("capture must be offered"),
        };
        let status = match game.play(jump) {
            Ok(value) => value,
            Err(err) => panic!("winning capture must apply, got={err:?}"),
        };
        assert_eq!(status, Status::GameOver { winner: Color::Red });
        assert_eq!(game.phase(), Phase::Terminal { winner: Color::Red });
        assert_eq!(game.select(red.id), Err(SelectError::GameOver));
        assert!(game.selectable().is_empty());
    }

    #[test]
    fn undo_restores_previous_position_and_phase() {
        let mut game = Game::initial(Variant::Stacked);
        let before = game.position().clone();

        let selectable = game.selectable();
        let entry = match selectable.first() {
            Some(value) => value.clone(),
            None => panic!("initial position must offer selectable pieces"),
        };
        let moves = match game.select(entry.piece) {
            Ok(value) => value,
            Err(err) => panic!("selection must succeed, got={err:?}"),
        };
        let mv = match moves.first() {
            Some(value) => *value,
            None => panic!("selected piece must have moves"),
        };
        let play_result = game.play(mv);
        assert!(play_result.is_ok(), "got={play_result:?}");

        assert!(game.undo());
        assert_eq!(game.position(), &before);
        assert_eq!(game.phase(), Phase::AwaitingSelection);

        // 履歴が空になったら undo は何もしない。
        assert!(!game.undo());
    }
}
