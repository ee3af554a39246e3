use crate::engine::position::Position;
use crate::engine::types::{Color, Coord, Move, Piece, PieceId, PieceKind};

/// 全斜め方向（キングおよび三角駒用）。
const DIRS_ALL: [(i8, i8); 4] = [(1_i8, 1_i8), (-1_i8, 1_i8), (1_i8, -1_i8), (-1_i8, -1_i8)];

/// 青の前進斜め2方向（z 減少側）。
const DIRS_BLUE: [(i8, i8); 2] = [(1_i8, -1_i8), (-1_i8, -1_i8)];

/// 赤の前進斜め2方向（z 増加側）。
const DIRS_RED: [(i8, i8); 2] = [(1_i8, 1_i8), (-1_i8, 1_i8)];

/// ある駒とその合法手のリストの組。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PieceMoves {
    /// 合法手のリスト（空になることはない）。
    pub moves: Vec<Move>,
    /// 駒の識別子。
    pub piece: PieceId,
}

/// 強制捕獲ルールを適用した上で、指定駒が実際に指せる手を返す。
///
/// 手番側に捕獲可能な駒が1つでもあれば、捕獲を持つ駒の捕獲手のみが許される。
/// 捕獲が無ければ通常の全合法手を返す。該当駒が存在しない場合は空を返す。
#[must_use]
pub fn allowed_moves(position: &Position, piece: PieceId) -> Vec<Move> {
    let found = match position.piece(piece) {
        Some(value) => value,
        None => return Vec::new(),
    };

    let forced = forced_captures(position, found.color);
    if forced.is_empty() {
        return legal_moves(position, piece, false);
    }

    forced
        .into_iter()
        .find(|entry| entry.piece == piece)
        .map_or_else(Vec::new, |entry| entry.moves)
}

/// 駒の移動可能な斜め方向集合を返す。
///
/// 通常駒は自色の前進2方向のみ、キングと三角駒は全4方向。
#[must_use]
const fn directions(piece: &Piece) -> &'static [(i8, i8)] {
    if piece.is_king || matches!(piece.kind, PieceKind::Triangle) {
        return &DIRS_ALL;
    }
    match piece.color {
        Color::Blue => &DIRS_BLUE,
        Color::Red => &DIRS_RED,
    }
}

/// 指定色の駒のうち、捕獲手を持つものとその捕獲手を列挙する。
///
/// このリストが空でないとき、手番側はリスト中の駒しか選択できない
/// （最大捕獲数の駒を強制するルールは意図的に採用しない）。
#[must_use]
pub fn forced_captures(position: &Position, color: Color) -> Vec<PieceMoves> {
    let mut captures = Vec::new();
    for piece in position.pieces_of(color) {
        let moves = legal_moves_of(position, piece, true);
        if !moves.is_empty() {
            captures.push(PieceMoves {
                moves,
                piece: piece.id,
            });
        }
    }
    captures
}

/// 指定色に1手でも合法手（通常移動・捕獲・レベルジャンプ）があるかを返す。
#[must_use]
pub fn has_any_move(position: &Position, color: Color) -> bool {
    position
        .pieces_of(color)
        .any(|piece| !legal_moves_of(position, piece, false).is_empty())
}

/// 指定駒の合法手を列挙する。
///
/// - 通常移動: 斜め1マス先が盤内・暗色・空きなら合法。`capture_only` では除外。
/// - 捕獲: 斜め1マス先に相手駒がいて、その先の着地マスが盤内・暗色・空きなら合法。
/// - レベルジャンプ（三角駒のみ）: 他レベルの同じ (x, z) が空きなら合法。
///   方向規則とは無関係に生成し、`capture_only` の絞り込みは最後の
///   フィルタで適用する（強制捕獲中にレベルジャンプが混ざることはない）。
///
/// 該当駒が存在しない場合は空を返す。
#[must_use]
pub fn legal_moves(position: &Position, piece: PieceId, capture_only: bool) -> Vec<Move> {
    match position.piece(piece) {
        Some(found) => legal_moves_of(position, found, capture_only),
        None => Vec::new(),
    }
}

/// `legal_moves` の本体（駒への参照を直接受け取る crate 内部向け）。
pub(crate) fn legal_moves_of(position: &Position, piece: &Piece, capture_only: bool) -> Vec<Move> {
    let mut moves = Vec::new();

    for &(dx, dz) in directions(piece) {
        let step = match piece.pos.offset(dx, dz) {
            Some(value) => value,
            None => continue,
        };

        match position.piece_at(step) {
            None => {
                if step.is_dark() && !capture_only {
                    moves.push(Move::Simple { target: step });
                }
            }
            Some(between) => {
                if between.color != piece.color {
                    if let Some(landing) = step.offset(dx, dz) {
                        if landing.is_dark() && position.piece_at(landing).is_none() {
                            moves.push(Move::Capture {
                                captured: between.id,
                                target: landing,
                            });
                        }
                    }
                }
            }
        }
    }

    if matches!(piece.kind, PieceKind::Triangle) {
        for &level in position.variant().levels() {
            if level == piece.pos.level {
                continue;
            }
            let target = Coord {
                level,
                x: piece.pos.x,
                z: piece.pos.z,
            };
            if position.piece_at(target).is_none() {
                moves.push(Move::LevelJump { target });
            }
        }
    }

    if capture_only {
        moves.retain(|mv| mv.is_capture());
    }
    moves
}

/// 手番側が選択できる駒とその手の一覧を返す。
///
/// 強制捕獲がある場合はその一覧をそのまま返し、無い場合は合法手を
/// 1つ以上持つ手番側の全駒を返す。終局後や手詰まりでは空になる。
#[must_use]
pub fn selectable_moves(position: &Position) -> Vec<PieceMoves> {
    let color = position.current_player();
    let forced = forced_captures(position, color);
    if !forced.is_empty() {
        return forced;
    }

    let mut selectable = Vec::new();
    for piece in position.pieces_of(color) {
        let moves = legal_moves_of(position, piece, false);
        if !moves.is_empty() {
            selectable.push(PieceMoves {
                moves,
                piece: piece.id,
            });
        }
    }
    selectable
}
