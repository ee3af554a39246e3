/// ゲーム進行（選択・連続捕獲・アンドゥ）の実装。
pub mod game;
/// 合法手生成と強制捕獲判定の実装。
pub mod movegen;
/// 局面（駒の集合）と着手適用・終局判定の実装。
pub mod position;
pub mod types;

pub type Position = position::Position;
pub type Game = game::Game;
pub type Color = types::Color;
pub type Coord = types::Coord;
pub type Move = types::Move;
pub type Piece = types::Piece;
pub type PieceId = types::PieceId;
pub type PieceKind = types::PieceKind;
pub type Variant = types::Variant;
pub type LogEntry = types::LogEntry;
pub type PieceMoves = movegen::PieceMoves;
pub type GamePhase = game::Phase;
pub type GameStatus = game::Status;
pub type PlayError = game::PlayError;
pub type SelectError = game::SelectError;
pub type ApplyMoveError = position::ApplyMoveError;
pub type MoveOutcome = position::MoveOutcome;
