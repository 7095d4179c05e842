/// 局面スナップショットと着手実行の実装。
pub mod board;
/// 着手記述子の実装。
pub mod moves;
/// 合法手生成・利き判定の実装。
pub(crate) mod rules;
pub mod types;

pub type Board = board::Board;
pub type Color = types::Color;
pub type ExecuteMoveError = board::ExecuteMoveError;
pub type Move = moves::Move;
pub type Piece = types::Piece;
pub type PieceKind = types::PieceKind;
pub type Square = types::Square;
pub type Status = board::Status;
