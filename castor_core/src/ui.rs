/// 盤の表示向きの実装。
pub mod orientation;
/// クリック操作の状態機械と着手パイプラインの実装。
pub mod table;

pub type ClickOutcome = table::ClickOutcome;
pub type MouseButton = table::MouseButton;
pub type MoveOutcome = table::MoveOutcome;
pub type Orientation = orientation::Orientation;
pub type SelectionState = table::SelectionState;
pub type Table = table::Table;

pub use table::{apply_move, legal_destinations};
