use crate::engine::board::Board;
use crate::engine::types::{Piece, Square};
use crate::ui::orientation::Orientation;

/// クリック処理の結果。
///
/// `Ignored` 以外はすべて状態遷移を伴うため、シェル側は再描画を
/// 予約する。再描画要求は冪等で、連続しても1回にまとめてよい。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ClickOutcome {
    /// 選択を取り消した。
    Cancelled,
    /// 状態変化なし（再描画不要）。
    Ignored,
    /// 着手が受理され、局面が入れ替わった。
    MoveAccepted,
    /// 着手が拒否された（選択は解除済み）。
    MoveRejected,
    /// 移動元を選択した。
    Selected,
}

impl ClickOutcome {
    /// 再描画が必要かを返す。
    #[inline]
    #[must_use]
    pub const fn needs_redraw(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// マウスボタンの区別。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum MouseButton {
    /// 左ボタン（選択／着手）。
    Left,
    /// その他のボタン（無視される）。
    Other,
    /// 右ボタン（選択解除）。
    Right,
}

/// 着手パイプラインの結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum MoveOutcome {
    /// 受理。着手後の局面を持つ。
    Accepted(Board),
    /// 拒否。アクティブな局面は変化しない。
    Rejected,
}

/// 移動元の選択状態。
///
/// 駒と移動元は必ず対で記録される（片方だけが残ることはない）。
/// 記録した駒は選択時点の局面から読んだ値であり、局面が入れ替わった
/// 後は `legal_destinations` の手番チェックで無効化される。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SelectionState {
    /// 未選択。
    Idle,
    /// 移動元を選択済み。
    SourceSelected {
        /// 選択時に読み取った駒。
        piece: Piece,
        /// 移動元のマス。
        source: Square,
    },
}

/// 盤面・表示向き・選択状態を所有するコントローラ。
///
/// クリックは1本の論理スレッドから直列に届く前提で、局面の入れ替えは
/// `on_click` の中でのみ行う。
#[derive(Debug)]
pub struct Table {
    /// アクティブな局面。受理された着手でのみ入れ替わる。
    board: Board,
    /// 盤の表示向き。
    orientation: Orientation,
    /// 移動元の選択状態。
    selection: SelectionState,
}

impl Table {
    /// アクティブな局面を返す。
    #[inline]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// 初期局面・標準向き・未選択で開始する。
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            orientation: Orientation::Normal,
            selection: SelectionState::Idle,
        }
    }

    /// 1回のクリックを処理する。
    ///
    /// - 右クリック: 常に選択解除。他の解釈より優先される。
    /// - 左クリック（未選択時）: 駒のあるマスなら手番に関係なく選択。
    /// - 左クリック（選択済み時）: そのマスを移動先として着手を試み、
    ///   受理/拒否に関わらず選択を解除する。
    /// - その他のボタン: 何もしない。
    pub fn on_click(&mut self, square: Square, button: MouseButton) -> ClickOutcome {
        match button {
            MouseButton::Left => self.on_left_click(square),
            MouseButton::Other => ClickOutcome::Ignored,
            MouseButton::Right => {
                let outcome = match self.selection {
                    SelectionState::Idle => ClickOutcome::Ignored,
                    SelectionState::SourceSelected { .. } => {
                        tracing::debug!("selection cancelled");
                        ClickOutcome::Cancelled
                    }
                };
                self.selection = SelectionState::Idle;
                outcome
            }
        }
    }

    /// 左クリックを処理する。
    fn on_left_click(&mut self, square: Square) -> ClickOutcome {
        match self.selection {
            SelectionState::Idle => match self.board.piece_at(square) {
                // 空のマスは移動元として記録しない。
                None => ClickOutcome::Ignored,
                Some(piece) => {
                    // 所有側の検査はここでは行わない（着手時と
                    // 問い合わせ時に行う）。
                    self.selection = SelectionState::SourceSelected {
                        piece,
                        source: square,
                    };
                    ClickOutcome::Selected
                }
            },
            SelectionState::SourceSelected { source, .. } => {
                // 受理/拒否に関わらず、ここで必ず選択を解除する。
                self.selection = SelectionState::Idle;

                match apply_move(&self.board, source, square) {
                    MoveOutcome::Accepted(next) => {
                        tracing::debug!(
                            from = source.index(),
                            to = square.index(),
                            "move accepted"
                        );
                        self.board = next;
                        ClickOutcome::MoveAccepted
                    }
                    MoveOutcome::Rejected => {
                        tracing::debug!(
                            from = source.index(),
                            to = square.index(),
                            "move rejected"
                        );
                        ClickOutcome::MoveRejected
                    }
                }
            }
        }
    }

    /// 現在の表示向きを返す。
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// 現在の選択状態を返す。
    #[inline]
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// 表示向きを反転する。
    #[inline]
    pub fn toggle_orientation(&mut self) {
        self.orientation = self.orientation.opposite();
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// (移動元, 移動先) から着手を構築し、実行を試みる。
///
/// 構築できない組（ヌルムーブ）は実行側に渡さず拒否する。拒否は
/// このジェスチャの終端であり、再試行やエラー通知は行わない。
#[must_use]
pub fn apply_move(board: &Board, from: Square, to: Square) -> MoveOutcome {
    let mv = match board.build_move(from, to) {
        Some(value) => value,
        None => return MoveOutcome::Rejected,
    };

    match board.execute_move(mv) {
        Ok(next) => MoveOutcome::Accepted(next),
        Err(_err) => MoveOutcome::Rejected,
    }
}

/// 選択中の駒の合法な移動先ビットボードを返す。
///
/// 未選択の場合、および選択した駒の所有側が局面の手番と異なる場合は
/// 空集合（局面の入れ替えをまたいで残った選択をここで無効化する）。
#[must_use]
pub fn legal_destinations(selection: &SelectionState, board: &Board) -> u64 {
    match *selection {
        SelectionState::Idle => u64::MIN,
        SelectionState::SourceSelected { piece, source } => {
            if piece.color() != board.side_to_move() {
                return u64::MIN;
            }

            board.destinations_from(source)
        }
    }
}
