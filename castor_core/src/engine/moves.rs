use crate::engine::types::{PieceKind, Square};

/// 着手記述子。
///
/// (移動元, 移動先) を核とする値で、UI 側はそれ以上の内容を解釈しない。
/// 合法性の判定は生成側（`rules`）と実行側（`Board::execute_move`）が持つ。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Move {
    /// キャスリング。`from`/`to` はキングの移動。
    Castle {
        /// キングの移動元。
        from: Square,
        /// ルークの移動元。
        rook_from: Square,
        /// ルークの移動先。
        rook_to: Square,
        /// キングの移動先。
        to: Square,
    },
    /// ポーンの2マス前進。
    DoublePush {
        /// 移動元。
        from: Square,
        /// 移動先。
        to: Square,
    },
    /// アンパッサン。
    EnPassant {
        /// 取られるポーンのマス。
        captured: Square,
        /// 移動元。
        from: Square,
        /// 移動先。
        to: Square,
    },
    /// 通常の移動（取りを含む）。
    Normal {
        /// 移動元。
        from: Square,
        /// 移動先。
        to: Square,
    },
    /// プロモーション（取りを含む）。
    Promotion {
        /// 移動元。
        from: Square,
        /// 成り先の駒種。
        kind: PieceKind,
        /// 移動先。
        to: Square,
    },
}

impl Move {
    /// 移動元のマスを返す。
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        match self {
            Self::Castle { from, .. }
            | Self::DoublePush { from, .. }
            | Self::EnPassant { from, .. }
            | Self::Normal { from, .. }
            | Self::Promotion { from, .. } => from,
        }
    }

    /// 移動先のマスを返す。
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        match self {
            Self::Castle { to, .. }
            | Self::DoublePush { to, .. }
            | Self::EnPassant { to, .. }
            | Self::Normal { to, .. }
            | Self::Promotion { to, .. } => to,
        }
    }
}
