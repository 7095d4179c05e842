/// 手番（駒の色）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// 黒（後手）。
    Black,
    /// 白（先手）。
    White,
}

impl Color {
    /// 相手側の色を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// 駒の種類。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PieceKind {
    /// ビショップ。
    Bishop,
    /// キング。
    King,
    /// ナイト。
    Knight,
    /// ポーン。
    Pawn,
    /// クイーン。
    Queen,
    /// ルーク。
    Rook,
}

/// 駒（種類＋所有側）。
///
/// 特定の局面から読み取った値であり、局面が入れ替わった後に
/// 持ち越してはならない（選択状態の検証は問い合わせ時に行う）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    /// 所有側の色。
    color: Color,
    /// 駒の種類。
    kind: PieceKind,
}

impl Piece {
    /// 所有側の色を返す。
    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    /// 駒の種類を返す。
    #[inline]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    /// 色と種類から駒を生成する。
    #[inline]
    #[must_use]
    pub(crate) const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

/// 盤面上のマス（0..=63のインデックス）。
///
/// インデックス0は盤の左上（a8）、63は右下（h1）。
/// 表示向きに関わらずこの割り当ては不変で、クリック処理は常に
/// このインデックスで行う。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Square(
    /// `y * 8 + x` に対応する0..=63の値。
    u8,
);

impl Square {
    /// 盤の一辺の長さ。
    pub const BOARD_LEN: u8 = 8;

    /// マス数。
    pub const COUNT: u8 = 64;

    /// そのマスを表すビット（`u64`）を返す。
    #[inline]
    #[must_use]
    pub fn bit(self) -> u64 {
        let one = u64::MIN.wrapping_add(1);
        let shift = u32::from(self.0);

        one.checked_shl(shift).unwrap_or(u64::MIN)
    }

    /// インデックスから `Square` を生成する。
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index >= Self::COUNT {
            return None;
        }

        Some(Self(index))
    }

    /// インデックスから `Square` を生成する（範囲チェックなし）。
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 盤面座標（x, y）から `Square` を生成する。
    #[inline]
    #[must_use]
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= Self::BOARD_LEN || y >= Self::BOARD_LEN {
            return None;
        }

        let mut idx = match y.checked_mul(Self::BOARD_LEN) {
            Some(value) => value,
            None => return None,
        };

        idx = match idx.checked_add(x) {
            Some(value) => value,
            None => return None,
        };

        Some(Self(idx))
    }

    /// 0..=63 のインデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// x 座標（0..=7、a列が0）を返す。
    #[inline]
    #[must_use]
    pub const fn x(self) -> u8 {
        match self.0.checked_rem(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }

    /// y 座標（0..=7、8段目が0）を返す。
    #[inline]
    #[must_use]
    pub const fn y(self) -> u8 {
        match self.0.checked_div(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }
}
