/// 盤の表示向き。
///
/// マスの並び順（レイアウト）だけを決める。`Square` のインデックス
/// そのものは変化しないため、クリック処理は常に正規のインデックスで
/// 行い、表示位置との対応付けはシェル側が `traverse` で解決する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Orientation {
    /// 反転表示（黒側が手前）。
    Flipped,
    /// 標準表示（白側が手前）。
    Normal,
}

impl Orientation {
    /// 逆の向きを返す。2回適用すると元に戻る。
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Flipped => Self::Normal,
            Self::Normal => Self::Flipped,
        }
    }

    /// マス列を表示順に並べ替えて返す。
    ///
    /// `Normal` は入力のまま、`Flipped` は逆順。
    #[inline]
    #[must_use]
    pub fn traverse<T>(self, tiles: Vec<T>) -> Vec<T> {
        match self {
            Self::Flipped => {
                let mut reversed = tiles;
                reversed.reverse();
                reversed
            }
            Self::Normal => tiles,
        }
    }
}
