use crate::engine::moves::Move;
use crate::engine::rules;
use crate::engine::types::{Color, Piece, PieceKind, Square};

/// 後段（1段目/8段目）の初期配置。
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 黒キングの初期マス（e8）のインデックス。
const BLACK_KING_START: u8 = 4;

/// 黒キングサイドルークの初期マス（h8）のインデックス。
const BLACK_ROOK_KINGSIDE_START: u8 = 7;

/// 黒クイーンサイドルークの初期マス（a8）のインデックス。
const BLACK_ROOK_QUEENSIDE_START: u8 = 0;

/// マス数。
const NUM_SQUARES: usize = 64;

/// 白キングの初期マス（e1）のインデックス。
const WHITE_KING_START: u8 = 60;

/// 白キングサイドルークの初期マス（h1）のインデックス。
const WHITE_ROOK_KINGSIDE_START: u8 = 63;

/// 白クイーンサイドルークの初期マス（a1）のインデックス。
const WHITE_ROOK_QUEENSIDE_START: u8 = 56;

/// 着手の実行に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ExecuteMoveError {
    /// 指定された着手が現局面の合法手ではない。
    IllegalMove,
}

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
    /// 詰み。
    Checkmate {
        /// 勝った側。
        winner: Color,
    },
    /// 進行中。
    InProgress,
    /// ステイルメイト。
    Stalemate,
}

/// キャスリング権。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct CastlingRights {
    /// 黒キングサイド。
    black_kingside: bool,
    /// 黒クイーンサイド。
    black_queenside: bool,
    /// 白キングサイド。
    white_kingside: bool,
    /// 白クイーンサイド。
    white_queenside: bool,
}

impl CastlingRights {
    /// 全権利を持つ状態を返す。
    #[inline]
    #[must_use]
    const fn initial() -> Self {
        Self {
            black_kingside: true,
            black_queenside: true,
            white_kingside: true,
            white_queenside: true,
        }
    }

    /// 指定側のキングサイドの権利を返す。
    #[inline]
    #[must_use]
    pub(crate) const fn kingside(self, color: Color) -> bool {
        match color {
            Color::Black => self.black_kingside,
            Color::White => self.white_kingside,
        }
    }

    /// 権利を一切持たない状態を返す。
    #[cfg(test)]
    #[inline]
    #[must_use]
    const fn none() -> Self {
        Self {
            black_kingside: false,
            black_queenside: false,
            white_kingside: false,
            white_queenside: false,
        }
    }

    /// 指定側のクイーンサイドの権利を返す。
    #[inline]
    #[must_use]
    pub(crate) const fn queenside(self, color: Color) -> bool {
        match color {
            Color::Black => self.black_queenside,
            Color::White => self.white_queenside,
        }
    }
}

/// 局面スナップショット（駒配置＋手番＋付随情報）。
///
/// 不変値として扱う。着手の適用は新しい `Board` を返し、
/// 既存の値を書き換えることはない。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Board {
    /// キャスリング権。
    castling: CastlingRights,
    /// アンパッサンの対象マス（直前が2マス前進だった場合のみ）。
    en_passant: Option<Square>,
    /// 駒配置（インデックス = `Square::index`）。
    pieces: [Option<Piece>; NUM_SQUARES],
    /// 手番。
    side_to_move: Color,
}

impl Board {
    /// 着手を合法性チェックなしで適用する（crate 内部向け）。
    ///
    /// 王手放置の除外は呼び出し側（`rules::legal_moves`）が行う。
    #[must_use]
    pub(crate) fn apply_unchecked(&self, mv: Move) -> Self {
        let mut castling = self.castling;
        let mut en_passant = None;
        let mut pieces = self.pieces;

        match mv {
            Move::Castle {
                from,
                rook_from,
                rook_to,
                to,
            } => {
                move_piece(&mut pieces, from, to);
                move_piece(&mut pieces, rook_from, rook_to);
            }
            Move::DoublePush { from, to } => {
                move_piece(&mut pieces, from, to);
                en_passant = skipped_square(from, to);
            }
            Move::EnPassant { captured, from, to } => {
                move_piece(&mut pieces, from, to);
                set(&mut pieces, captured, None);
            }
            Move::Normal { from, to } => move_piece(&mut pieces, from, to),
            Move::Promotion { from, kind, to } => {
                let color = match take(&mut pieces, from) {
                    Some(piece) => piece.color(),
                    None => self.side_to_move,
                };
                set(&mut pieces, to, Some(Piece::new(color, kind)));
            }
        }

        revoke_castling(&mut castling, mv.from());
        revoke_castling(&mut castling, mv.to());

        Self {
            castling,
            en_passant,
            pieces,
            side_to_move: self.side_to_move.opponent(),
        }
    }

    /// (移動元, 移動先) に合致する合法手を構築する。
    ///
    /// 合致する手が無ければ `None`（ヌルムーブ）。プロモーションが
    /// 複数該当する場合はクイーンを優先する。
    #[must_use]
    pub fn build_move(&self, from: Square, to: Square) -> Option<Move> {
        let mut fallback = None;

        for mv in rules::legal_moves(self) {
            if mv.from() != from || mv.to() != to {
                continue;
            }

            match mv {
                Move::Promotion { kind, .. } => {
                    if matches!(kind, PieceKind::Queen) {
                        return Some(mv);
                    }
                    if fallback.is_none() {
                        fallback = Some(mv);
                    }
                }
                _ => return Some(mv),
            }
        }

        fallback
    }

    /// キャスリング権を返す。
    #[inline]
    #[must_use]
    pub(crate) const fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// 指定マスの駒の合法な移動先ビットボードを返す。
    ///
    /// マスが空、または駒が手番側でない場合は空集合。
    #[must_use]
    pub fn destinations_from(&self, from: Square) -> u64 {
        let mut destinations = u64::MIN;

        for mv in rules::legal_moves(self) {
            if mv.from() == from {
                destinations |= mv.to().bit();
            }
        }

        destinations
    }

    /// アンパッサンの対象マスを返す。
    #[inline]
    #[must_use]
    pub(crate) const fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// 着手を実行し、着手後の局面を返す。
    ///
    /// # Errors
    ///
    /// 指定された着手が現局面の合法手でない場合、
    /// `ExecuteMoveError::IllegalMove` を返す。
    ///
    #[inline]
    pub fn execute_move(&self, mv: Move) -> Result<Self, ExecuteMoveError> {
        if !rules::legal_moves(self).contains(&mv) {
            return Err(ExecuteMoveError::IllegalMove);
        }

        Ok(self.apply_unchecked(mv))
    }

    /// テスト用に任意の配置から局面を生成する（キャスリング権なし）。
    #[cfg(test)]
    #[must_use]
    pub(crate) fn from_pieces(
        placed: &[(u8, u8, Color, PieceKind)],
        side_to_move: Color,
    ) -> Self {
        let mut pieces = [None; NUM_SQUARES];
        for &(x, y, color, kind) in placed {
            place(&mut pieces, x, y, color, kind);
        }

        Self {
            castling: CastlingRights::none(),
            en_passant: None,
            pieces,
            side_to_move,
        }
    }

    /// 指定側のキングが王手されているかを返す。
    #[inline]
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        rules::in_check(self, color)
    }

    /// 初期局面を返す。
    #[must_use]
    pub fn initial() -> Self {
        let mut pieces = [None; NUM_SQUARES];

        for (x, kind) in BACK_RANK.iter().copied().enumerate() {
            let x_u8 = u8::try_from(x).unwrap_or(u8::MIN);
            place(&mut pieces, x_u8, 0, Color::Black, kind);
            place(&mut pieces, x_u8, 1, Color::Black, PieceKind::Pawn);
            place(&mut pieces, x_u8, 6, Color::White, PieceKind::Pawn);
            place(&mut pieces, x_u8, 7, Color::White, kind);
        }

        Self {
            castling: CastlingRights::initial(),
            en_passant: None,
            pieces,
            side_to_move: Color::White,
        }
    }

    /// 指定マスの駒を返す。
    #[inline]
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        match self.pieces.get(usize::from(square.index())) {
            Some(cell) => *cell,
            None => None,
        }
    }

    /// 手番を返す。
    #[inline]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 現在のゲーム状態を返す。
    ///
    /// 手番側に合法手が無いとき、王手なら詰み、王手でなければ
    /// ステイルメイト。
    #[must_use]
    pub fn status(&self) -> Status {
        if !rules::legal_moves(self).is_empty() {
            return Status::InProgress;
        }

        if self.in_check(self.side_to_move) {
            return Status::Checkmate {
                winner: self.side_to_move.opponent(),
            };
        }

        Status::Stalemate
    }
}

/// `from` の駒を `to` へ移動する（`from` は空になる）。
fn move_piece(pieces: &mut [Option<Piece>; NUM_SQUARES], from: Square, to: Square) {
    let moved = take(pieces, from);
    set(pieces, to, moved);
}

/// 盤面座標を指定して駒を置く（盤外は無視）。
fn place(pieces: &mut [Option<Piece>; NUM_SQUARES], x: u8, y: u8, color: Color, kind: PieceKind) {
    if let Some(square) = Square::from_xy(x, y) {
        set(pieces, square, Some(Piece::new(color, kind)));
    }
}

/// キング/ルークの初期マスに関わる移動・取りで権利を失効させる。
fn revoke_castling(castling: &mut CastlingRights, square: Square) {
    match square.index() {
        BLACK_KING_START => {
            castling.black_kingside = false;
            castling.black_queenside = false;
        }
        BLACK_ROOK_KINGSIDE_START => castling.black_kingside = false,
        BLACK_ROOK_QUEENSIDE_START => castling.black_queenside = false,
        WHITE_KING_START => {
            castling.white_kingside = false;
            castling.white_queenside = false;
        }
        WHITE_ROOK_KINGSIDE_START => castling.white_kingside = false,
        WHITE_ROOK_QUEENSIDE_START => castling.white_queenside = false,
        _ => {}
    }
}

/// 指定マスの内容を書き換える。
fn set(pieces: &mut [Option<Piece>; NUM_SQUARES], square: Square, piece: Option<Piece>) {
    if let Some(cell) = pieces.get_mut(usize::from(square.index())) {
        *cell = piece;
    }
}

/// 2マス前進で飛び越したマスを返す。
fn skipped_square(from: Square, to: Square) -> Option<Square> {
    let sum = from.index().checked_add(to.index())?;
    Square::from_index(sum / 2)
}

/// 指定マスの駒を取り除いて返す。
fn take(pieces: &mut [Option<Piece>; NUM_SQUARES], square: Square) -> Option<Piece> {
    match pieces.get_mut(usize::from(square.index())) {
        Some(cell) => cell.take(),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, ExecuteMoveError, Status};
    use crate::engine::moves::Move;
    use crate::engine::rules;
    use crate::engine::types::{Color, Piece, PieceKind, Square};

    fn square(x: u8, y: u8) -> Square {
        let square_opt = Square::from_xy(x, y);
        assert!(square_opt.is_some(), "square must be on the board, x={x} y={y}");
        square_opt.unwrap_or_else(|| Square::from_index_unchecked(u8::MIN))
    }

    fn play(board: &Board, from: Square, to: Square) -> Board {
        let mv_opt = board.build_move(from, to);
        assert!(mv_opt.is_some(), "move must exist, from={from:?} to={to:?}");

        let mv = match mv_opt {
            Some(value) => value,
            None => return *board,
        };

        let next = board.execute_move(mv);
        assert!(next.is_ok(), "move must be legal, mv={mv:?} got={next:?}");
        next.unwrap_or(*board)
    }

    #[test]
    fn initial_layout_is_standard() {
        let board = Board::initial();

        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(
            board.piece_at(square(4, 7)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(square(3, 0)),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(
            board.piece_at(square(0, 0)),
            Some(Piece::new(Color::Black, PieceKind::Rook))
        );
        assert_eq!(board.piece_at(square(4, 4)), None);

        let mut pawns = 0_u32;
        for index in u8::MIN..Square::COUNT {
            let cell = board.piece_at(Square::from_index_unchecked(index));
            if let Some(piece) = cell {
                if matches!(piece.kind(), PieceKind::Pawn) {
                    pawns = pawns.saturating_add(1);
                }
            }
        }
        assert_eq!(pawns, 16, "initial position must have 16 pawns");

        assert_eq!(board.status(), Status::InProgress);
    }

    #[test]
    fn initial_position_has_twenty_legal_moves() {
        let board = Board::initial();
        let moves = rules::legal_moves(&board);
        assert_eq!(moves.len(), 20, "got={moves:?}");
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let board = Board::initial();
        let next = play(&board, square(4, 6), square(4, 4));

        assert_eq!(next.en_passant(), Some(square(4, 5)));
        assert_eq!(next.side_to_move(), Color::Black);

        // 1手挟むと対象マスは消える。
        let next2 = play(&next, square(0, 1), square(0, 2));
        assert_eq!(next2.en_passant(), None);
    }

    #[test]
    fn en_passant_capture_removes_the_pawn() {
        let mut board = Board::initial();
        board = play(&board, square(4, 6), square(4, 4)); // e4
        board = play(&board, square(0, 1), square(0, 2)); // a6
        board = play(&board, square(4, 4), square(4, 3)); // e5
        board = play(&board, square(3, 1), square(3, 3)); // d5

        let destinations = board.destinations_from(square(4, 3));
        assert!(
            destinations & square(3, 2).bit() != u64::MIN,
            "en passant capture must be offered, got={destinations:#018x}"
        );

        board = play(&board, square(4, 3), square(3, 2)); // exd6
        assert_eq!(board.piece_at(square(3, 3)), None, "captured pawn must be gone");
        assert_eq!(
            board.piece_at(square(3, 2)),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn kingside_castling_moves_both_pieces() {
        let mut board = Board::initial();
        board = play(&board, square(4, 6), square(4, 4)); // e4
        board = play(&board, square(4, 1), square(4, 3)); // e5
        board = play(&board, square(6, 7), square(5, 5)); // Nf3
        board = play(&board, square(6, 0), square(5, 2)); // Nf6
        board = play(&board, square(5, 7), square(2, 4)); // Bc4
        board = play(&board, square(5, 0), square(2, 3)); // Bc5

        let destinations = board.destinations_from(square(4, 7));
        assert!(
            destinations & square(6, 7).bit() != u64::MIN,
            "castling must be offered, got={destinations:#018x}"
        );

        board = play(&board, square(4, 7), square(6, 7)); // O-O
        assert_eq!(
            board.piece_at(square(6, 7)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(square(5, 7)),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(board.piece_at(square(4, 7)), None);
        assert_eq!(board.piece_at(square(7, 7)), None);
    }

    #[test]
    fn castling_is_denied_through_an_attacked_square() {
        let mut board = Board::initial();
        board = play(&board, square(4, 6), square(4, 4)); // e4
        board = play(&board, square(4, 1), square(4, 3)); // e5
        board = play(&board, square(6, 7), square(5, 5)); // Nf3
        board = play(&board, square(6, 0), square(5, 2)); // Nf6
        board = play(&board, square(5, 7), square(2, 4)); // Bc4
        board = play(&board, square(5, 2), square(6, 4)); // Ng4
        board = play(&board, square(0, 6), square(0, 5)); // a3
        board = play(&board, square(6, 4), square(4, 5)); // Ne3: f1 に利き

        assert!(!board.in_check(Color::White));

        let destinations = board.destinations_from(square(4, 7));
        assert_eq!(
            destinations & square(6, 7).bit(),
            u64::MIN,
            "castling across an attacked square must be denied, got={destinations:#018x}"
        );
    }

    #[test]
    fn castling_is_denied_while_in_check() {
        let mut board = Board::initial();
        board = play(&board, square(4, 6), square(4, 4)); // e4
        board = play(&board, square(4, 1), square(4, 3)); // e5
        board = play(&board, square(6, 7), square(5, 5)); // Nf3
        board = play(&board, square(6, 0), square(5, 2)); // Nf6
        board = play(&board, square(5, 7), square(2, 4)); // Bc4
        board = play(&board, square(5, 0), square(2, 3)); // Bc5
        board = play(&board, square(3, 6), square(3, 4)); // d4
        board = play(&board, square(4, 3), square(3, 4)); // exd4
        board = play(&board, square(0, 6), square(0, 5)); // a3
        board = play(&board, square(2, 3), square(1, 4)); // Bb4+

        assert!(board.in_check(Color::White));

        let destinations = board.destinations_from(square(4, 7));
        assert_eq!(
            destinations & square(6, 7).bit(),
            u64::MIN,
            "castling out of check must be denied, got={destinations:#018x}"
        );
    }

    #[test]
    fn promotion_prefers_queen() {
        let board = Board::from_pieces(
            &[
                (0, 1, Color::White, PieceKind::Pawn),
                (4, 7, Color::White, PieceKind::King),
                (4, 0, Color::Black, PieceKind::King),
            ],
            Color::White,
        );

        let mv_opt = board.build_move(square(0, 1), square(0, 0));
        assert!(
            matches!(
                mv_opt,
                Some(Move::Promotion {
                    kind: PieceKind::Queen,
                    ..
                })
            ),
            "promotion must auto-queen, got={mv_opt:?}"
        );

        let next = play(&board, square(0, 1), square(0, 0));
        assert_eq!(
            next.piece_at(square(0, 0)),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut board = Board::initial();
        board = play(&board, square(5, 6), square(5, 5)); // f3
        board = play(&board, square(4, 1), square(4, 3)); // e5
        board = play(&board, square(6, 6), square(6, 4)); // g4
        board = play(&board, square(3, 0), square(7, 4)); // Qh4#

        assert!(board.in_check(Color::White));
        assert_eq!(
            board.status(),
            Status::Checkmate {
                winner: Color::Black
            }
        );
    }

    #[test]
    fn bare_kings_with_cornered_queen_is_stalemate() {
        // 黒 Ka8、白 Qb6/Ke1、黒番。黒に合法手が無く王手でもない。
        let board = Board::from_pieces(
            &[
                (0, 0, Color::Black, PieceKind::King),
                (1, 2, Color::White, PieceKind::Queen),
                (4, 7, Color::White, PieceKind::King),
            ],
            Color::Black,
        );

        assert!(!board.in_check(Color::Black));
        assert_eq!(board.status(), Status::Stalemate);
    }

    #[test]
    fn execute_move_rejects_moves_outside_the_legal_set() {
        let board = Board::initial();

        assert_eq!(board.build_move(square(4, 6), square(4, 2)), None);

        let bogus = Move::Normal {
            from: square(4, 6),
            to: square(4, 2),
        };
        assert_eq!(board.execute_move(bogus), Err(ExecuteMoveError::IllegalMove));
        assert_eq!(board, Board::initial(), "rejected move must not change anything");
    }

    #[test]
    fn pinned_piece_may_only_move_along_the_pin() {
        // 白 Ke1/Qe2、黒 Re8/Ka8: クイーンはeファイルに釘付け。
        let board = Board::from_pieces(
            &[
                (4, 7, Color::White, PieceKind::King),
                (4, 6, Color::White, PieceKind::Queen),
                (4, 0, Color::Black, PieceKind::Rook),
                (0, 0, Color::Black, PieceKind::King),
            ],
            Color::White,
        );

        let destinations = board.destinations_from(square(4, 6));
        assert!(
            destinations & square(4, 5).bit() != u64::MIN,
            "moving along the pin must be legal"
        );
        assert!(
            destinations & square(4, 0).bit() != u64::MIN,
            "capturing the pinning rook must be legal"
        );
        assert_eq!(
            destinations & square(3, 5).bit(),
            u64::MIN,
            "leaving the pin must be illegal"
        );
    }
}
