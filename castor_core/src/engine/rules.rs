use crate::engine::board::Board;
use crate::engine::moves::Move;
use crate::engine::types::{Color, PieceKind, Square};

/// 斜め4方向。
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 全8方向（キングの1歩／クイーンの射線）。
const KING_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// ナイトの跳び先8通り。
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// プロモーション先の駒種（クイーン優先で列挙）。
const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// 縦横4方向。
const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// 指定側の後段（キングの初期段）の y 座標を返す。
const fn back_rank(color: Color) -> u8 {
    match color {
        Color::Black => 0,
        Color::White => 7,
    }
}

/// キャスリングを生成する。
///
/// 権利が残っていること、間のマスが空いていること、キングが王手中で
/// なく通過マスが利きに入っていないことを確認する。着地マスの安全性
/// は `legal_moves` の王手フィルタに任せる。
fn castle_moves(board: &Board, from: Square, side: Color, moves: &mut Vec<Move>) {
    let y = back_rank(side);
    if Square::from_xy(4, y) != Some(from) {
        return;
    }

    let opponent = side.opponent();
    if is_attacked(board, from, opponent) {
        return;
    }

    let rights = board.castling();
    if rights.kingside(side)
        && path_clear(board, &[(5, y), (6, y)])
        && !xy_attacked(board, 5, y, opponent)
    {
        push_castle(moves, from, 6, 7, 5, y);
    }
    if rights.queenside(side)
        && path_clear(board, &[(1, y), (2, y), (3, y)])
        && !xy_attacked(board, 3, y, opponent)
    {
        push_castle(moves, from, 2, 0, 3, y);
    }
}

/// 指定側のポーンの前進方向（y の増分）を返す。
const fn forward_dy(color: Color) -> i8 {
    match color {
        Color::Black => 1,
        Color::White => -1,
    }
}

/// 指定マスに指定側の指定駒種があるかを返す。
fn holds(board: &Board, square_opt: Option<Square>, color: Color, kind: PieceKind) -> bool {
    match square_opt {
        Some(square) => match board.piece_at(square) {
            Some(piece) => piece.color() == color && piece.kind() == kind,
            None => false,
        },
        None => false,
    }
}

/// 指定側のキングが王手されているかを返す。
#[must_use]
pub(crate) fn in_check(board: &Board, color: Color) -> bool {
    match king_square(board, color) {
        Some(square) => is_attacked(board, square, color.opponent()),
        None => false,
    }
}

/// 指定マスが指定側の利きに入っているかを返す。
#[must_use]
pub(crate) fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    // ポーン（攻撃元は前進方向の逆側にいる）。
    let pawn_dy = match by {
        Color::Black => -1_i8,
        Color::White => 1_i8,
    };
    for dx in [-1_i8, 1_i8] {
        if holds(board, offset(square, dx, pawn_dy), by, PieceKind::Pawn) {
            return true;
        }
    }

    // ナイト。
    for &(dx, dy) in &KNIGHT_JUMPS {
        if holds(board, offset(square, dx, dy), by, PieceKind::Knight) {
            return true;
        }
    }

    // キング（隣接）。
    for &(dx, dy) in &KING_DIRS {
        if holds(board, offset(square, dx, dy), by, PieceKind::King) {
            return true;
        }
    }

    // 射線（斜め＝ビショップ/クイーン、縦横＝ルーク/クイーン）。
    slider_attacks(board, square, by, &BISHOP_DIRS, PieceKind::Bishop)
        || slider_attacks(board, square, by, &ROOK_DIRS, PieceKind::Rook)
}

/// キングの1歩移動とキャスリングを生成する。
fn king_moves(board: &Board, from: Square, side: Color, moves: &mut Vec<Move>) {
    leaper_moves(board, from, side, &KING_DIRS, moves);
    castle_moves(board, from, side, moves);
}

/// 指定側のキングのマスを返す。
fn king_square(board: &Board, color: Color) -> Option<Square> {
    for index in u8::MIN..Square::COUNT {
        let square = Square::from_index_unchecked(index);
        if holds(board, Some(square), color, PieceKind::King) {
            return Some(square);
        }
    }

    None
}

/// 跳び駒（ナイト・キング）の移動を生成する。
fn leaper_moves(
    board: &Board,
    from: Square,
    side: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dx, dy) in offsets {
        let to = match offset(from, dx, dy) {
            Some(value) => value,
            None => continue,
        };

        match board.piece_at(to) {
            Some(piece) => {
                if piece.color() != side {
                    moves.push(Move::Normal { from, to });
                }
            }
            None => moves.push(Move::Normal { from, to }),
        }
    }
}

/// 現手番の完全合法手を列挙する。
///
/// 擬似合法手を生成した後、適用してみて自キングが利きに残る手を
/// 除外する。
#[must_use]
pub(crate) fn legal_moves(board: &Board) -> Vec<Move> {
    let side = board.side_to_move();
    let mut result = Vec::new();

    for mv in pseudo_legal_moves(board) {
        let next = board.apply_unchecked(mv);
        if !in_check(&next, side) {
            result.push(mv);
        }
    }

    result
}

/// (dx, dy) だけ動かした先のマスを返す（盤外は `None`）。
fn offset(square: Square, dx: i8, dy: i8) -> Option<Square> {
    let x = match i8::try_from(square.x()) {
        Ok(value) => value,
        Err(_err) => return None,
    };
    let y = match i8::try_from(square.y()) {
        Ok(value) => value,
        Err(_err) => return None,
    };

    let nx = match x.checked_add(dx) {
        Some(value) => value,
        None => return None,
    };
    let ny = match y.checked_add(dy) {
        Some(value) => value,
        None => return None,
    };
    if nx < 0 || ny < 0 {
        return None;
    }

    let nx_u8 = match u8::try_from(nx) {
        Ok(value) => value,
        Err(_err) => return None,
    };
    let ny_u8 = match u8::try_from(ny) {
        Ok(value) => value,
        Err(_err) => return None,
    };

    Square::from_xy(nx_u8, ny_u8)
}

/// 指定セル列がすべて空かを返す。
fn path_clear(board: &Board, cells: &[(u8, u8)]) -> bool {
    cells.iter().all(|&(x, y)| match Square::from_xy(x, y) {
        Some(square) => board.piece_at(square).is_none(),
        None => false,
    })
}

/// ポーンの移動（前進・取り・アンパッサン）を生成する。
fn pawn_moves(board: &Board, from: Square, side: Color, moves: &mut Vec<Move>) {
    let dy = forward_dy(side);

    // 前進（1マス、初期段なら2マス）。
    if let Some(one) = offset(from, 0, dy) {
        if board.piece_at(one).is_none() {
            push_pawn_advance(side, from, one, moves);

            if from.y() == start_rank(side) {
                if let Some(two) = offset(one, 0, dy) {
                    if board.piece_at(two).is_none() {
                        moves.push(Move::DoublePush { from, to: two });
                    }
                }
            }
        }
    }

    // 斜め取りとアンパッサン。
    for dx in [-1_i8, 1_i8] {
        let to = match offset(from, dx, dy) {
            Some(value) => value,
            None => continue,
        };

        match board.piece_at(to) {
            Some(piece) => {
                if piece.color() != side {
                    push_pawn_advance(side, from, to, moves);
                }
            }
            None => {
                if board.en_passant() == Some(to) {
                    if let Some(captured) = Square::from_xy(to.x(), from.y()) {
                        moves.push(Move::EnPassant { captured, from, to });
                    }
                }
            }
        }
    }
}

/// 指定側のプロモーション段の y 座標を返す。
const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::Black => 7,
        Color::White => 0,
    }
}

/// 現手番の擬似合法手（王手放置を含む）を列挙する。
fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let side = board.side_to_move();
    let mut moves = Vec::new();

    for index in u8::MIN..Square::COUNT {
        let from = Square::from_index_unchecked(index);
        let piece = match board.piece_at(from) {
            Some(value) => value,
            None => continue,
        };
        if piece.color() != side {
            continue;
        }

        match piece.kind() {
            PieceKind::Bishop => slider_moves(board, from, side, &BISHOP_DIRS, &mut moves),
            PieceKind::King => king_moves(board, from, side, &mut moves),
            PieceKind::Knight => leaper_moves(board, from, side, &KNIGHT_JUMPS, &mut moves),
            PieceKind::Pawn => pawn_moves(board, from, side, &mut moves),
            PieceKind::Queen => slider_moves(board, from, side, &KING_DIRS, &mut moves),
            PieceKind::Rook => slider_moves(board, from, side, &ROOK_DIRS, &mut moves),
        }
    }

    moves
}

/// キャスリングの着手を構築して追加する。
fn push_castle(
    moves: &mut Vec<Move>,
    from: Square,
    king_x: u8,
    rook_from_x: u8,
    rook_to_x: u8,
    y: u8,
) {
    let to_opt = Square::from_xy(king_x, y);
    let rook_from_opt = Square::from_xy(rook_from_x, y);
    let rook_to_opt = Square::from_xy(rook_to_x, y);

    if let (Some(to), Some(rook_from), Some(rook_to)) = (to_opt, rook_from_opt, rook_to_opt) {
        moves.push(Move::Castle {
            from,
            rook_from,
            rook_to,
            to,
        });
    }
}

/// ポーンの前進/取りを追加する（最終段ならプロモーションに展開）。
fn push_pawn_advance(side: Color, from: Square, to: Square, moves: &mut Vec<Move>) {
    if to.y() == promotion_rank(side) {
        for kind in PROMOTION_KINDS {
            moves.push(Move::Promotion { from, kind, to });
        }
    } else {
        moves.push(Move::Normal { from, to });
    }
}

/// 射線上に指定駒種（またはクイーン）の利きがあるかを返す。
fn slider_attacks(
    board: &Board,
    square: Square,
    by: Color,
    dirs: &[(i8, i8)],
    kind: PieceKind,
) -> bool {
    for &(dx, dy) in dirs {
        let mut cursor = square;
        while let Some(next) = offset(cursor, dx, dy) {
            match board.piece_at(next) {
                Some(piece) => {
                    if piece.color() == by
                        && (piece.kind() == kind || matches!(piece.kind(), PieceKind::Queen))
                    {
                        return true;
                    }
                    break;
                }
                None => cursor = next,
            }
        }
    }

    false
}

/// 走り駒（ビショップ・ルーク・クイーン）の移動を生成する。
fn slider_moves(
    board: &Board,
    from: Square,
    side: Color,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dx, dy) in dirs {
        let mut cursor = from;
        while let Some(to) = offset(cursor, dx, dy) {
            match board.piece_at(to) {
                Some(piece) => {
                    if piece.color() != side {
                        moves.push(Move::Normal { from, to });
                    }
                    break;
                }
                None => {
                    moves.push(Move::Normal { from, to });
                    cursor = to;
                }
            }
        }
    }
}

/// 指定側のポーンの初期段の y 座標を返す。
const fn start_rank(color: Color) -> u8 {
    match color {
        Color::Black => 1,
        Color::White => 6,
    }
}

/// 盤面座標 (x, y) が指定側の利きに入っているかを返す（盤外は真）。
fn xy_attacked(board: &Board, x: u8, y: u8, by: Color) -> bool {
    match Square::from_xy(x, y) {
        Some(square) => is_attacked(board, square, by),
        None => true,
    }
}
