//! SDL で動作する最小 UI。

use castor_core::engine;
use castor_core::ui;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color as SdlColor;
use sdl2::rect::Rect;
use std::time::Duration;

/// 盤面のオフセット（左上）。
const OFFSET: i32 = 16;

/// 1マスのピクセルサイズ。
const CELL_SIZE: i32 = 64;

/// 盤面の一辺の長さ（マス）。
const BOARD_LEN: i32 = 8;

/// 盤面の一辺の長さ（ピクセル）。
const BOARD_PX: i32 = BOARD_LEN * CELL_SIZE;

/// ウィンドウ幅（ピクセル）。
const WINDOW_W: u32 = (OFFSET + BOARD_PX + OFFSET) as u32;

/// ウィンドウ高さ（ピクセル）。
const WINDOW_H: u32 = (OFFSET + BOARD_PX + OFFSET) as u32;

/// 明るいマスの色（#FFFACD）。
const LIGHT_TILE: SdlColor = SdlColor::RGB(0xFF, 0xFA, 0xCD);

/// 暗いマスの色（#593E1A）。
const DARK_TILE: SdlColor = SdlColor::RGB(0x59, 0x3E, 0x1A);

/// 入力待ちのポーリング間隔。
const IDLE_SLEEP: Duration = Duration::from_millis(10);

/// 64マスを正規の順（インデックス 0..=63）で返す。
fn all_squares() -> Vec<engine::Square> {
    (u8::MIN..engine::Square::COUNT)
        .filter_map(engine::Square::from_index)
        .collect()
}

/// ピクセル座標を表示セル（x, y）に変換する。盤外は `None`。
fn pixel_to_display_cell(x: i32, y: i32) -> Option<(u8, u8)> {
    let file = x - OFFSET;
    let rank = y - OFFSET;
    if file < 0 || rank < 0 {
        return None;
    }

    let xx = file / CELL_SIZE;
    let yy = rank / CELL_SIZE;
    if !(0..BOARD_LEN).contains(&xx) || !(0..BOARD_LEN).contains(&yy) {
        return None;
    }

    let x_u8 = match u8::try_from(xx) {
        Ok(value) => value,
        Err(_err) => return None,
    };
    let y_u8 = match u8::try_from(yy) {
        Ok(value) => value,
        Err(_err) => return None,
    };

    Some((x_u8, y_u8))
}

/// 表示セルを正規のマスに解決する。
///
/// 表示順は `Orientation::traverse` が決めるため、クリック側も同じ
/// 並びを引いて逆変換する。
fn display_cell_to_square(
    cell: (u8, u8),
    orientation: ui::Orientation,
) -> Option<engine::Square> {
    let display_index = usize::from(cell.1)
        .checked_mul(usize::try_from(BOARD_LEN).unwrap_or(8))?
        .checked_add(usize::from(cell.0))?;

    let order = orientation.traverse(all_squares());
    order.get(display_index).copied()
}

/// クリックを処理し、再描画が必要かを返す。
fn handle_click(table: &mut ui::Table, x: i32, y: i32, button: ui::MouseButton) -> bool {
    let cell = match pixel_to_display_cell(x, y) {
        Some(value) => value,
        None => return false,
    };

    let square = match display_cell_to_square(cell, table.orientation()) {
        Some(value) => value,
        None => return false,
    };

    table.on_click(square, button).needs_redraw()
}

/// ウィンドウタイトルに出す状態行を返す。
fn status_text(table: &ui::Table) -> String {
    let board = table.board();
    let side = board.side_to_move();
    let side_text = match side {
        engine::Color::Black => "Black",
        engine::Color::White => "White",
        _ => "Unknown",
    };

    match board.status() {
        engine::Status::Checkmate { winner } => {
            let winner_text = match winner {
                engine::Color::Black => "Black",
                engine::Color::White => "White",
                _ => "Unknown",
            };
            format!("Checkmate: {winner_text} wins")
        }
        engine::Status::Stalemate => "Stalemate".to_owned(),
        engine::Status::InProgress => {
            if board.in_check(side) {
                format!("{side_text} to move (check)")
            } else {
                format!("{side_text} to move")
            }
        }
        _ => format!("{side_text} to move"),
    }
}

/// 駒種ごとの描画インセットを返す。未知の駒種は `None`
/// （そのマスは空白のまま残し、局面には影響させない）。
fn glyph_inset(kind: engine::PieceKind) -> Option<i32> {
    match kind {
        engine::PieceKind::Bishop => Some(16),
        engine::PieceKind::King => Some(8),
        engine::PieceKind::Knight => Some(16),
        engine::PieceKind::Pawn => Some(20),
        engine::PieceKind::Queen => Some(10),
        engine::PieceKind::Rook => Some(14),
        _ => None,
    }
}

/// 1個の駒を描画する。
fn draw_piece(
    canvas: &mut sdl2::render::Canvas<sdl2::video::Window>,
    xx: i32,
    yy: i32,
    piece: engine::Piece,
) {
    let inset = match glyph_inset(piece.kind()) {
        Some(value) => value,
        None => return,
    };

    let (body, edge) = match piece.color() {
        engine::Color::Black => (SdlColor::RGB(24, 24, 24), SdlColor::RGB(240, 240, 240)),
        engine::Color::White => (SdlColor::RGB(240, 240, 240), SdlColor::RGB(24, 24, 24)),
        _ => (SdlColor::RGB(128, 128, 128), SdlColor::RGB(24, 24, 24)),
    };

    let glyph_rect = Rect::new(
        xx + inset,
        yy + inset,
        (CELL_SIZE - inset * 2) as u32,
        (CELL_SIZE - inset * 2) as u32,
    );
    canvas.set_draw_color(body);
    let _: Result<(), String> = canvas.fill_rect(glyph_rect);
    canvas.set_draw_color(edge);
    let _: Result<(), String> = canvas.draw_rect(glyph_rect);
}

/// 全64マスを現在の局面・向き・選択で描き直す。
///
/// 差分描画はせず、毎回全マスを描く（冪等）。
fn draw_board(canvas: &mut sdl2::render::Canvas<sdl2::video::Window>, table: &ui::Table) {
    let board = table.board();
    let highlights = ui::legal_destinations(table.selection(), board);

    canvas.set_draw_color(SdlColor::RGB(32, 32, 32));
    canvas.clear();

    let order = table.orientation().traverse(all_squares());
    for (display_index, square) in order.iter().enumerate() {
        let display_i32 = match i32::try_from(display_index) {
            Ok(value) => value,
            Err(_err) => continue,
        };
        let xx = OFFSET + (display_i32 % BOARD_LEN) * CELL_SIZE;
        let yy = OFFSET + (display_i32 / BOARD_LEN) * CELL_SIZE;
        let rect = Rect::new(xx, yy, CELL_SIZE as u32, CELL_SIZE as u32);

        // マス。
        let tile_color = if (square.x() + square.y()) % 2 == 0 {
            LIGHT_TILE
        } else {
            DARK_TILE
        };
        canvas.set_draw_color(tile_color);
        let _: Result<(), String> = canvas.fill_rect(rect);

        canvas.set_draw_color(SdlColor::RGB(0, 0, 0));
        let _: Result<(), String> = canvas.draw_rect(rect);

        // 選択中の駒の移動先ヒント。
        if highlights & square.bit() != u64::MIN {
            let inset = CELL_SIZE / 3;
            let hint_rect = Rect::new(
                xx + inset,
                yy + inset,
                (CELL_SIZE - inset * 2) as u32,
                (CELL_SIZE - inset * 2) as u32,
            );
            canvas.set_draw_color(SdlColor::RGB(224, 224, 64));
            let _: Result<(), String> = canvas.fill_rect(hint_rect);
        }

        // 駒。
        if let Some(piece) = board.piece_at(*square) {
            draw_piece(canvas, xx, yy, piece);
        }
    }
}

fn main() -> Result<(), String> {
    castor_core::init_tracing();

    let sdl = sdl2::init()?;
    let video = sdl.video()?;

    let window = video
        .window("castor (Chess)", WINDOW_W, WINDOW_H)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window
        .into_canvas()
        .present_vsync()
        .accelerated()
        .build()
        .map_err(|e| e.to_string())?;

    let mut table = ui::Table::new();
    let mut event_pump = sdl.event_pump()?;

    let draw_and_present = |canvas: &mut sdl2::render::Canvas<sdl2::video::Window>,
                            table: &ui::Table| {
        let title = status_text(table);
        let _ = canvas.window_mut().set_title(&title);
        draw_board(canvas, table);
        canvas.present();
    };

    // 起動直後に一度描く。以降はクリック/反転のたびに予約する。
    let mut needs_redraw = true;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::F),
                    ..
                } => {
                    table.toggle_orientation();
                    needs_redraw = true;
                }
                Event::KeyDown {
                    keycode: Some(Keycode::O),
                    ..
                } => {
                    // PGN 読み込みは未実装のスタブ。
                    tracing::info!("pgn loading is not implemented");
                }
                Event::MouseButtonDown {
                    mouse_btn, x, y, ..
                } => {
                    let button = match mouse_btn {
                        MouseButton::Left => ui::MouseButton::Left,
                        MouseButton::Right => ui::MouseButton::Right,
                        _ => ui::MouseButton::Other,
                    };
                    needs_redraw |= handle_click(&mut table, x, y, button);
                }
                _ => {}
            }
        }

        // 再描画要求は1フレーム1回にまとめる。
        if needs_redraw {
            draw_and_present(&mut canvas, &table);
            needs_redraw = false;
        } else {
            std::thread::sleep(IDLE_SLEEP);
        }
    }

    Ok(())
}
