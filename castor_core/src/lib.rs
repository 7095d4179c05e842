//! Chess GUI core logic.
//!
//! このクレートは盤面・合法手・着手実行を管理する `engine` と、
//! クリック操作を着手に変換する `ui` を提供します。
//! SDL シェル（`castor_sdl`）から利用されることを想定しています。

#![forbid(unsafe_code)]

/// チェスのルール・局面・着手実行を提供するモジュール。
pub mod engine;

/// クリック操作の状態機械と表示向き制御を提供するモジュール。
pub mod ui;

/// JSON 形式の `tracing` サブスクライバをグローバルに設定する。
///
/// UI シェルの起動時に一度だけ呼ぶ。すでに設定済みの場合は
/// 何もしない。
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().json().finish();
    let _: Result<(), tracing::subscriber::SetGlobalDefaultError> =
        tracing::subscriber::set_global_default(subscriber);
}
