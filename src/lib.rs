//! Memory Match core crate.
//!
//! A canvas memory game compiled to WebAssembly: flip cards, find the pairs,
//! beat the clock. Finished games are posted to a shared score table when the
//! hosting page provides credentials (see [`config`]). `start_game()` is the
//! JS entrypoint; the engine under [`game`] is plain Rust and carries the
//! unit tests.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod errors;
pub mod game;
pub mod leaderboard;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Card faces, dealt in pairs. The default game uses the first
/// [`DEFAULT_PAIR_COUNT`]; the rest are headroom for bigger boards.
pub const CARD_SYMBOLS: &[&str] = &[
    "🎈", "🎯", "🎭", "🎪", "🎨", "🎵", "🎸", "🎤",
    "🚀", "🌈", "🍀", "🔥", "🌙", "⚡", "🍉", "🐬",
];

pub const DEFAULT_PAIR_COUNT: usize = 8;

/// Boot the standard 16-card game. Safe to call again; a live instance is
/// reset instead of rebuilt.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start(DEFAULT_PAIR_COUNT)
}

/// Boot with a custom pair count, bounded by the symbol alphabet.
#[wasm_bindgen]
pub fn start_game_with_pairs(pairs: usize) -> Result<(), JsValue> {
    game::start(pairs)
}

pub(crate) fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub(crate) fn console_warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

pub(crate) fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}
