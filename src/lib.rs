//! Karuta core crate.
//!
//! The reader calls out a poem and the player takes the matching card from the
//! table. Game logic (dealing, taking, scoring and the two-part reading) lives
//! in plain Rust modules that run and test on the host; the browser front end
//! under `web` wires it to the Web Speech API, timers and the DOM.

use wasm_bindgen::prelude::*;

pub mod announcer;
pub mod config;
pub mod error;
pub mod poem;
pub mod poems;
pub mod round;
pub mod session;
pub mod timer;

#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod web;

pub use announcer::{Announcer, Cue, NoSpeech, Part, Phase, Progress, Speech, Utterance};
pub use config::{GameConfig, MistakePolicy, RoundSize, VoiceSettings};
pub use error::KarutaError;
pub use poem::{CardPool, Poem};
pub use poems::DEMO_POEMS;
pub use round::{CardStatus, ClickOutcome, Deal, Dealer, IgnoreReason, RandomDealer, RoundId, RoundState};
pub use session::{GameSession, Score, SessionEvent, SessionState, Watermark};
pub use timer::{Scheduler, Timer, TimerQueue};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Four cards per round; a wrong take is marked and the round stays open.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::grid())
}

/// Every card on the table; any take ends the round.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_table_game() -> Result<(), JsValue> {
    web::mount(GameConfig::table())
}

#[cfg(all(target_arch = "wasm32", feature = "serde_json"))]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::mount(config)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn new_session() {
    web::dispatch(|s| s.new_session());
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn toggle_playback() {
    web::dispatch(|s| s.toggle_playback());
}
