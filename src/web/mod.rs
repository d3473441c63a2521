//! Browser front end: owns the session and connects it to speech synthesis,
//! timers, the DOM and the keyboard.
//!
//! The session lives in a thread-local slot. Every browser callback goes
//! through [`dispatch`]; a callback that fires while the session is already
//! borrowed (a synchronous event raised from inside a handler) is re-queued on
//! a zero-delay timeout instead of re-entering.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, window};

use crate::config::GameConfig;
use crate::error::KarutaError;
use crate::poem::CardPool;
use crate::poems::DEMO_POEMS;
use crate::round::RandomDealer;
use crate::session::{GameSession, SessionEvent, Watermark};

mod speech;
mod timers;
mod view;

use speech::WebSpeech;
use timers::WebScheduler;
use view::View;

pub(crate) type WebSession = GameSession<WebSpeech, WebScheduler>;

thread_local! {
    static SESSION: RefCell<Option<WebSession>> = const { RefCell::new(None) };
    static KEYS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

pub(crate) fn dispatch(f: impl FnOnce(&mut WebSession) + 'static) {
    SESSION.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(session) = slot.as_mut() {
                f(session);
            }
        }
        Err(_) => timers::set_timeout(move || dispatch(f), 0),
    });
}

/// Build the page and deal the first round.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| KarutaError::Dom("no window".into()))?;
    let doc = win
        .document()
        .ok_or_else(|| KarutaError::Dom("no document".into()))?;

    // Stop the session being replaced; the new one counts on from where it
    // stopped so its leftover speech events and timers are rejected.
    let previous = SESSION
        .with(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            let old = slot.as_mut()?;
            old.stop();
            Some(old.watermark())
        })
        .unwrap_or(Watermark::START);

    let pool = CardPool::from_static(DEMO_POEMS)?;
    let dealer = Box::new(RandomDealer::new(StdRng::from_entropy()));
    let mistake_policy = config.mistake_policy;
    let mut session = GameSession::succeeding(
        previous,
        config,
        pool,
        dealer,
        WebSpeech::detect(),
        WebScheduler,
    )?;

    let view = Rc::new(RefCell::new(View::mount(&doc, session.speech_available())?));
    view.borrow_mut().render(session.state());
    {
        let view = view.clone();
        session.subscribe(move |event, state| {
            view.borrow_mut().render(state);
            if let SessionEvent::CardMismatched {
                round_over: true, ..
            } = event
            {
                log::debug!("mistake under {mistake_policy:?}; moving on");
                if let Some(win) = window() {
                    win.alert_with_message("お手つき！").ok();
                }
            }
        });
    }

    SESSION.with(|cell| cell.replace(Some(session)));
    install_keyboard(&doc)?;
    log::info!("karuta mounted");
    Ok(())
}

fn install_keyboard(doc: &web_sys::Document) -> Result<(), JsValue> {
    if KEYS_INSTALLED.with(|k| k.replace(true)) {
        return Ok(());
    }
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        let key = evt.key();
        match key.as_str() {
            " " => {
                evt.prevent_default();
                dispatch(|s| s.toggle_playback());
            }
            "n" | "N" => dispatch(|s| s.new_session()),
            _ => {
                if let Some(position) = key
                    .chars()
                    .next()
                    .filter(|_| key.len() == 1)
                    .and_then(|c| c.to_digit(10))
                    .filter(|d| *d >= 1)
                {
                    dispatch(move |s| {
                        s.on_card_click(position as usize - 1);
                    });
                }
            }
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
