//! `Scheduler` backed by `window.setTimeout`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::timer::{Scheduler, Timer};

pub struct WebScheduler;

impl Scheduler for WebScheduler {
    fn schedule(&mut self, timer: Timer, delay_ms: u32) {
        set_timeout(move || super::dispatch(move |s| s.on_timer(timer)), delay_ms);
    }
}

pub(crate) fn set_timeout(f: impl FnOnce() + 'static, delay_ms: u32) {
    let Some(win) = window() else {
        log::error!("no window; dropping timer");
        return;
    };
    let callback = Closure::once_into_js(f);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(err) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        log::error!("setTimeout failed: {err:?}");
    }
}
