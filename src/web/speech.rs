//! `Speech` on top of the Web Speech API.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance, window};

use crate::announcer::{Cue, Speech, Utterance};

/// The utterance being spoken and its `onend` / `onerror` handlers. Only one
/// of the two handlers ever fires, so both are owned here and freed together.
struct Pending {
    utterance: SpeechSynthesisUtterance,
    _on_end: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl Drop for Pending {
    fn drop(&mut self) {
        // A cancelled utterance may still report back; detach before the
        // closures go away.
        self.utterance.set_onend(None);
        self.utterance.set_onerror(None);
    }
}

pub struct WebSpeech {
    synth: Option<SpeechSynthesis>,
    // Held so the browser does not collect the utterance (and its onend) early.
    current: Option<Pending>,
}

impl WebSpeech {
    pub fn detect() -> Self {
        let synth = window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            log::info!("speech synthesis not supported; cards will not be read aloud");
        }
        Self {
            synth,
            current: None,
        }
    }

    #[cfg(test)]
    fn has_pending(&self) -> bool {
        self.current.is_some()
    }
}

impl Speech for WebSpeech {
    fn is_available(&self) -> bool {
        self.synth.is_some()
    }

    fn speak(&mut self, utterance: Utterance<'_>, cue: Cue) {
        let Some(synth) = &self.synth else {
            return;
        };
        // Replacing the previous utterance releases its handlers.
        self.current = None;
        let u = match SpeechSynthesisUtterance::new_with_text(utterance.text) {
            Ok(u) => u,
            Err(err) => {
                log::warn!("could not create utterance: {err:?}");
                super::dispatch(move |s| s.on_speech_error(cue));
                return;
            }
        };
        u.set_lang(utterance.lang);
        u.set_rate(utterance.rate);

        let on_end = Closure::wrap(
            Box::new(move || super::dispatch(move |s| s.on_speech_end(cue))) as Box<dyn FnMut()>
        );
        let on_error = Closure::wrap(
            Box::new(move || super::dispatch(move |s| s.on_speech_error(cue))) as Box<dyn FnMut()>
        );
        u.set_onend(Some(on_end.as_ref().unchecked_ref()));
        u.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        synth.speak(&u);
        self.current = Some(Pending {
            utterance: u,
            _on_end: on_end,
            _on_error: on_error,
        });
    }

    fn cancel_all(&mut self) {
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
        self.current = None;
    }
}
