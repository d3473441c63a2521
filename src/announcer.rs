//! The reader. Speaks the upper verse, pauses, then speaks the lower verse.
//!
//! Speech is an external capability behind [`Speech`]. Every utterance is
//! handed a [`Cue`] carrying the announcement's ticket; the host reports
//! completion with that cue, and a cue whose ticket is no longer current is
//! dropped. Cancelling bumps the ticket, so nothing from a cancelled reading
//! can surface afterwards.

use crate::config::VoiceSettings;
use crate::timer::{Scheduler, Timer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    First,
    Second,
}

/// Identifies one utterance handed to the speech capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cue {
    pub ticket: u64,
    pub part: Part,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Utterance<'a> {
    pub text: &'a str,
    pub lang: &'a str,
    pub rate: f32,
}

/// Platform text-to-speech.
pub trait Speech {
    fn is_available(&self) -> bool;
    /// Start speaking. The host later reports `cue` back through
    /// `GameSession::on_speech_end` (or `on_speech_error`).
    fn speak(&mut self, utterance: Utterance<'_>, cue: Cue);
    fn cancel_all(&mut self);
}

/// Speech for platforms without a synthesizer: never available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSpeech;

impl Speech for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }
    fn speak(&mut self, _utterance: Utterance<'_>, _cue: Cue) {}
    fn cancel_all(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    SpeakingFirst,
    Pausing,
    SpeakingSecond,
}

/// Result of feeding a speech or timer event to the announcer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Stale or unexpected event; nothing changed.
    Ignored,
    Continued,
    /// The lower verse finished; the reading is complete.
    Finished,
}

struct Script {
    first: String,
    second: String,
}

pub struct Announcer<S> {
    speech: S,
    voice: VoiceSettings,
    pause_ms: u32,
    phase: Phase,
    ticket: u64,
    script: Option<Script>,
}

impl<S: Speech> Announcer<S> {
    pub fn new(speech: S, voice: VoiceSettings, pause_ms: u32) -> Self {
        Self::resume(speech, voice, pause_ms, 0)
    }

    /// Announcer whose tickets continue after `ticket`, so cues handed out
    /// by an earlier announcer never match one of its own.
    pub fn resume(speech: S, voice: VoiceSettings, pause_ms: u32, ticket: u64) -> Self {
        Self {
            speech,
            voice,
            pause_ms,
            phase: Phase::Idle,
            ticket,
            script: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_announcing(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Latest ticket handed out (or retired by a cancel).
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn is_available(&self) -> bool {
        self.speech.is_available()
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut S {
        &mut self.speech
    }

    /// Start reading a poem. Any reading in progress is cancelled first.
    /// Without speech support this does nothing.
    pub fn announce(&mut self, first: &str, second: &str) {
        if !self.speech.is_available() {
            log::debug!("speech unavailable; skipping announcement");
            return;
        }
        self.cancel();
        self.script = Some(Script {
            first: first.to_string(),
            second: second.to_string(),
        });
        self.phase = Phase::SpeakingFirst;
        self.speak_part(Part::First);
    }

    /// Stop speaking. Safe to call at any time.
    pub fn cancel(&mut self) {
        self.ticket += 1;
        self.script = None;
        if self.phase != Phase::Idle {
            log::debug!("announcement cancelled");
        }
        self.phase = Phase::Idle;
        if self.speech.is_available() {
            self.speech.cancel_all();
        }
    }

    pub fn on_utterance_end(&mut self, cue: Cue, scheduler: &mut dyn Scheduler) -> Progress {
        if cue.ticket != self.ticket {
            return Progress::Ignored;
        }
        match (self.phase, cue.part) {
            (Phase::SpeakingFirst, Part::First) => {
                self.phase = Phase::Pausing;
                scheduler.schedule(Timer::Pause { ticket: self.ticket }, self.pause_ms);
                Progress::Continued
            }
            (Phase::SpeakingSecond, Part::Second) => {
                self.phase = Phase::Idle;
                self.script = None;
                Progress::Finished
            }
            _ => Progress::Ignored,
        }
    }

    pub fn on_pause_elapsed(&mut self, ticket: u64) -> Progress {
        if ticket != self.ticket || self.phase != Phase::Pausing {
            return Progress::Ignored;
        }
        self.phase = Phase::SpeakingSecond;
        self.speak_part(Part::Second);
        Progress::Continued
    }

    /// The synthesizer failed on the current utterance: give up on this reading.
    pub fn on_utterance_error(&mut self, cue: Cue) -> Progress {
        if cue.ticket != self.ticket || self.phase == Phase::Idle {
            return Progress::Ignored;
        }
        log::warn!("speech failed during {:?} half; reading abandoned", cue.part);
        self.ticket += 1;
        self.phase = Phase::Idle;
        self.script = None;
        Progress::Continued
    }

    fn speak_part(&mut self, part: Part) {
        let Some(script) = &self.script else {
            return;
        };
        let text = match part {
            Part::First => &script.first,
            Part::Second => &script.second,
        };
        let cue = Cue {
            ticket: self.ticket,
            part,
        };
        self.speech.speak(
            Utterance {
                text,
                lang: &self.voice.lang,
                rate: self.voice.rate,
            },
            cue,
        );
    }
}
