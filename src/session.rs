//! The game session: deals rounds, routes clicks, keeps score and drives the
//! reader.
//!
//! All state changes happen inside the `on_*` handlers, each of which runs to
//! completion. The host forwards clicks, speech completions and timer firings;
//! the session answers by replacing its [`SessionState`] and notifying
//! subscribers.

use crate::announcer::{Announcer, Cue, Progress, Speech};
use crate::config::GameConfig;
use crate::error::KarutaError;
use crate::poem::CardPool;
use crate::round::{ClickOutcome, Deal, Dealer, IgnoreReason, RoundId, RoundState};
use crate::timer::{Scheduler, Timer};

/// Number of cards taken this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score(u32);

impl Score {
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    fn reset(&mut self) {
        self.0 = 0;
    }
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub score: Score,
    pub round: RoundState,
    pub announcing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted(RoundId),
    CardMatched { position: usize },
    CardMismatched { position: usize, round_over: bool },
    AnnouncingChanged(bool),
    AnnouncementFinished,
    SessionReset,
}

/// How far a session's counters have gone. A session started with
/// [`GameSession::succeeding`] hands out round ids and reading tickets past
/// these, so callbacks still queued for the replaced session match nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watermark {
    pub round: RoundId,
    pub ticket: u64,
}

impl Watermark {
    pub const START: Watermark = Watermark {
        round: RoundId(0),
        ticket: 0,
    };
}

type Observer = Box<dyn FnMut(&SessionEvent, &SessionState)>;

pub struct GameSession<S, T> {
    config: GameConfig,
    pool: CardPool,
    dealer: Box<dyn Dealer>,
    announcer: Announcer<S>,
    scheduler: T,
    state: SessionState,
    observers: Vec<Observer>,
}

impl<S: Speech, T: Scheduler> GameSession<S, T> {
    /// Validate the config, deal the first round and start reading it.
    pub fn new(
        config: GameConfig,
        pool: CardPool,
        dealer: Box<dyn Dealer>,
        speech: S,
        scheduler: T,
    ) -> Result<Self, KarutaError> {
        Self::succeeding(Watermark::START, config, pool, dealer, speech, scheduler)
    }

    /// Like [`GameSession::new`], but for a session that replaces another one
    /// on the same host. Pass the old session's [`GameSession::watermark`]
    /// taken after stopping it.
    pub fn succeeding(
        previous: Watermark,
        config: GameConfig,
        pool: CardPool,
        mut dealer: Box<dyn Dealer>,
        speech: S,
        scheduler: T,
    ) -> Result<Self, KarutaError> {
        config.validate()?;
        let round = deal_round(&config, &pool, &mut *dealer, previous.round.next());
        let announcer = Announcer::resume(
            speech,
            config.voice.clone(),
            config.pause_ms,
            previous.ticket,
        );
        let mut session = Self {
            config,
            pool,
            dealer,
            announcer,
            scheduler,
            state: SessionState {
                score: Score::default(),
                round,
                announcing: false,
            },
            observers: Vec::new(),
        };
        log::info!(
            "session started: {} poems, {} cards per round, speech {}",
            session.pool.len(),
            session.state.round.cards().len(),
            if session.announcer.is_available() { "on" } else { "off" }
        );
        session.announce_target();
        Ok(session)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn round(&self) -> &RoundState {
        &self.state.round
    }

    pub fn score(&self) -> u32 {
        self.state.score.value()
    }

    pub fn is_announcing(&self) -> bool {
        self.state.announcing
    }

    pub fn speech_available(&self) -> bool {
        self.announcer.is_available()
    }

    pub fn watermark(&self) -> Watermark {
        Watermark {
            round: self.state.round.id(),
            ticket: self.announcer.ticket(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn announcer(&self) -> &Announcer<S> {
        &self.announcer
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionEvent, &SessionState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the current round with a freshly dealt one and read its target.
    pub fn start_round(&mut self) {
        self.announcer.cancel();
        let id = self.state.round.id().next();
        self.state.round = deal_round(&self.config, &self.pool, &mut *self.dealer, id);
        log::debug!(
            "round {id} dealt {} cards, target at {}",
            self.state.round.cards().len(),
            self.state.round.target_index()
        );
        self.emit(SessionEvent::RoundStarted(id));
        self.announce_target();
    }

    /// Click on a card of the round currently on the table.
    pub fn on_card_click(&mut self, position: usize) -> ClickOutcome {
        let round = self.state.round.id();
        self.on_card_click_for(round, position)
    }

    /// Click tagged with the round the card was rendered for. Clicks aimed at
    /// a replaced round are ignored.
    pub fn on_card_click_for(&mut self, round: RoundId, position: usize) -> ClickOutcome {
        if round != self.state.round.id() {
            log::debug!("click on stale round {round} ignored");
            return ClickOutcome::Ignored(IgnoreReason::StaleRound);
        }
        let (next, outcome) = self.state.round.click(position, self.config.mistake_policy);
        self.state.round = next;
        match outcome {
            ClickOutcome::Matched => {
                self.announcer.cancel();
                self.state.score.increment();
                self.schedule_next_round();
                self.sync_announcing();
                self.emit(SessionEvent::CardMatched { position });
            }
            ClickOutcome::Mismatched { round_over } => {
                if round_over {
                    self.announcer.cancel();
                    self.schedule_next_round();
                    self.sync_announcing();
                }
                self.emit(SessionEvent::CardMismatched {
                    position,
                    round_over,
                });
            }
            ClickOutcome::Ignored(reason) => {
                log::debug!("click on {position} ignored: {reason:?}");
            }
        }
        outcome
    }

    pub fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Pause { ticket } => {
                self.announcer.on_pause_elapsed(ticket);
                self.sync_announcing();
            }
            Timer::NextRound { round } => {
                if round == self.state.round.id() && self.state.round.is_locked() {
                    self.start_round();
                } else {
                    log::debug!("next-round timer for {round} is stale");
                }
            }
        }
    }

    pub fn on_speech_end(&mut self, cue: Cue) {
        let progress = self.announcer.on_utterance_end(cue, &mut self.scheduler);
        self.sync_announcing();
        if progress == Progress::Finished {
            self.emit(SessionEvent::AnnouncementFinished);
        }
    }

    pub fn on_speech_error(&mut self, cue: Cue) {
        self.announcer.on_utterance_error(cue);
        self.sync_announcing();
    }

    /// Read the current target again from the start. No-op without speech.
    pub fn replay(&mut self) {
        self.announce_target();
    }

    pub fn stop(&mut self) {
        self.announcer.cancel();
        self.sync_announcing();
    }

    /// Play/stop button: stop a reading in progress, otherwise replay.
    pub fn toggle_playback(&mut self) {
        if self.state.announcing {
            self.stop();
        } else {
            self.replay();
        }
    }

    /// Reset the score and deal a new round. Timers left over from the
    /// previous round no longer match and are dropped when they fire.
    pub fn new_session(&mut self) {
        self.state.score.reset();
        self.emit(SessionEvent::SessionReset);
        self.start_round();
    }

    fn announce_target(&mut self) {
        let target = self.state.round.target();
        self.announcer.announce(&target.first_half, &target.second_half);
        self.sync_announcing();
    }

    fn schedule_next_round(&mut self) {
        let round = self.state.round.id();
        self.scheduler
            .schedule(Timer::NextRound { round }, self.config.advance_delay_ms);
    }

    fn sync_announcing(&mut self) {
        let now = self.announcer.is_announcing();
        if now != self.state.announcing {
            self.state.announcing = now;
            self.emit(SessionEvent::AnnouncingChanged(now));
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event, &self.state);
        }
    }
}

fn deal_round(
    config: &GameConfig,
    pool: &CardPool,
    dealer: &mut dyn Dealer,
    id: RoundId,
) -> RoundState {
    let count = config.round_size.resolve(pool.len()).max(1);
    let deal = dealer.deal(pool.poems(), count);
    let deal = if deal.cards.is_empty() || deal.target >= deal.cards.len() {
        log::error!("dealer returned an unusable deal; using the first {count} poems");
        Deal {
            cards: pool.poems()[..count].to_vec(),
            target: 0,
        }
    } else {
        deal
    };
    RoundState::from_deal(id, deal)
}
