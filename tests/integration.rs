// Integration tests (native) for the `karuta` crate.
// These drive a whole session on the host with a recording speech fake, a
// scripted or seeded dealer and a timer queue the test fires by hand.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use karuta::{
    CardPool, CardStatus, ClickOutcome, Cue, Deal, Dealer, GameConfig, GameSession, IgnoreReason,
    NoSpeech, Part, Poem, RandomDealer, RoundId, RoundSize, SessionEvent, Speech, Timer,
    TimerQueue, Utterance,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Default)]
struct FakeSpeech {
    spoken: Vec<(String, Cue)>,
    cancels: usize,
}

impl FakeSpeech {
    fn last_cue(&self) -> Cue {
        self.spoken.last().expect("nothing spoken").1
    }
}

impl Speech for FakeSpeech {
    fn is_available(&self) -> bool {
        true
    }
    fn speak(&mut self, utterance: Utterance<'_>, cue: Cue) {
        assert_eq!(utterance.lang, "ja-JP");
        self.spoken.push((utterance.text.to_string(), cue));
    }
    fn cancel_all(&mut self) {
        self.cancels += 1;
    }
}

/// Hands out prepared deals in order, repeating the last one.
struct ScriptedDealer {
    deals: Vec<(Vec<u32>, usize)>,
    next: usize,
}

impl ScriptedDealer {
    fn new(deals: Vec<(Vec<u32>, usize)>) -> Self {
        Self { deals, next: 0 }
    }
}

impl Dealer for ScriptedDealer {
    fn deal(&mut self, pool: &[Poem], _count: usize) -> Deal {
        let idx = self.next.min(self.deals.len() - 1);
        self.next += 1;
        let (ids, target) = &self.deals[idx];
        let cards = ids
            .iter()
            .map(|id| pool.iter().find(|p| p.id == *id).cloned().unwrap())
            .collect();
        Deal {
            cards,
            target: *target,
        }
    }
}

fn pool(n: u32) -> CardPool {
    CardPool::new(
        (1..=n)
            .map(|i| Poem::new(i, format!("P{i} upper"), format!("P{i} lower")))
            .collect(),
    )
    .unwrap()
}

fn scripted_session(
    config: GameConfig,
    deals: Vec<(Vec<u32>, usize)>,
) -> GameSession<FakeSpeech, TimerQueue> {
    GameSession::new(
        config,
        pool(8),
        Box::new(ScriptedDealer::new(deals)),
        FakeSpeech::default(),
        TimerQueue::new(),
    )
    .unwrap()
}

fn record_events<S: Speech>(
    session: &mut GameSession<S, TimerQueue>,
) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session.subscribe(move |event, _state| sink.borrow_mut().push(*event));
    events
}

fn ids(session: &GameSession<FakeSpeech, TimerQueue>) -> Vec<u32> {
    session.round().cards().iter().map(|p| p.id).collect()
}

#[test]
fn scripted_round_plays_out() {
    let mut s = scripted_session(
        GameConfig::grid(),
        vec![(vec![3, 1, 7, 5], 2), (vec![2, 4, 6, 8], 0)],
    );
    assert_eq!(ids(&s), vec![3, 1, 7, 5]);
    assert_eq!(s.round().target().id, 7);
    assert!(s.is_announcing());
    assert_eq!(s.announcer().speech().spoken[0].0, "P7 upper");

    assert_eq!(s.on_card_click(0), ClickOutcome::Mismatched { round_over: false });
    assert_eq!(s.round().status(0), Some(CardStatus::Mismatched));
    assert!(!s.round().is_locked());
    assert_eq!(s.round().target_index(), 2);
    assert!(s.scheduler().pending().is_empty());

    assert_eq!(s.on_card_click(2), ClickOutcome::Matched);
    assert_eq!(s.score(), 1);
    assert!(s.round().is_locked());
    assert_eq!(s.round().status(2), Some(CardStatus::Matched));
    assert!(!s.is_announcing());

    let timers = s.scheduler_mut().drain();
    assert_eq!(
        timers,
        vec![(Timer::NextRound { round: RoundId(1) }, 1500)]
    );
    s.on_timer(timers[0].0);

    assert_eq!(s.round().id(), RoundId(2));
    assert_eq!(ids(&s), vec![2, 4, 6, 8]);
    assert!(!s.round().is_locked());
    assert!(s.round().statuses().iter().all(|st| *st == CardStatus::Untouched));
    assert_eq!(s.score(), 1);
}

#[test]
fn clicks_while_locked_change_nothing() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 1)]);
    s.on_card_click(1);
    let statuses = s.round().statuses().to_vec();
    for position in 0..4 {
        assert_eq!(
            s.on_card_click(position),
            ClickOutcome::Ignored(IgnoreReason::Locked)
        );
    }
    assert_eq!(s.round().statuses(), statuses.as_slice());
    assert_eq!(s.score(), 1);
    assert_eq!(s.scheduler().pending().len(), 1);
}

#[test]
fn repeated_wrong_clicks_keep_round_open() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 3)]);
    for position in [0, 1, 2, 0, 1] {
        s.on_card_click(position);
        assert!(!s.round().is_locked());
        assert_eq!(s.round().target_index(), 3);
    }
    assert_eq!(s.round().status(3), Some(CardStatus::Untouched));
    assert_eq!(s.score(), 0);
    assert_eq!(s.on_card_click(3), ClickOutcome::Matched);
}

#[test]
fn full_reading_pauses_between_halves() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 0)]);
    let events = record_events(&mut s);

    let first = s.announcer().speech().last_cue();
    assert_eq!(first.part, Part::First);
    s.on_speech_end(first);
    assert!(s.is_announcing());

    let timers = s.scheduler_mut().drain();
    assert_eq!(timers.len(), 1);
    assert!(matches!(timers[0], (Timer::Pause { .. }, 300)));
    s.on_timer(timers[0].0);

    let (text, second) = s.announcer().speech().spoken.last().cloned().unwrap();
    assert_eq!(text, "P1 lower");
    s.on_speech_end(second);

    assert!(!s.is_announcing());
    assert_eq!(
        *events.borrow(),
        vec![
            SessionEvent::AnnouncingChanged(false),
            SessionEvent::AnnouncementFinished
        ]
    );
}

#[test]
fn cancelled_reading_never_completes() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 0)]);
    let events = record_events(&mut s);
    let cancelled = s.announcer().speech().last_cue();

    s.stop();
    s.replay();
    s.on_speech_end(cancelled);

    assert!(s.is_announcing());
    assert!(s.scheduler().pending().is_empty());
    assert!(!events.borrow().contains(&SessionEvent::AnnouncementFinished));
}

#[test]
fn match_stops_the_reader() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 0)]);
    let cue = s.announcer().speech().last_cue();
    let cancels = s.announcer().speech().cancels;
    s.on_card_click(0);
    assert!(s.announcer().speech().cancels > cancels);
    s.on_speech_end(cue);
    assert!(!s.is_announcing());
    assert_eq!(s.scheduler().pending().len(), 1);
}

#[test]
fn toggle_playback_stops_then_replays() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 2)]);
    assert!(s.is_announcing());
    s.toggle_playback();
    assert!(!s.is_announcing());
    let spoken = s.announcer().speech().spoken.len();
    s.toggle_playback();
    assert!(s.is_announcing());
    let speech = s.announcer().speech();
    assert_eq!(speech.spoken.len(), spoken + 1);
    assert_eq!(speech.spoken.last().unwrap().0, "P3 upper");
}

#[test]
fn new_session_resets_score_and_drops_old_timer() {
    let mut s = scripted_session(
        GameConfig::grid(),
        vec![(vec![1, 2, 3, 4], 0), (vec![5, 6, 7, 8], 1)],
    );
    let events = record_events(&mut s);
    s.on_card_click(0);
    assert_eq!(s.score(), 1);
    let stale = s.scheduler_mut().drain();

    s.new_session();
    assert_eq!(s.score(), 0);
    assert_eq!(s.round().id(), RoundId(2));
    assert!(events.borrow().contains(&SessionEvent::SessionReset));

    s.on_timer(stale[0].0);
    assert_eq!(s.round().id(), RoundId(2));
    assert_eq!(
        s.on_card_click_for(RoundId(1), 1),
        ClickOutcome::Ignored(IgnoreReason::StaleRound)
    );
    assert_eq!(s.round().status(1), Some(CardStatus::Untouched));
}

#[test]
fn next_round_timer_fires_once() {
    let mut s = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 0)]);
    s.on_card_click(0);
    let timer = s.scheduler_mut().drain()[0].0;
    s.on_timer(timer);
    assert_eq!(s.round().id(), RoundId(2));
    s.on_timer(timer);
    assert_eq!(s.round().id(), RoundId(2));
}

#[test]
fn table_variant_moves_on_after_mistake() {
    let all: Vec<u32> = (1..=8).collect();
    let mut s = scripted_session(GameConfig::table(), vec![(all, 5)]);
    let events = record_events(&mut s);
    assert_eq!(s.round().cards().len(), 8);

    assert_eq!(s.on_card_click(0), ClickOutcome::Mismatched { round_over: true });
    assert!(s.round().is_locked());
    assert_eq!(s.score(), 0);
    assert_eq!(
        s.on_card_click(5),
        ClickOutcome::Ignored(IgnoreReason::Locked)
    );
    assert!(events.borrow().contains(&SessionEvent::CardMismatched {
        position: 0,
        round_over: true
    }));

    let timers = s.scheduler_mut().drain();
    assert_eq!(timers, vec![(Timer::NextRound { round: RoundId(1) }, 1000)]);
    s.on_timer(timers[0].0);
    assert_eq!(s.round().id(), RoundId(2));
    assert!(!s.round().is_locked());
}

#[test]
fn replacement_session_ignores_leftovers_of_the_old_one() {
    let mut old = scripted_session(GameConfig::grid(), vec![(vec![1, 2, 3, 4], 0)]);
    let first_cue = old.announcer().speech().last_cue();
    old.on_speech_end(first_cue);
    old.on_card_click(0);
    let old_timers = old.scheduler_mut().drain();
    assert_eq!(old_timers.len(), 2);
    old.stop();

    let mut new = GameSession::succeeding(
        old.watermark(),
        GameConfig::table(),
        pool(8),
        Box::new(ScriptedDealer::new(vec![((1..=8).collect(), 3)])),
        FakeSpeech::default(),
        TimerQueue::new(),
    )
    .unwrap();
    assert!(new.round().id() > old.round().id());
    assert!(new.announcer().speech().last_cue().ticket > first_cue.ticket);
    assert!(new.is_announcing());

    new.on_speech_error(first_cue);
    new.on_speech_end(first_cue);
    for (timer, _) in old_timers {
        new.on_timer(timer);
    }
    assert!(new.is_announcing());
    assert!(new.scheduler().pending().is_empty());
    assert_eq!(new.announcer().speech().spoken.len(), 1);
    assert_eq!(new.round().target().id, 4);
    assert_eq!(new.on_card_click(3), ClickOutcome::Matched);
}

#[test]
fn seeded_rounds_deal_distinct_cards() {
    let mut s = GameSession::new(
        GameConfig::grid(),
        pool(8),
        Box::new(RandomDealer::new(StdRng::seed_from_u64(2024))),
        FakeSpeech::default(),
        TimerQueue::new(),
    )
    .unwrap();
    for _ in 0..30 {
        let ids: HashSet<u32> = s.round().cards().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 4);
        let target = s.round().target_index();
        s.on_card_click(target);
        let timer = s.scheduler_mut().drain()[0].0;
        s.on_timer(timer);
    }
    assert_eq!(s.score(), 30);
}

#[test]
fn oversized_round_uses_whole_pool() {
    let mut config = GameConfig::grid();
    config.round_size = RoundSize::Fixed(6);
    let s = GameSession::new(
        config,
        pool(3),
        Box::new(RandomDealer::new(StdRng::seed_from_u64(9))),
        NoSpeech,
        TimerQueue::new(),
    )
    .unwrap();
    let ids: HashSet<u32> = s.round().cards().iter().map(|p| p.id).collect();
    assert_eq!(ids, HashSet::from([1, 2, 3]));
}

#[test]
fn missing_speech_degrades_quietly() {
    let mut s = GameSession::new(
        GameConfig::grid(),
        pool(8),
        Box::new(RandomDealer::new(StdRng::seed_from_u64(1))),
        NoSpeech,
        TimerQueue::new(),
    )
    .unwrap();
    let events = record_events(&mut s);
    assert!(!s.speech_available());
    assert!(!s.is_announcing());

    s.replay();
    s.toggle_playback();
    assert!(!s.is_announcing());
    assert!(events.borrow().is_empty());

    let target = s.round().target_index();
    assert_eq!(s.on_card_click(target), ClickOutcome::Matched);
    assert_eq!(s.score(), 1);
}
