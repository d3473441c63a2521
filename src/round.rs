//! One round at the table: the dealt cards, the card being read, and what the
//! player has taken so far.
//!
//! `RoundState` is never edited in place by the session. Every click goes
//! through [`RoundState::click`], which returns the next state alongside the
//! outcome, and a new round replaces the old one wholesale.

use std::fmt;
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::MistakePolicy;
use crate::poem::Poem;

/// Identifies a dealt round within a session. Strictly increasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundId(pub u64);

impl RoundId {
    pub fn next(self) -> Self {
        RoundId(self.0 + 1)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardStatus {
    #[default]
    Untouched,
    /// Taken correctly (moratta).
    Matched,
    /// Wrong take (otetsuki).
    Mismatched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The round is already resolved and waiting for the next deal.
    Locked,
    /// The card was already taken or faulted this round.
    AlreadyResolved,
    OutOfRange,
    /// The click was aimed at a round that has since been replaced.
    StaleRound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Matched,
    /// `round_over` is true when the mistake closed the round.
    Mismatched { round_over: bool },
    Ignored(IgnoreReason),
}

#[derive(Clone, Debug)]
pub struct RoundState {
    id: RoundId,
    cards: Rc<[Poem]>,
    target: usize,
    statuses: Vec<CardStatus>,
    locked: bool,
}

impl RoundState {
    /// Fresh round with every card untouched. `None` when there are no cards
    /// or the target is not one of them.
    pub fn new(id: RoundId, cards: Vec<Poem>, target: usize) -> Option<Self> {
        if target >= cards.len() {
            return None;
        }
        Some(Self::from_deal(id, Deal { cards, target }))
    }

    /// Caller guarantees the deal's target is in range.
    pub(crate) fn from_deal(id: RoundId, deal: Deal) -> Self {
        debug_assert!(deal.target < deal.cards.len());
        let statuses = vec![CardStatus::Untouched; deal.cards.len()];
        Self {
            id,
            cards: deal.cards.into(),
            target: deal.target,
            statuses,
            locked: false,
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn cards(&self) -> &[Poem] {
        &self.cards
    }

    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn target(&self) -> &Poem {
        &self.cards[self.target]
    }

    pub fn statuses(&self) -> &[CardStatus] {
        &self.statuses
    }

    pub fn status(&self, position: usize) -> Option<CardStatus> {
        self.statuses.get(position).copied()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Text shown while the target is being read.
    pub fn caption(&self) -> String {
        self.target().full_text()
    }

    /// Apply a click on `position` and return the resulting state. Ignored
    /// clicks return an unchanged copy.
    pub fn click(&self, position: usize, policy: MistakePolicy) -> (RoundState, ClickOutcome) {
        if self.locked {
            return (self.clone(), ClickOutcome::Ignored(IgnoreReason::Locked));
        }
        match self.statuses.get(position) {
            None => return (self.clone(), ClickOutcome::Ignored(IgnoreReason::OutOfRange)),
            Some(CardStatus::Untouched) => {}
            Some(_) => {
                return (self.clone(), ClickOutcome::Ignored(IgnoreReason::AlreadyResolved));
            }
        }

        let mut next = self.clone();
        if position == self.target {
            next.statuses[position] = CardStatus::Matched;
            next.locked = true;
            return (next, ClickOutcome::Matched);
        }

        next.statuses[position] = CardStatus::Mismatched;
        let round_over = policy == MistakePolicy::AdvanceRound;
        next.locked = round_over;
        (next, ClickOutcome::Mismatched { round_over })
    }
}

/// Cards drawn for a round and the position of the one to be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deal {
    pub cards: Vec<Poem>,
    pub target: usize,
}

/// Source of randomness for dealing. Injected so tests can fix the table.
pub trait Dealer {
    /// Draw `count` distinct poems from `pool` (`1 <= count <= pool.len()`)
    /// and pick the target among them.
    fn deal(&mut self, pool: &[Poem], count: usize) -> Deal;
}

/// Uniform deal: Fisher–Yates shuffle of the pool, keep the prefix, then a
/// uniform target index.
pub struct RandomDealer<R> {
    rng: R,
}

impl<R: Rng> RandomDealer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dealer for RandomDealer<R> {
    fn deal(&mut self, pool: &[Poem], count: usize) -> Deal {
        let mut cards = pool.to_vec();
        cards.shuffle(&mut self.rng);
        cards.truncate(count.clamp(1, pool.len().max(1)));
        let target = if cards.is_empty() {
            0
        } else {
            self.rng.gen_range(0..cards.len())
        };
        Deal { cards, target }
    }
}
