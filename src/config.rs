//! Game rules and reader settings.
//!
//! Two presets mirror the two ways the game is played: [`GameConfig::grid`]
//! deals four cards and lets the player keep trying after a wrong take,
//! [`GameConfig::table`] lays out every card and moves on after any take.

use crate::error::KarutaError;

pub const DEFAULT_ROUND_SIZE: usize = 4;
pub const DEFAULT_ADVANCE_DELAY_MS: u32 = 1500;
pub const DEFAULT_PAUSE_MS: u32 = 300;
pub const DEFAULT_LANG: &str = "ja-JP";
pub const DEFAULT_RATE: f32 = 1.1;
const MAX_RATE: f32 = 10.0;

/// How many cards go on the table each round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoundSize {
    /// At most this many; a smaller pool deals all of its cards.
    Fixed(usize),
    All,
}

impl RoundSize {
    pub fn resolve(self, pool_len: usize) -> usize {
        match self {
            RoundSize::Fixed(n) => n.min(pool_len),
            RoundSize::All => pool_len,
        }
    }
}

/// What a wrong take does to the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MistakePolicy {
    /// Mark the card as a fault (otetsuki) and keep the round open.
    #[default]
    MarkMismatched,
    /// Mark the card, close the round and deal a new one.
    AdvanceRound,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoiceSettings {
    pub lang: String,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            rate: DEFAULT_RATE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub round_size: RoundSize,
    pub mistake_policy: MistakePolicy,
    /// Delay between resolving a round and dealing the next one.
    pub advance_delay_ms: u32,
    /// Silence between the upper and lower verse.
    pub pause_ms: u32,
    pub voice: VoiceSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::grid()
    }
}

impl GameConfig {
    pub fn grid() -> Self {
        Self {
            round_size: RoundSize::Fixed(DEFAULT_ROUND_SIZE),
            mistake_policy: MistakePolicy::MarkMismatched,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            pause_ms: DEFAULT_PAUSE_MS,
            voice: VoiceSettings::default(),
        }
    }

    pub fn table() -> Self {
        Self {
            round_size: RoundSize::All,
            mistake_policy: MistakePolicy::AdvanceRound,
            advance_delay_ms: 1000,
            ..Self::grid()
        }
    }

    pub fn validate(&self) -> Result<(), KarutaError> {
        if self.round_size == RoundSize::Fixed(0) {
            return Err(KarutaError::InvalidConfig("round size must be at least 1".into()));
        }
        let rate = self.voice.rate;
        if !rate.is_finite() || rate <= 0.0 || rate > MAX_RATE {
            return Err(KarutaError::InvalidConfig(format!(
                "speech rate {rate} outside (0, {MAX_RATE}]"
            )));
        }
        if self.voice.lang.trim().is_empty() {
            return Err(KarutaError::InvalidConfig("language tag is empty".into()));
        }
        Ok(())
    }

    /// Parse a JSON config; absent fields keep the grid defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, KarutaError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
