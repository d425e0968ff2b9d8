use serde::{Deserialize, Serialize};

use crate::{ConfigError, Field, Srs, WallKick};

use super::{BagRandomizer, Endless, LineRace, MemorylessRandomizer, PieceSeed, Randomizer, Rule};

/// Everything needed to set up an [`Engine`](super::Engine).
///
/// Missing fields take their defaults when deserializing, so an empty
/// document describes a standard 40-line race on a 10×20 field.
///
/// # Example
///
/// ```
/// use blocktick_engine::{EngineConfig, RuleConfig};
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{ "das": 10, "rule": { "kind": "endless" } }"#).unwrap();
/// assert_eq!(config.das, 10);
/// assert_eq!(config.rule, RuleConfig::Endless);
/// assert_eq!(config.field_width, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub field_width: u16,
    pub field_height: u16,
    pub hidden_rows: u16,
    /// Delayed auto-shift threshold in ticks.
    pub das: u32,
    pub rule: RuleConfig,
    pub randomizer: RandomizerKind,
    pub wall_kick: WallKickKind,
    /// Fixed piece seed; a fresh random seed is drawn when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field_width: Field::DEFAULT_WIDTH,
            field_height: Field::DEFAULT_HEIGHT,
            hidden_rows: Field::DEFAULT_HIDDEN_ROWS,
            das: Self::DEFAULT_DAS,
            rule: RuleConfig::default(),
            randomizer: RandomizerKind::default(),
            wall_kick: WallKickKind::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub const DEFAULT_DAS: u32 = 8;
    /// Spawn column plus the widest piece box.
    pub const MIN_FIELD_WIDTH: u16 = 7;
    /// Room for a spawned piece above the floor.
    pub const MIN_FIELD_HEIGHT: u16 = 4;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_width < Self::MIN_FIELD_WIDTH {
            return Err(ConfigError::FieldTooNarrow {
                width: self.field_width,
                min: Self::MIN_FIELD_WIDTH,
            });
        }
        if self.field_height < Self::MIN_FIELD_HEIGHT {
            return Err(ConfigError::FieldTooShort {
                height: self.field_height,
                min: Self::MIN_FIELD_HEIGHT,
            });
        }
        if let RuleConfig::LineRace { goal: 0 } = self.rule {
            return Err(ConfigError::ZeroGoal);
        }
        Ok(())
    }

    #[must_use]
    pub fn build_field(&self) -> Field {
        Field::with_hidden_rows(self.field_width, self.field_height, self.hidden_rows)
    }
}

/// Game mode selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    LineRace {
        #[serde(default = "default_goal")]
        goal: usize,
    },
    Endless,
}

fn default_goal() -> usize {
    LineRace::DEFAULT_GOAL
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::LineRace {
            goal: LineRace::DEFAULT_GOAL,
        }
    }
}

impl RuleConfig {
    #[must_use]
    pub fn build(&self) -> Box<dyn Rule> {
        match self {
            Self::LineRace { goal } => Box::new(LineRace::new(*goal)),
            Self::Endless => Box::new(Endless),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomizerKind {
    #[default]
    Bag,
    Memoryless,
}

impl RandomizerKind {
    #[must_use]
    pub fn build(self, seed: Option<PieceSeed>) -> Box<dyn Randomizer> {
        let seed = seed.unwrap_or_else(rand::random);
        match self {
            Self::Bag => Box::new(BagRandomizer::with_seed(seed)),
            Self::Memoryless => Box::new(MemorylessRandomizer::with_seed(seed)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKickKind {
    #[default]
    Srs,
    /// Plain rotation only; a colliding turn simply fails.
    Disabled,
}

impl WallKickKind {
    #[must_use]
    pub fn build(self) -> Option<Box<dyn WallKick>> {
        match self {
            Self::Srs => Some(Box::new(Srs)),
            Self::Disabled => None,
        }
    }
}
