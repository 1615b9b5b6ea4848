//! Tunable game rules.
//!
//! All balancing constants live in [`GameRules`]. The defaults are the
//! shipped ruleset; the server keeps its active copy in a settings table and
//! the simtest harness loads them from `data/game_rules.json`.
//!
//! ```
//! use mobrank_logic::config::{validate_rules, GameRules};
//!
//! let rules = GameRules::default();
//! assert_eq!(rules.starting_cash, 1000);
//! assert!(validate_rules(&rules).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Balancing constants for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Cash a freshly registered player starts with.
    pub starting_cash: i64,
    /// Bail price per started minute of remaining sentence.
    pub bail_per_minute: i64,
    /// Bust success chance before the rescuer's rank is counted.
    pub bust_base_chance: f64,
    /// Added bust chance per rescuer rank index.
    pub bust_chance_per_rank: f64,
    /// Seconds a rescuer spends in jail after a failed bust.
    pub bust_fail_jail_secs: i64,
    /// Respect a rescuer earns for a successful bust.
    pub bust_respect: i64,
    /// Experience needed at prestige 0; doubles with each prestige level.
    pub prestige_base_experience: u64,
    /// Success-rate multiplier added per prestige level.
    pub prestige_success_bonus: f64,
    pub name_min_len: usize,
    pub name_max_len: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_cash: 1000,
            bail_per_minute: 100,
            bust_base_chance: 0.2,
            bust_chance_per_rank: 0.05,
            bust_fail_jail_secs: 300,
            bust_respect: 5,
            prestige_base_experience: 250_000,
            prestige_success_bonus: 0.05,
            name_min_len: 3,
            name_max_len: 24,
        }
    }
}

/// Longest display name any ruleset may allow.
pub const NAME_LEN_LIMIT: usize = 64;

/// A field of [`GameRules`] holding an unusable value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("starting cash {0} is negative")]
    NegativeStartingCash(i64),
    #[error("bail price {0} is negative")]
    NegativeBailPrice(i64),
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    ChanceOutOfRange { field: &'static str, value: f64 },
    #[error("jail time {0}s is negative")]
    NegativeJailTime(i64),
    #[error("bust respect {0} is negative")]
    NegativeRespect(i64),
    #[error("prestige base experience must be positive")]
    ZeroPrestigeBase,
    #[error("name length bounds {min}..={max} are unusable")]
    NameBounds { min: usize, max: usize },
}

/// Validate a ruleset, returning all errors found.
pub fn validate_rules(rules: &GameRules) -> Vec<RulesError> {
    let mut errors = Vec::new();

    if rules.starting_cash < 0 {
        errors.push(RulesError::NegativeStartingCash(rules.starting_cash));
    }
    if rules.bail_per_minute < 0 {
        errors.push(RulesError::NegativeBailPrice(rules.bail_per_minute));
    }
    for (field, value) in [
        ("bust_base_chance", rules.bust_base_chance),
        ("bust_chance_per_rank", rules.bust_chance_per_rank),
        ("prestige_success_bonus", rules.prestige_success_bonus),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(RulesError::ChanceOutOfRange { field, value });
        }
    }
    if rules.bust_fail_jail_secs < 0 {
        errors.push(RulesError::NegativeJailTime(rules.bust_fail_jail_secs));
    }
    if rules.bust_respect < 0 {
        errors.push(RulesError::NegativeRespect(rules.bust_respect));
    }
    if rules.prestige_base_experience == 0 {
        errors.push(RulesError::ZeroPrestigeBase);
    }
    if rules.name_min_len == 0
        || rules.name_min_len > rules.name_max_len
        || rules.name_max_len > NAME_LEN_LIMIT
    {
        errors.push(RulesError::NameBounds {
            min: rules.name_min_len,
            max: rules.name_max_len,
        });
    }

    errors
}
