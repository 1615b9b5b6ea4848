//! Player state as the rules see it.

use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::error::ActionError;
use crate::prison::{self, Custody};
use crate::progression::prestige_threshold;
use crate::ranks;

/// Stable reference to a player record.
pub type PlayerId = u64;

/// Mutable per-player record. Rank is derived from experience, never stored
/// here, so it cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub cash: i64,
    pub respect: i64,
    pub heat: i64,
    pub experience: u64,
    pub prestige: u32,
    /// Unix seconds. `None` or a past value means free.
    pub jailed_until: Option<i64>,
}

impl PlayerState {
    /// A fresh, free player holding the starting stake.
    pub fn new(name: impl Into<String>, rules: &GameRules) -> Self {
        Self {
            name: name.into(),
            cash: rules.starting_cash,
            respect: 0,
            heat: 0,
            experience: 0,
            prestige: 0,
            jailed_until: None,
        }
    }

    pub fn rank(&self) -> &'static str {
        ranks::get_rank(self.experience)
    }

    pub fn rank_index(&self) -> usize {
        ranks::rank_index_for(self.experience)
    }

    pub fn custody(&self, now: i64) -> Custody {
        prison::custody(self.jailed_until, now)
    }

    pub fn summary(&self, now: i64, rules: &GameRules) -> PlayerSummary {
        let index = self.rank_index();
        let next = ranks::next_rank(index);
        let custody = self.custody(now);
        let jail_seconds_left = custody.seconds_left(now);
        PlayerSummary {
            name: self.name.clone(),
            cash: self.cash,
            respect: self.respect,
            heat: self.heat,
            experience: self.experience,
            rank: self.rank(),
            rank_index: index,
            next_rank: next.map(|r| r.name),
            experience_to_next: next.map(|r| r.min_experience - self.experience),
            prestige: self.prestige,
            prestige_threshold: prestige_threshold(self.prestige, rules),
            jailed: custody.is_incarcerated(),
            jail_seconds_left,
            bail_cost: custody
                .is_incarcerated()
                .then(|| prison::bail_cost(jail_seconds_left, rules)),
        }
    }
}

/// Read-only view for clients and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub cash: i64,
    pub respect: i64,
    pub heat: i64,
    pub experience: u64,
    pub rank: &'static str,
    pub rank_index: usize,
    pub next_rank: Option<&'static str>,
    pub experience_to_next: Option<u64>,
    pub prestige: u32,
    pub prestige_threshold: u64,
    pub jailed: bool,
    pub jail_seconds_left: i64,
    pub bail_cost: Option<i64>,
}

/// Trim and check a display name. Returns the trimmed name.
pub fn validate_name(raw: &str, rules: &GameRules) -> Result<String, ActionError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < rules.name_min_len || len > rules.name_max_len {
        return Err(ActionError::InvalidName(format!(
            "must be {}-{} characters",
            rules.name_min_len, rules.name_max_len
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')))
    {
        return Err(ActionError::InvalidName(format!(
            "character '{}' is not allowed",
            bad
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_defaults() {
        let p = PlayerState::new("Vito", &GameRules::default());
        assert_eq!(p.cash, 1000);
        assert_eq!(p.rank(), "Street Rat");
        assert_eq!(p.prestige, 0);
        assert_eq!(p.custody(0), Custody::Free);
    }

    #[test]
    fn rank_follows_experience() {
        let mut p = PlayerState::new("Vito", &GameRules::default());
        p.experience = 800;
        assert_eq!(p.rank(), "Muscle");
        assert_eq!(p.rank_index(), 3);
    }

    #[test]
    fn summary_free_player() {
        let mut p = PlayerState::new("Vito", &GameRules::default());
        p.experience = 250;
        let s = p.summary(1_000, &GameRules::default());
        assert_eq!(s.rank, "Errand Boy");
        assert_eq!(s.next_rank, Some("Associate"));
        assert_eq!(s.experience_to_next, Some(50));
        assert!(!s.jailed);
        assert_eq!(s.bail_cost, None);
        assert_eq!(s.prestige_threshold, 250_000);
    }

    #[test]
    fn summary_jailed_player() {
        let mut p = PlayerState::new("Vito", &GameRules::default());
        p.jailed_until = Some(1_000 + 301);
        let s = p.summary(1_000, &GameRules::default());
        assert!(s.jailed);
        assert_eq!(s.jail_seconds_left, 301);
        assert_eq!(s.bail_cost, Some(600));
    }

    #[test]
    fn summary_at_top_rank() {
        let mut p = PlayerState::new("Vito", &GameRules::default());
        p.experience = 300_000;
        p.prestige = 1;
        let s = p.summary(0, &GameRules::default());
        assert_eq!(s.rank, "Godfather");
        assert_eq!(s.next_rank, None);
        assert_eq!(s.experience_to_next, None);
        assert_eq!(s.prestige_threshold, 500_000);
    }

    #[test]
    fn names() {
        let rules = GameRules::default();
        assert_eq!(validate_name("  Tony_B ", &rules).unwrap(), "Tony_B");
        assert!(validate_name("ab", &rules).is_err());
        assert!(validate_name(&"x".repeat(25), &rules).is_err());
        assert!(matches!(
            validate_name("bad<name>", &rules),
            Err(ActionError::InvalidName(_))
        ));
    }
}
