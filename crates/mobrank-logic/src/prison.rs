//! Prison subsystem: custody, bail and busts.
//!
//! Custody is derived, never stored as a flag. A player with no expiry, or an
//! expiry at or before `now`, is [`Custody::Free`]; release happens lazily the
//! next time anyone looks.
//!
//! # Bail
//!
//! Cost is `ceil(minutes remaining) × bail_per_minute`. With the default
//! rules, exactly five minutes left costs $500.
//!
//! # Bust
//!
//! Any player may try to free a jailed player. Success chance is
//! `bust_base_chance + bust_chance_per_rank × rescuer rank index`; values
//! above 1.0 are certain. A failed rescuer is jailed for
//! `bust_fail_jail_secs`.
//!
//! ```
//! use mobrank_logic::config::GameRules;
//! use mobrank_logic::prison::{bail_cost, bust_chance};
//!
//! let rules = GameRules::default();
//! assert_eq!(bail_cost(300, &rules), 500);
//! assert!((bust_chance(3, &rules) - 0.35).abs() < 1e-9);
//! ```

use serde::Serialize;

use crate::config::GameRules;
use crate::dice::Roll;
use crate::error::ActionError;
use crate::ledger::{job_kinds, JobEntry};
use crate::player::{PlayerId, PlayerState};

/// Incarceration state at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Custody {
    Free,
    Incarcerated { until: i64 },
}

impl Custody {
    pub fn is_incarcerated(&self) -> bool {
        matches!(self, Custody::Incarcerated { .. })
    }

    /// Seconds of sentence left; zero when free.
    pub fn seconds_left(&self, now: i64) -> i64 {
        match *self {
            Custody::Free => 0,
            Custody::Incarcerated { until } => until - now,
        }
    }
}

pub fn custody(jailed_until: Option<i64>, now: i64) -> Custody {
    match jailed_until {
        Some(until) if until > now => Custody::Incarcerated { until },
        _ => Custody::Free,
    }
}

/// Bail price for `seconds_left` of sentence. Every started minute counts.
pub fn bail_cost(seconds_left: i64, rules: &GameRules) -> i64 {
    if seconds_left <= 0 {
        return 0;
    }
    let minutes = seconds_left / 60 + i64::from(seconds_left % 60 != 0);
    minutes.saturating_mul(rules.bail_per_minute)
}

/// Bust success probability for a rescuer at `rank_index`. Not clamped.
pub fn bust_chance(rank_index: usize, rules: &GameRules) -> f64 {
    rules.bust_base_chance + rules.bust_chance_per_rank * rank_index as f64
}

/// Human-readable sentence length, e.g. `"1h 5m"`, `"4m 30s"`, `"45s"`.
pub fn format_duration(seconds: i64) -> String {
    let s = seconds.max(0);
    let (h, m, sec) = (s / 3600, (s % 3600) / 60, s % 60);
    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 && sec > 0 {
        format!("{}m {}s", m, sec)
    } else if m > 0 {
        format!("{}m", m)
    } else {
        format!("{}s", sec)
    }
}

/// Fails with [`ActionError::Incarcerated`] while the player is jailed.
pub fn ensure_free(player: &PlayerState, now: i64) -> Result<(), ActionError> {
    match player.custody(now) {
        Custody::Free => Ok(()),
        c @ Custody::Incarcerated { .. } => Err(ActionError::Incarcerated {
            seconds_left: c.seconds_left(now),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct BailOutcome {
    pub player: PlayerState,
    pub cost: i64,
    pub message: String,
    pub entry: JobEntry,
}

/// Pay bail to end the current sentence.
pub fn pay_bail(
    player: &PlayerState,
    now: i64,
    rules: &GameRules,
) -> Result<BailOutcome, ActionError> {
    let Custody::Incarcerated { until } = player.custody(now) else {
        return Err(ActionError::NotIncarcerated);
    };
    let cost = bail_cost(until - now, rules);
    if player.cash < cost {
        return Err(ActionError::InsufficientCash {
            cost,
            cash: player.cash,
        });
    }

    let mut next = player.clone();
    next.cash -= cost;
    next.jailed_until = None;

    let message = format!(
        "You paid ${} bail with {} left on your sentence. You're free.",
        cost,
        format_duration(until - now)
    );
    let entry = JobEntry::new(job_kinds::BAIL, message.clone(), now);
    Ok(BailOutcome {
        player: next,
        cost,
        message,
        entry,
    })
}

#[derive(Debug, Clone)]
pub struct BustOutcome {
    pub rescuer: PlayerState,
    pub target: PlayerState,
    pub succeeded: bool,
    pub chance: f64,
    pub message: String,
    /// Logged against the rescuer.
    pub entry: JobEntry,
}

/// Try to break `target` out of jail.
///
/// The rescuer may be free or jailed. The target must be jailed and must not
/// be the rescuer.
pub fn attempt_bust(
    rescuer_id: PlayerId,
    rescuer: &PlayerState,
    target_id: PlayerId,
    target: &PlayerState,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> Result<BustOutcome, ActionError> {
    if rescuer_id == target_id {
        return Err(ActionError::SelfBust);
    }
    if !target.custody(now).is_incarcerated() {
        return Err(ActionError::TargetNotIncarcerated(target.name.clone()));
    }

    let chance = bust_chance(rescuer.rank_index(), rules);
    let mut rescuer_next = rescuer.clone();
    let mut target_next = target.clone();

    if roll.chance(chance) {
        target_next.jailed_until = None;
        rescuer_next.respect = rescuer_next.respect.saturating_add(rules.bust_respect);
        let message = format!(
            "You broke {} out of jail! (+{} respect)",
            target.name, rules.bust_respect
        );
        let entry = JobEntry::new(job_kinds::BUST, message.clone(), now);
        Ok(BustOutcome {
            rescuer: rescuer_next,
            target: target_next,
            succeeded: true,
            chance,
            message,
            entry,
        })
    } else {
        let until = now.saturating_add(rules.bust_fail_jail_secs);
        rescuer_next.jailed_until = Some(until);
        let message = format!(
            "The guards caught you trying to free {}. You're locked up for {}.",
            target.name,
            format_duration(rules.bust_fail_jail_secs)
        );
        let entry =
            JobEntry::new(job_kinds::BUST_FAIL, message.clone(), now).with_prison(now, until);
        Ok(BustOutcome {
            rescuer: rescuer_next,
            target: target_next,
            succeeded: false,
            chance,
            message,
            entry,
        })
    }
}
