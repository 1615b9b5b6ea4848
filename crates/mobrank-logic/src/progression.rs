//! Crime resolution and progression.
//!
//! [`resolve_crime`] is the whole crime pipeline for one attempt:
//!
//! 1. Look up the crime (unknown id → input error).
//! 2. Gate on custody, rank, and up-front cost (→ rejected).
//! 3. One success draw at `success_rate × (1 + bonus × prestige)`.
//! 4. Success: cash, experience, respect, heat (floored at 0); rank is
//!    re-derived from the new experience.
//! 5. Failure: jailed for the crime's sentence; nothing else changes.
//! 6. Prestige: after a success that leaves a Godfather at or past
//!    `prestige_base × 2^prestige`, experience resets to 0 and prestige
//!    goes up by one.
//! 7. One ledger entry describing what happened.
//!
//! Nothing is mutated on error; on success the caller persists
//! [`CrimeOutcome::player`] and appends [`CrimeOutcome::entry`].

use crate::config::GameRules;
use crate::crimes::{self, CashReward, CrimeDef};
use crate::dice::Roll;
use crate::error::ActionError;
use crate::ledger::JobEntry;
use crate::player::PlayerState;
use crate::prison::{ensure_free, format_duration};
use crate::ranks::{self, TOP_RANK};

/// Experience a Godfather needs to prestige from level `prestige`.
pub fn prestige_threshold(prestige: u32, rules: &GameRules) -> u64 {
    let factor = 1u64.checked_shl(prestige).unwrap_or(u64::MAX);
    rules.prestige_base_experience.saturating_mul(factor)
}

/// Whether `state` qualifies for a prestige rollover right now.
pub fn prestige_ready(state: &PlayerState, rules: &GameRules) -> bool {
    state.rank_index() == TOP_RANK && state.experience >= prestige_threshold(state.prestige, rules)
}

/// Success probability for `crime` at `prestige`. May exceed 1.0, which
/// [`Roll::chance`] treats as certain.
pub fn success_chance(crime: &CrimeDef, prestige: u32, rules: &GameRules) -> f64 {
    crime.success_rate * (1.0 + rules.prestige_success_bonus * prestige as f64)
}

/// Check that `player` may attempt `crime` at `now`.
pub fn check_gates(crime: &CrimeDef, player: &PlayerState, now: i64) -> Result<(), ActionError> {
    ensure_free(player, now)?;
    if !crimes::can_attempt(crime, player.experience) {
        return Err(ActionError::RankTooLow {
            crime: crime.name,
            required: crime.unlock_rank_name(),
            current: player.rank(),
        });
    }
    let cost = crime.cash.cost();
    if player.cash < cost {
        return Err(ActionError::InsufficientCash {
            cost,
            cash: player.cash,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CrimeOutcome {
    pub crime: &'static CrimeDef,
    pub player: PlayerState,
    pub succeeded: bool,
    pub chance: f64,
    pub cash_delta: i64,
    /// Set when the attempt moved the player to a new rank.
    pub promoted_to: Option<&'static str>,
    pub prestiged: bool,
    pub message: String,
    pub entry: JobEntry,
}

/// Resolve one crime attempt.
///
/// ```
/// use mobrank_logic::config::GameRules;
/// use mobrank_logic::player::PlayerState;
/// use mobrank_logic::progression::resolve_crime;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let rules = GameRules::default();
/// let player = PlayerState::new("Vito", &rules);
/// let mut rng = StdRng::seed_from_u64(1);
/// let out = resolve_crime(&player, "pickpocket", 0, &rules, &mut rng).unwrap();
/// assert_eq!(out.entry.kind, "pickpocket");
/// ```
pub fn resolve_crime(
    player: &PlayerState,
    crime_id: &str,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> Result<CrimeOutcome, ActionError> {
    let crime = crimes::find_crime(crime_id)
        .ok_or_else(|| ActionError::UnknownCrime(crime_id.to_string()))?;
    check_gates(crime, player, now)?;

    let chance = success_chance(crime, player.prestige, rules);
    if roll.chance(chance) {
        Ok(apply_success(crime, player, chance, now, rules, roll))
    } else {
        Ok(apply_failure(crime, player, chance, now))
    }
}

fn apply_success(
    crime: &'static CrimeDef,
    player: &PlayerState,
    chance: f64,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> CrimeOutcome {
    let cash_delta = match crime.cash {
        CashReward::Range { min, max } => roll.between(min, max),
        CashReward::Fixed(delta) => delta,
    };
    let old_rank = player.rank_index();

    let mut next = player.clone();
    next.cash = next.cash.saturating_add(cash_delta);
    next.experience = next.experience.saturating_add(crime.experience);
    next.respect = next.respect.saturating_add(crime.respect);
    next.heat = next.heat.saturating_add(crime.heat).max(0);

    let mut message = if cash_delta >= 0 {
        format!(
            "{}: success! +${}, +{} XP.",
            crime.name, cash_delta, crime.experience
        )
    } else {
        format!(
            "{}: success! Paid ${}, +{} XP.",
            crime.name, -cash_delta, crime.experience
        )
    };

    let new_rank = next.rank_index();
    let promoted_to = (new_rank != old_rank).then(|| ranks::RANKS[new_rank].name);
    if let Some(name) = promoted_to {
        message.push_str(&format!(" You are now a {}.", name));
    }

    let prestiged = prestige_ready(&next, rules);
    if prestiged {
        next.experience = 0;
        next.prestige = next.prestige.saturating_add(1);
        message.push_str(&format!(
            " Prestige {} achieved! Your climb starts again as a {}.",
            next.prestige,
            next.rank()
        ));
    }

    let entry = JobEntry::new(crime.id, message.clone(), now).with_snapshot(&next);
    CrimeOutcome {
        crime,
        player: next,
        succeeded: true,
        chance,
        cash_delta,
        promoted_to,
        prestiged,
        message,
        entry,
    }
}

fn apply_failure(
    crime: &'static CrimeDef,
    player: &PlayerState,
    chance: f64,
    now: i64,
) -> CrimeOutcome {
    let until = now.saturating_add(crime.jail_secs);
    let mut next = player.clone();
    next.jailed_until = Some(until);

    let message = format!(
        "{}: you got caught! Jailed for {}.",
        crime.name,
        format_duration(crime.jail_secs)
    );
    let entry = JobEntry::new(crime.id, message.clone(), now).with_prison(now, until);
    CrimeOutcome {
        crime,
        player: next,
        succeeded: false,
        chance,
        cash_delta: 0,
        promoted_to: None,
        prestiged: false,
        message,
        entry,
    }
}
