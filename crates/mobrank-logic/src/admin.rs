//! Admin edits to player state.
//!
//! Admins can overwrite stats, release a prisoner, or jail someone. Edits go
//! through the same invariants as gameplay: heat, experience and prestige
//! stay non-negative, and rank is re-derived from the new experience.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::ledger::{job_kinds, JobEntry};
use crate::player::PlayerState;
use crate::prison::format_duration;

/// Fields to overwrite; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEdit {
    pub cash: Option<i64>,
    pub respect: Option<i64>,
    pub heat: Option<i64>,
    pub experience: Option<i64>,
    pub prestige: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AdminOutcome {
    pub player: PlayerState,
    pub message: String,
    pub entry: JobEntry,
}

pub fn require_admin(is_admin: bool) -> Result<(), ActionError> {
    if is_admin {
        Ok(())
    } else {
        Err(ActionError::AdminOnly)
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<i64, ActionError> {
    if value < 0 {
        Err(ActionError::InvalidStat { field, value })
    } else {
        Ok(value)
    }
}

/// Overwrite stats on `player`.
pub fn apply_stat_edit(
    player: &PlayerState,
    edit: &StatEdit,
    now: i64,
) -> Result<AdminOutcome, ActionError> {
    let mut next = player.clone();
    if let Some(cash) = edit.cash {
        next.cash = cash;
    }
    if let Some(respect) = edit.respect {
        next.respect = respect;
    }
    if let Some(heat) = edit.heat {
        next.heat = non_negative("heat", heat)?;
    }
    if let Some(experience) = edit.experience {
        next.experience = non_negative("experience", experience)? as u64;
    }
    if let Some(prestige) = edit.prestige {
        next.prestige = u32::try_from(non_negative("prestige", prestige)?)
            .map_err(|_| ActionError::InvalidStat {
                field: "prestige",
                value: prestige,
            })?;
    }

    let message = format!(
        "Admin set {}: cash ${}, respect {}, heat {}, {} XP ({}), prestige {}.",
        next.name,
        next.cash,
        next.respect,
        next.heat,
        next.experience,
        next.rank(),
        next.prestige
    );
    let entry = JobEntry::new(job_kinds::ADMIN_EDIT, message.clone(), now).with_snapshot(&next);
    Ok(AdminOutcome {
        player: next,
        message,
        entry,
    })
}

/// End `player`'s sentence without bail.
pub fn release(player: &PlayerState, now: i64) -> Result<AdminOutcome, ActionError> {
    if !player.custody(now).is_incarcerated() {
        return Err(ActionError::TargetNotIncarcerated(player.name.clone()));
    }
    let mut next = player.clone();
    next.jailed_until = None;
    let message = format!("Admin released {} from jail.", next.name);
    let entry = JobEntry::new(job_kinds::ADMIN_RELEASE, message.clone(), now);
    Ok(AdminOutcome {
        player: next,
        message,
        entry,
    })
}

/// Jail `player` for `seconds` from `now`, replacing any current sentence.
pub fn jail(player: &PlayerState, seconds: i64, now: i64) -> Result<AdminOutcome, ActionError> {
    let until = match now.checked_add(seconds) {
        Some(until) if seconds > 0 => until,
        _ => {
            return Err(ActionError::InvalidStat {
                field: "seconds",
                value: seconds,
            })
        }
    };
    let mut next = player.clone();
    next.jailed_until = Some(until);
    let message = format!(
        "Admin jailed {} for {}.",
        next.name,
        format_duration(seconds)
    );
    let entry = JobEntry::new(job_kinds::ADMIN_JAIL, message.clone(), now).with_prison(now, until);
    Ok(AdminOutcome {
        player: next,
        message,
        entry,
    })
}
