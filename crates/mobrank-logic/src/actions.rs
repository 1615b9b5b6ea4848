//! Action surface: load → resolve → save → append.
//!
//! Each function here is one player- or admin-initiated action. It reads the
//! records it needs from a [`PlayerStore`], runs the pure rules, and on
//! success writes every changed record once and appends one ledger entry.
//! On error nothing is written.
//!
//! ```
//! use mobrank_logic::actions;
//! use mobrank_logic::config::GameRules;
//! use mobrank_logic::store::{MemoryStore, PlayerStore};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let rules = GameRules::default();
//! let mut store = MemoryStore::new();
//! let mut rng = StdRng::seed_from_u64(9);
//! let (id, _) = actions::register(&mut store, "Vito", 0, &rules).unwrap();
//! let out = actions::attempt_crime(&mut store, id, "pickpocket", 10, &rules, &mut rng).unwrap();
//! assert_eq!(store.load(id).unwrap(), out.player);
//! ```

use crate::admin::{self, AdminOutcome, StatEdit};
use crate::config::GameRules;
use crate::dice::Roll;
use crate::error::ActionError;
use crate::ledger::{job_kinds, JobEntry};
use crate::player::{validate_name, PlayerId, PlayerState};
use crate::prison::{self, BailOutcome, BustOutcome};
use crate::progression::{self, CrimeOutcome};
use crate::store::PlayerStore;

fn load(store: &impl PlayerStore, id: PlayerId) -> Result<PlayerState, ActionError> {
    store
        .load(id)
        .ok_or_else(|| ActionError::PlayerNotFound(format!("#{}", id)))
}

/// Create a player with the starting stake.
pub fn register(
    store: &mut impl PlayerStore,
    raw_name: &str,
    now: i64,
    rules: &GameRules,
) -> Result<(PlayerId, PlayerState), ActionError> {
    let name = validate_name(raw_name, rules)?;
    if store.find_by_name(&name).is_some() {
        return Err(ActionError::NameTaken(name));
    }
    let state = PlayerState::new(name, rules);
    let id = store.create(&state);
    store.append_job(
        id,
        JobEntry::new(
            job_kinds::REGISTER,
            format!("{} hit the streets with ${}.", state.name, state.cash),
            now,
        )
        .with_snapshot(&state),
    );
    Ok((id, state))
}

pub fn attempt_crime(
    store: &mut impl PlayerStore,
    id: PlayerId,
    crime_id: &str,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> Result<CrimeOutcome, ActionError> {
    let player = load(&*store, id)?;
    let outcome = progression::resolve_crime(&player, crime_id, now, rules, roll)?;
    store.save(id, &outcome.player)?;
    store.append_job(id, outcome.entry.clone());
    Ok(outcome)
}

pub fn pay_bail(
    store: &mut impl PlayerStore,
    id: PlayerId,
    now: i64,
    rules: &GameRules,
) -> Result<BailOutcome, ActionError> {
    let player = load(&*store, id)?;
    let outcome = prison::pay_bail(&player, now, rules)?;
    store.save(id, &outcome.player)?;
    store.append_job(id, outcome.entry.clone());
    Ok(outcome)
}

/// Bust `target_id` out. The two records are written independently; the
/// ledger entry goes to the rescuer.
pub fn bust(
    store: &mut impl PlayerStore,
    rescuer_id: PlayerId,
    target_id: PlayerId,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> Result<BustOutcome, ActionError> {
    let rescuer = load(&*store, rescuer_id)?;
    if rescuer_id == target_id {
        return Err(ActionError::SelfBust);
    }
    let target = load(&*store, target_id)?;
    let outcome =
        prison::attempt_bust(rescuer_id, &rescuer, target_id, &target, now, rules, roll)?;
    if outcome.succeeded {
        store.save(target_id, &outcome.target)?;
    }
    store.save(rescuer_id, &outcome.rescuer)?;
    store.append_job(rescuer_id, outcome.entry.clone());
    Ok(outcome)
}

/// [`bust`] with the target given by display name.
pub fn bust_by_name(
    store: &mut impl PlayerStore,
    rescuer_id: PlayerId,
    target_name: &str,
    now: i64,
    rules: &GameRules,
    roll: &mut impl Roll,
) -> Result<BustOutcome, ActionError> {
    let (target_id, _) = store
        .find_by_name(target_name.trim())
        .ok_or_else(|| ActionError::PlayerNotFound(target_name.trim().to_string()))?;
    bust(store, rescuer_id, target_id, now, rules, roll)
}

fn commit_admin(
    store: &mut impl PlayerStore,
    target_id: PlayerId,
    outcome: AdminOutcome,
) -> Result<AdminOutcome, ActionError> {
    store.save(target_id, &outcome.player)?;
    store.append_job(target_id, outcome.entry.clone());
    Ok(outcome)
}

pub fn admin_edit(
    store: &mut impl PlayerStore,
    is_admin: bool,
    target_id: PlayerId,
    edit: &StatEdit,
    now: i64,
) -> Result<AdminOutcome, ActionError> {
    admin::require_admin(is_admin)?;
    let target = load(&*store, target_id)?;
    let outcome = admin::apply_stat_edit(&target, edit, now)?;
    commit_admin(store, target_id, outcome)
}

pub fn admin_release(
    store: &mut impl PlayerStore,
    is_admin: bool,
    target_id: PlayerId,
    now: i64,
) -> Result<AdminOutcome, ActionError> {
    admin::require_admin(is_admin)?;
    let target = load(&*store, target_id)?;
    let outcome = admin::release(&target, now)?;
    commit_admin(store, target_id, outcome)
}

pub fn admin_jail(
    store: &mut impl PlayerStore,
    is_admin: bool,
    target_id: PlayerId,
    seconds: i64,
    now: i64,
) -> Result<AdminOutcome, ActionError> {
    admin::require_admin(is_admin)?;
    let target = load(&*store, target_id)?;
    let outcome = admin::jail(&target, seconds, now)?;
    commit_admin(store, target_id, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn register_rejects_duplicate_names() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        register(&mut store, "Michael", 0, &rules).unwrap();
        assert_eq!(
            register(&mut store, " michael ", 0, &rules).unwrap_err(),
            ActionError::NameTaken("michael".into())
        );
        assert_eq!(store.player_count(), 1);
        assert_eq!(store.job_count(), 1);
    }

    #[test]
    fn unknown_player() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let err = attempt_crime(&mut store, 42, "pickpocket", 0, &rules, &mut rng).unwrap_err();
        assert_eq!(err, ActionError::PlayerNotFound("#42".into()));
        assert_eq!(store.job_count(), 0);
    }

    #[test]
    fn rejected_crime_writes_nothing() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let (id, before) = register(&mut store, "Michael", 0, &rules).unwrap();
        assert!(attempt_crime(&mut store, id, "rob_bank", 5, &rules, &mut rng).is_err());
        assert_eq!(store.load(id), Some(before));
        assert_eq!(store.history(id).len(), 1);
    }

    /// Store whose records vanish between load and save.
    struct Vanishing(MemoryStore);

    impl PlayerStore for Vanishing {
        fn load(&self, id: PlayerId) -> Option<PlayerState> {
            self.0.load(id)
        }
        fn find_by_name(&self, name: &str) -> Option<(PlayerId, PlayerState)> {
            self.0.find_by_name(name)
        }
        fn create(&mut self, state: &PlayerState) -> PlayerId {
            self.0.create(state)
        }
        fn save(&mut self, id: PlayerId, _state: &PlayerState) -> Result<(), ActionError> {
            Err(ActionError::PlayerNotFound(format!("#{}", id)))
        }
        fn append_job(&mut self, id: PlayerId, entry: JobEntry) {
            self.0.append_job(id, entry)
        }
    }

    #[test]
    fn failed_save_reports_and_skips_ledger() {
        let rules = GameRules::default();
        let mut store = Vanishing(MemoryStore::new());
        let mut rng = StdRng::seed_from_u64(1);
        let (id, _) = register(&mut store, "Michael", 0, &rules).unwrap();
        let err = attempt_crime(&mut store, id, "pickpocket", 0, &rules, &mut rng).unwrap_err();
        assert_eq!(err, ActionError::PlayerNotFound(format!("#{}", id)));
        assert_eq!(
            admin_jail(&mut store, true, id, 60, 0).unwrap_err(),
            ActionError::PlayerNotFound(format!("#{}", id))
        );
        assert_eq!(store.0.history(id).len(), 1);
    }

    #[test]
    fn self_bust_rejected_by_id() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let (id, _) = register(&mut store, "Michael", 0, &rules).unwrap();
        assert_eq!(
            bust(&mut store, id, id, 0, &rules, &mut rng).unwrap_err(),
            ActionError::SelfBust
        );
    }

    #[test]
    fn bust_unknown_target_name() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let (id, _) = register(&mut store, "Michael", 0, &rules).unwrap();
        assert_eq!(
            bust_by_name(&mut store, id, "Nobody", 0, &rules, &mut rng).unwrap_err(),
            ActionError::PlayerNotFound("Nobody".into())
        );
    }

    #[test]
    fn admin_actions_need_grant() {
        let rules = GameRules::default();
        let mut store = MemoryStore::new();
        let (id, _) = register(&mut store, "Michael", 0, &rules).unwrap();
        assert_eq!(
            admin_jail(&mut store, false, id, 60, 0).unwrap_err(),
            ActionError::AdminOnly
        );
        let out = admin_jail(&mut store, true, id, 60, 0).unwrap();
        assert_eq!(store.load(id).unwrap().jailed_until, Some(60));
        assert_eq!(out.entry.kind, job_kinds::ADMIN_JAIL);
        admin_release(&mut store, true, id, 10).unwrap();
        assert_eq!(store.load(id).unwrap().jailed_until, None);
        assert_eq!(store.history(id).len(), 3);
    }
}
