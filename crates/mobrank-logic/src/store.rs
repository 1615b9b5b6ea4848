//! Record-store seam.
//!
//! The rules never talk to a database directly. [`PlayerStore`] is the
//! minimum an action needs: read a player, write it back, append a ledger
//! entry. The SpacetimeDB module implements it over its tables; tests and
//! the simtest harness use [`MemoryStore`].

use std::collections::BTreeMap;

use crate::error::ActionError;
use crate::ledger::JobEntry;
use crate::player::{PlayerId, PlayerState};

pub trait PlayerStore {
    fn load(&self, id: PlayerId) -> Option<PlayerState>;

    /// Case-insensitive lookup by display name.
    fn find_by_name(&self, name: &str) -> Option<(PlayerId, PlayerState)>;

    /// Insert a new record and return its id.
    fn create(&mut self, state: &PlayerState) -> PlayerId;

    /// Overwrite an existing record. Fails with
    /// [`ActionError::PlayerNotFound`] when `id` has no record.
    fn save(&mut self, id: PlayerId, state: &PlayerState) -> Result<(), ActionError>;

    fn append_job(&mut self, id: PlayerId, entry: JobEntry);
}

/// In-process store for tests and the harness.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: BTreeMap<PlayerId, PlayerState>,
    jobs: Vec<(PlayerId, JobEntry)>,
    next_id: PlayerId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// A player's ledger, oldest first.
    pub fn history(&self, id: PlayerId) -> Vec<&JobEntry> {
        self.jobs
            .iter()
            .filter(|(owner, _)| *owner == id)
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

impl PlayerStore for MemoryStore {
    fn load(&self, id: PlayerId) -> Option<PlayerState> {
        self.players.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<(PlayerId, PlayerState)> {
        self.players
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
            .map(|(id, p)| (*id, p.clone()))
    }

    fn create(&mut self, state: &PlayerState) -> PlayerId {
        // Default-constructed stores start at 0; keep ids non-zero.
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.players.insert(id, state.clone());
        id
    }

    fn save(&mut self, id: PlayerId, state: &PlayerState) -> Result<(), ActionError> {
        let slot = self
            .players
            .get_mut(&id)
            .ok_or_else(|| ActionError::PlayerNotFound(format!("#{}", id)))?;
        *slot = state.clone();
        Ok(())
    }

    fn append_job(&mut self, id: PlayerId, entry: JobEntry) {
        self.jobs.push((id, entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameRules;

    #[test]
    fn create_load_save() {
        let mut store = MemoryStore::new();
        let mut p = PlayerState::new("Tessio", &GameRules::default());
        let id = store.create(&p);
        assert_eq!(store.load(id), Some(p.clone()));
        p.cash = 5;
        store.save(id, &p).unwrap();
        assert_eq!(store.load(id).unwrap().cash, 5);
        assert_eq!(store.load(id + 1), None);
    }

    #[test]
    fn save_requires_existing_record() {
        let mut store = MemoryStore::new();
        let p = PlayerState::new("Tessio", &GameRules::default());
        assert_eq!(
            store.save(7, &p),
            Err(ActionError::PlayerNotFound("#7".into()))
        );
        assert_eq!(store.player_count(), 0);
    }

    #[test]
    fn ids_unique_even_from_default() {
        let mut store = MemoryStore::default();
        let p = PlayerState::new("Tessio", &GameRules::default());
        let a = store.create(&p);
        let b = store.create(&p);
        assert_ne!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn name_lookup_ignores_case() {
        let mut store = MemoryStore::new();
        let id = store.create(&PlayerState::new("Tessio", &GameRules::default()));
        assert_eq!(store.find_by_name("tessio").map(|(i, _)| i), Some(id));
        assert!(store.find_by_name("Tom").is_none());
    }

    #[test]
    fn history_per_player() {
        let mut store = MemoryStore::new();
        store.append_job(1, JobEntry::new("a", "first", 1));
        store.append_job(2, JobEntry::new("b", "other", 2));
        store.append_job(1, JobEntry::new("c", "second", 3));
        let h = store.history(1);
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].message, "first");
        assert_eq!(h[1].message, "second");
        assert_eq!(store.job_count(), 3);
    }
}
