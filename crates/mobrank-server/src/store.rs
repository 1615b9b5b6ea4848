//! Table-backed [`PlayerStore`] and the row ↔ state conversions.
//!
//! The logic crate works in Unix seconds; tables hold `Timestamp`s. All
//! conversions between the two live here.

use crate::tables::*;
use mobrank_logic::config::GameRules;
use mobrank_logic::error::ActionError;
use mobrank_logic::ledger::JobEntry;
use mobrank_logic::player::{PlayerId, PlayerState};
use mobrank_logic::store::PlayerStore;
use spacetimedb::{ReducerContext, Table, Timestamp};

const MICROS_PER_SEC: i64 = 1_000_000;

/// Primary key of the `game_settings` singleton.
pub const SETTINGS_ID: u32 = 0;

pub fn unix_seconds(ts: Timestamp) -> i64 {
    ts.to_micros_since_unix_epoch() / MICROS_PER_SEC
}

pub fn timestamp(seconds: i64) -> Timestamp {
    Timestamp::from_micros_since_unix_epoch(seconds.saturating_mul(MICROS_PER_SEC))
}

pub fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn state_from_row(row: &Player) -> PlayerState {
    PlayerState {
        name: row.name.clone(),
        cash: row.cash,
        respect: row.respect,
        heat: row.heat,
        experience: row.experience,
        prestige: row.prestige,
        jailed_until: row.jailed_until.map(unix_seconds),
    }
}

fn write_state(row: &mut Player, state: &PlayerState) {
    row.name = state.name.clone();
    row.name_key = name_key(&state.name);
    row.cash = state.cash;
    row.respect = state.respect;
    row.heat = state.heat;
    row.experience = state.experience;
    row.rank = state.rank().to_string();
    row.prestige = state.prestige;
    row.jailed_until = state.jailed_until.map(timestamp);
}

// ============================================================================
// SETTINGS
// ============================================================================

pub fn settings_row(rules: &GameRules, now: Timestamp) -> GameSettings {
    GameSettings {
        id: SETTINGS_ID,
        starting_cash: rules.starting_cash,
        bail_per_minute: rules.bail_per_minute,
        bust_base_chance: rules.bust_base_chance,
        bust_chance_per_rank: rules.bust_chance_per_rank,
        bust_fail_jail_secs: rules.bust_fail_jail_secs,
        bust_respect: rules.bust_respect,
        prestige_base_experience: rules.prestige_base_experience,
        prestige_success_bonus: rules.prestige_success_bonus,
        name_min_len: u32::try_from(rules.name_min_len).unwrap_or(u32::MAX),
        name_max_len: u32::try_from(rules.name_max_len).unwrap_or(u32::MAX),
        updated_at: now,
    }
}

/// Rules currently in force; falls back to defaults before `init` has run.
pub fn active_rules(ctx: &ReducerContext) -> GameRules {
    let Some(s) = ctx.db.game_settings().id().find(SETTINGS_ID) else {
        return GameRules::default();
    };
    GameRules {
        starting_cash: s.starting_cash,
        bail_per_minute: s.bail_per_minute,
        bust_base_chance: s.bust_base_chance,
        bust_chance_per_rank: s.bust_chance_per_rank,
        bust_fail_jail_secs: s.bust_fail_jail_secs,
        bust_respect: s.bust_respect,
        prestige_base_experience: s.prestige_base_experience,
        prestige_success_bonus: s.prestige_success_bonus,
        name_min_len: s.name_min_len as usize,
        name_max_len: s.name_max_len as usize,
    }
}

// ============================================================================
// STORE
// ============================================================================

pub struct TableStore<'a> {
    ctx: &'a ReducerContext,
}

impl<'a> TableStore<'a> {
    pub fn new(ctx: &'a ReducerContext) -> Self {
        Self { ctx }
    }
}

impl PlayerStore for TableStore<'_> {
    fn load(&self, id: PlayerId) -> Option<PlayerState> {
        self.ctx.db.player().id().find(id).map(|row| state_from_row(&row))
    }

    fn find_by_name(&self, name: &str) -> Option<(PlayerId, PlayerState)> {
        let key = name_key(name);
        self.ctx
            .db
            .player()
            .name_key()
            .find(&key)
            .map(|row| (row.id, state_from_row(&row)))
    }

    fn create(&mut self, state: &PlayerState) -> PlayerId {
        let mut row = Player {
            id: 0,
            name: String::new(),
            name_key: String::new(),
            cash: 0,
            respect: 0,
            heat: 0,
            experience: 0,
            rank: String::new(),
            prestige: 0,
            jailed_until: None,
            created_at: self.ctx.timestamp,
        };
        write_state(&mut row, state);
        self.ctx.db.player().insert(row).id
    }

    fn save(&mut self, id: PlayerId, state: &PlayerState) -> Result<(), ActionError> {
        let Some(mut row) = self.ctx.db.player().id().find(id) else {
            log::error!("save: player #{} has no row", id);
            return Err(ActionError::PlayerNotFound(format!("#{}", id)));
        };
        write_state(&mut row, state);
        self.ctx.db.player().id().update(row);
        Ok(())
    }

    fn append_job(&mut self, id: PlayerId, entry: JobEntry) {
        self.ctx.db.job_record().insert(JobRecord {
            id: 0,
            player_id: id,
            kind: entry.kind,
            message: entry.message,
            experience_at: entry.experience_at,
            rank_at: entry.rank_at,
            prestige_at: entry.prestige_at,
            prison_start: entry.prison_start.map(timestamp),
            prison_end: entry.prison_end.map(timestamp),
            created_at: self.ctx.timestamp,
        });
    }
}
