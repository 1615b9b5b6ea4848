//! SpacetimeDB table definitions for the game.
//!
//! `player` and `job_record` mirror `PlayerState` and `JobEntry` from
//! mobrank-logic; the rest is identity and settings plumbing the rules never
//! see.

use spacetimedb::{table, Identity, Timestamp};

// ============================================================================
// SETTINGS
// ============================================================================

/// Active game rules singleton (id always 0)
#[table(name = game_settings, public)]
#[derive(Clone)]
pub struct GameSettings {
    #[primary_key]
    pub id: u32,
    pub starting_cash: i64,
    pub bail_per_minute: i64,
    pub bust_base_chance: f64,
    pub bust_chance_per_rank: f64,
    pub bust_fail_jail_secs: i64,
    pub bust_respect: i64,
    pub prestige_base_experience: u64,
    pub prestige_success_bonus: f64,
    pub name_min_len: u32,
    pub name_max_len: u32,
    pub updated_at: Timestamp,
}

// ============================================================================
// IDENTITY
// ============================================================================

/// Links a connected identity to its player
#[table(name = account, public)]
pub struct Account {
    #[primary_key]
    pub identity: Identity,
    #[unique]
    pub player_id: u64,
    pub created_at: Timestamp,
}

/// Identities allowed to call admin reducers
#[table(name = admin_role, public)]
pub struct AdminRole {
    #[primary_key]
    pub identity: Identity,
    pub granted_by: Identity,
    pub granted_at: Timestamp,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Player record. `rank` is rewritten from `experience` on every save.
#[table(name = player, public)]
#[derive(Clone)]
pub struct Player {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub name: String,
    /// Lower-cased name for case-insensitive uniqueness
    #[unique]
    pub name_key: String,
    pub cash: i64,
    pub respect: i64,
    pub heat: i64,
    pub experience: u64,
    pub rank: String,
    pub prestige: u32,
    pub jailed_until: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Append-only action history
#[table(name = job_record, public)]
pub struct JobRecord {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub player_id: u64,
    pub kind: String,       // crime id or job_kinds::*
    pub message: String,
    pub experience_at: Option<u64>,
    pub rank_at: Option<String>,
    pub prestige_at: Option<u32>,
    pub prison_start: Option<Timestamp>,
    pub prison_end: Option<Timestamp>,
    pub created_at: Timestamp,
}
