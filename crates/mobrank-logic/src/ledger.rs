//! Job ledger entries.
//!
//! Every successful action appends exactly one entry. Entries are facts for
//! history display; player state is never derived from them.

use serde::{Deserialize, Serialize};

use crate::player::PlayerState;

/// Entry kinds that are not crime ids.
pub mod job_kinds {
    pub const REGISTER: &str = "register";
    pub const BAIL: &str = "bail";
    pub const BUST: &str = "bust";
    pub const BUST_FAIL: &str = "bust_fail";
    pub const ADMIN_EDIT: &str = "admin_edit";
    pub const ADMIN_RELEASE: &str = "admin_release";
    pub const ADMIN_JAIL: &str = "admin_jail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEntry {
    /// Crime id or one of [`job_kinds`].
    pub kind: String,
    pub message: String,
    pub experience_at: Option<u64>,
    pub rank_at: Option<String>,
    pub prestige_at: Option<u32>,
    pub prison_start: Option<i64>,
    pub prison_end: Option<i64>,
    /// Unix seconds.
    pub created_at: i64,
}

impl JobEntry {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, now: i64) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            experience_at: None,
            rank_at: None,
            prestige_at: None,
            prison_start: None,
            prison_end: None,
            created_at: now,
        }
    }

    /// Record experience, rank and prestige as they stand in `state`.
    pub fn with_snapshot(mut self, state: &PlayerState) -> Self {
        self.experience_at = Some(state.experience);
        self.rank_at = Some(state.rank().to_string());
        self.prestige_at = Some(state.prestige);
        self
    }

    pub fn with_prison(mut self, start: i64, end: i64) -> Self {
        self.prison_start = Some(start);
        self.prison_end = Some(end);
        self
    }
}
