//! Action errors.
//!
//! No error mutates state: when an action returns `Err`, the player record
//! and the job ledger are exactly as they were. [`ErrorKind`] groups the
//! variants the way callers report them.

use serde::Serialize;
use thiserror::Error;

/// How a failed action should be reported to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed request: unknown crime id, bad name, bad stat value.
    Input,
    /// Well-formed but not allowed in the current game state.
    Rejected,
    /// Unknown player or target reference.
    NotFound,
    /// Admin-only operation called without an admin grant.
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown crime '{0}'")]
    UnknownCrime(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("invalid value {value} for {field}")]
    InvalidStat { field: &'static str, value: i64 },

    #[error("{crime} requires rank {required}; you are {current}")]
    RankTooLow {
        crime: &'static str,
        required: &'static str,
        current: &'static str,
    },
    #[error("you are in jail for another {seconds_left}s")]
    Incarcerated { seconds_left: i64 },
    #[error("you are not in jail")]
    NotIncarcerated,
    #[error("{0} is not in jail")]
    TargetNotIncarcerated(String),
    #[error("you cannot bust yourself out; pay bail instead")]
    SelfBust,
    #[error("not enough cash: need ${cost}, you have ${cash}")]
    InsufficientCash { cost: i64, cash: i64 },
    #[error("the name '{0}' is already taken")]
    NameTaken(String),
    #[error("you already have a player")]
    AlreadyRegistered,

    #[error("no player '{0}'")]
    PlayerNotFound(String),
    #[error("you have not registered a player")]
    NotRegistered,

    #[error("admin only")]
    AdminOnly,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::UnknownCrime(_)
            | ActionError::InvalidName(_)
            | ActionError::InvalidStat { .. } => ErrorKind::Input,
            ActionError::RankTooLow { .. }
            | ActionError::Incarcerated { .. }
            | ActionError::NotIncarcerated
            | ActionError::TargetNotIncarcerated(_)
            | ActionError::SelfBust
            | ActionError::InsufficientCash { .. }
            | ActionError::NameTaken(_)
            | ActionError::AlreadyRegistered => ErrorKind::Rejected,
            ActionError::PlayerNotFound(_) | ActionError::NotRegistered => ErrorKind::NotFound,
            ActionError::AdminOnly => ErrorKind::Forbidden,
        }
    }
}
