//! Mobrank Server - SpacetimeDB Module
//!
//! Durable state for the crime game: accounts, players, the job ledger,
//! admin roles and the active rules. Reducers are thin wrappers that hand
//! a [`store::TableStore`] to `mobrank_logic::actions`.

mod reducers;
mod store;
mod tables;

pub use reducers::*;
pub use tables::*;
