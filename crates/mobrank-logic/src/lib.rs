//! Pure game rules for Mobrank.
//!
//! This crate contains all game logic that is independent of any database
//! or runtime. Functions take plain data, a clock value and a random source,
//! and return the new state plus an outcome message, making them
//! unit-testable and portable across the SpacetimeDB module, the native
//! simtest harness, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`actions`] | Load → resolve → save → append for every player/admin action |
//! | [`admin`] | Admin stat edits, release and jail |
//! | [`config`] | Tunable [`config::GameRules`] and their validation |
//! | [`crimes`] | Static crime catalog and rank unlock gate |
//! | [`dice`] | Injectable random source ([`dice::Roll`]) |
//! | [`error`] | [`error::ActionError`] and its reporting kinds |
//! | [`ledger`] | Job ledger entries |
//! | [`player`] | Player state, derived rank, summaries, name validation |
//! | [`prison`] | Custody, bail pricing, busts |
//! | [`progression`] | Crime resolution, rank-ups, prestige rollover |
//! | [`ranks`] | Static rank ladder |
//! | [`store`] | Record-store seam and in-memory store |

pub mod actions;
pub mod admin;
pub mod config;
pub mod crimes;
pub mod dice;
pub mod error;
pub mod ledger;
pub mod player;
pub mod prison;
pub mod progression;
pub mod ranks;
pub mod store;
