//! clanhall — membership and rewards portal core for a gaming clan.
//!
//! The domain crates carry the behavior: `clanhall-ledger` (points),
//! `clanhall-store` (catalog + redemption), `clanhall-raffle` (draws),
//! `clanhall-user` (membership lifecycle) and `clanhall-notification`,
//! all speaking to a document store behind the `clanhall-db` trait
//! boundary. This crate ties them together: configuration, tracing setup
//! and the [`State`] composition root.

pub mod config;
pub mod observability;
pub mod state;

pub use clanhall_db as db;
pub use clanhall_ledger as ledger;
pub use clanhall_notification as notification;
pub use clanhall_raffle as raffle;
pub use clanhall_store as store;
pub use clanhall_user as user;

pub use clanhall_shared::{Actor, Error, Result, Role};
pub use config::Config;
pub use state::State;
