//! Rewards store: catalog administration and the redemption protocol.
//! Redemption is the strictest path in the system: balance check, stock
//! check, debit, decrement and record creation are one optimistic
//! transaction.

mod command;
mod model;
mod query;

pub use command::*;
pub use model::*;
pub use query::*;
