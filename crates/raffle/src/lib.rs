//! Raffle engine: roster management plus a single, irreversible draw.
//! Winner selection is a pure function over the roster; the status
//! transition, the winner fields and the winner's notification persist in
//! one transaction, before any presentation-layer spinning starts.

mod command;
mod draw;
mod model;
mod query;

pub use command::*;
pub use draw::pick_winner;
pub use model::*;
pub use query::*;
