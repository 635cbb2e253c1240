//! Membership lifecycle: registration, admin approval, role changes and
//! member listings.

mod command;
mod model;
mod query;

pub use command::*;
pub use model::*;
pub use query::*;
