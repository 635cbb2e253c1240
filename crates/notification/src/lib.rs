mod command;
mod model;
mod query;

pub use command::*;
pub use model::*;
pub use query::*;
