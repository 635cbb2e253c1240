mod actor;
mod date;
mod error;

pub use actor::*;
pub use date::*;
pub use error::*;
