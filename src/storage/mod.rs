// In-memory stores. Both live for the lifetime of the owning session only.

mod error;
mod ledger;
mod tracker;

pub use error::*;
pub use ledger::*;
pub use tracker::*;
