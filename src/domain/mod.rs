mod category;
mod ledger;
mod money;
mod savings;
mod time;
mod transaction;

pub use category::*;
pub use ledger::*;
pub use money::*;
pub use savings::*;
pub use time::*;
pub use transaction::*;
