// Application layer: authentication, the session gate and reporting over the stores.

mod auth;
mod error;
mod reporting;
mod session;

pub use auth::*;
pub use error::*;
pub use reporting::*;
pub use session::*;
