// Moving session data in and out: JSON snapshots, CSV files and sample seed data.

mod export;
mod import;
mod sample;

pub use export::*;
pub use import::*;
