pub mod commands;
pub mod config;
pub mod logging;
pub mod preferences;
pub mod report;
pub mod session;
pub mod state;
pub mod tutorial;
pub mod utils;

pub use session::{Outcome, Session};
