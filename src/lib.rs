pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod logging;
pub mod report;
pub mod state;

pub use events::{TestEvent, replay};
pub use report::{ProgressReporter, TestOutcomeListener};
