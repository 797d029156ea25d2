//! Application layer: the run sequence.

pub mod runner;

pub use runner::{MAX_STARTUP_DELAY, Runner};
