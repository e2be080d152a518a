//! CLI library components for the vigency runner.

pub mod config;
pub mod logging;
pub mod pipeline;
