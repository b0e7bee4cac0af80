//! Engine module for FlowEngine implementation.

pub mod core;

pub use core::{validate_run_id, FlowEngine, RunOutcome};
