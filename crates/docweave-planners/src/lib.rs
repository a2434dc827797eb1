//! Planner implementations for docweave.
//!
//! `CommandPlanner` resolves commands through the known-command catalog
//! first and falls back to the generative backend, returning either an
//! executable plan or an advisory message.

mod command_planner;

pub use command_planner::{CommandPlanner, CommandPlannerConfig};
