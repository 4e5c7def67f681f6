//! Integration flows.

pub mod fixtures;
mod upgrade_flow;
