//! Routing
//!
//! - **guard**: Route table and the pure guard decision
//! - **navigator**: Current location, re-evaluated on auth changes

pub mod guard;
pub mod navigator;

pub use guard::{guard, GuardDecision, Route};
pub use navigator::Navigator;
