//! Switchboard - adaptive service router
//!
//! This library routes logical request categories to live backend services,
//! falling back across an ordered chain on failure and adjusting each
//! service's eligibility from observed health and performance.

pub mod capability;
pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod optimizer;
pub mod registry;
pub mod routing;

mod switchboard;

pub use switchboard::{Switchboard, SwitchboardBuilder};
