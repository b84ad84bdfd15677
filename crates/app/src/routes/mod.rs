//! Operational HTTP endpoints served next to the driver.

pub mod health;
pub mod metrics;
