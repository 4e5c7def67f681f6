//! # Algorithms Module
//!
//! Rate sampling and height projection.

pub mod height_projector;
pub mod rate_estimator;

pub use height_projector::project_height;
pub use rate_estimator::{compute_rate, estimate_rate};
