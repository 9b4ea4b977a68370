//! HTTP handlers, grouped by resource.

pub mod animals;
pub mod applications;
pub mod health;
pub mod shelters;
