//! Request bodies that are not database entities.

use serde::{Deserialize, Serialize};
use shelternet_db::AnimalReturn;

/// A list of animal ids for request, return-request and adopt batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalRequestIds {
    pub ids: Vec<i64>,
}

impl AnimalRequestIds {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids }
    }
}

/// Animals coming back from a partner location, each with a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalReturnBatch {
    pub animals: Vec<AnimalReturn>,
}

impl AnimalReturnBatch {
    pub fn new(animals: Vec<AnimalReturn>) -> Self {
        Self { animals }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
