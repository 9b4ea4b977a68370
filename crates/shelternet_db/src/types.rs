//! Shelternet database entities.
//!
//! These types double as the JSON payloads of the HTTP API, so field names
//! serialize in camelCase and statuses in SCREAMING_CASE.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Animals
// ============================================================================

/// Lifecycle status of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalStatus {
    /// On the premises and open for requests or adoption.
    Available,
    /// Adoption in progress; still on the premises.
    Pending,
    /// Sent to a partner retail location.
    Offsite,
    /// Adopted. Terminal.
    Adopted,
}

impl AnimalStatus {
    pub const ALL: [AnimalStatus; 4] = [
        Self::Available,
        Self::Pending,
        Self::Offsite,
        Self::Adopted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Pending => "PENDING",
            Self::Offsite => "OFFSITE",
            Self::Adopted => "ADOPTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Some(Self::Available),
            "PENDING" => Some(Self::Pending),
            "OFFSITE" => Some(Self::Offsite),
            "ADOPTED" => Some(Self::Adopted),
            _ => None,
        }
    }
}

impl Default for AnimalStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl std::fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An animal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: i64,
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub color: String,
    pub notes: Option<String>,
    pub status: AnimalStatus,
    /// Owning shelter, if any. Back reference only.
    pub shelter_id: Option<i64>,
}

/// Input for creating an animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnimal {
    pub species: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub color: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Initial status; AVAILABLE when omitted.
    #[serde(default)]
    pub status: Option<AnimalStatus>,
    /// Shelter to place the animal in.
    #[serde(default)]
    pub shelter_id: Option<i64>,
}

impl NewAnimal {
    pub fn new(
        species: &str,
        breed: &str,
        birth_date: NaiveDate,
        sex: &str,
        color: &str,
    ) -> Self {
        Self {
            species: species.to_string(),
            breed: breed.to_string(),
            birth_date,
            sex: sex.to_string(),
            color: color.to_string(),
            notes: None,
            status: None,
            shelter_id: None,
        }
    }

    pub fn in_shelter(mut self, shelter_id: i64) -> Self {
        self.shelter_id = Some(shelter_id);
        self
    }

    pub fn with_status(mut self, status: AnimalStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn initial_status(&self) -> AnimalStatus {
        self.status.unwrap_or_default()
    }
}

/// One entry of a return batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalReturn {
    pub id: i64,
    pub notes: String,
}

impl AnimalReturn {
    pub fn new(id: i64, notes: &str) -> Self {
        Self {
            id,
            notes: notes.to_string(),
        }
    }
}

// ============================================================================
// Shelters
// ============================================================================

/// A shelter and its capacity ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub total_capacity: i64,
    pub remaining_capacity: i64,
}

/// A shelter together with the animals it owns, ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterDetail {
    #[serde(flatten)]
    pub shelter: Shelter,
    pub animals: Vec<Animal>,
}

/// Input for creating a shelter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShelter {
    pub name: String,
    pub capacity: i64,
}

impl NewShelter {
    pub fn new(name: &str, capacity: i64) -> Self {
        Self {
            name: name.to_string(),
            capacity,
        }
    }
}

// ============================================================================
// Adoption Applications
// ============================================================================

/// Review status of an adoption application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted adoption application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionApplication {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub animal_id: i64,
    pub status: ApplicationStatus,
}

/// Input for submitting an adoption application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub animal_id: i64,
}

impl NewApplication {
    pub fn new(name: &str, address: &str, phone_number: &str, animal_id: i64) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            phone_number: phone_number.to_string(),
            animal_id,
        }
    }
}
