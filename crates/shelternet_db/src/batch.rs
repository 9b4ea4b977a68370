//! Two-phase batch planning for animal status changes.
//!
//! A batch is validated as a whole against the animals' current state and
//! produces either a [`BatchPlan`] (every transition plus the net capacity
//! change per shelter) or a [`BatchRejection`] listing every offending
//! animal. Planning is pure; the store applies a plan inside one transaction.

use crate::types::AnimalStatus;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Note attached to every animal brought back by a return-request.
pub const RETURN_REQUEST_NOTE: &str = "NOTE";

/// The batch operations of the animal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    /// Send available animals to a partner location.
    Request,
    /// Partner location returns animals with per-animal notes.
    Return,
    /// Shelter calls animals back from a partner location.
    ReturnRequest,
    /// Mark animals adopted.
    Adopt,
}

impl BatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Return => "return",
            Self::ReturnRequest => "return-request",
            Self::Adopt => "adopt",
        }
    }

    /// Status every animal ends up in.
    pub fn target(&self) -> AnimalStatus {
        match self {
            Self::Request => AnimalStatus::Offsite,
            Self::Return | Self::ReturnRequest => AnimalStatus::Available,
            Self::Adopt => AnimalStatus::Adopted,
        }
    }

    /// Whether an animal currently in `status` may take part in this batch.
    pub fn accepts(&self, status: AnimalStatus) -> bool {
        match self {
            Self::Request => status == AnimalStatus::Available,
            Self::Return | Self::ReturnRequest => status == AnimalStatus::Offsite,
            Self::Adopt => status.can_transition_to(AnimalStatus::Adopted).is_ok(),
        }
    }
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One requested change: the animal and, for returns, its new notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub animal_id: i64,
    pub notes: Option<String>,
}

impl BatchItem {
    pub fn id(animal_id: i64) -> Self {
        Self {
            animal_id,
            notes: None,
        }
    }

    pub fn with_notes(animal_id: i64, notes: impl Into<String>) -> Self {
        Self {
            animal_id,
            notes: Some(notes.into()),
        }
    }
}

/// What the planner needs to know about an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimalState {
    pub status: AnimalStatus,
    pub shelter_id: Option<i64>,
}

/// A validated status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub animal_id: i64,
    pub shelter_id: Option<i64>,
    pub from: AnimalStatus,
    pub to: AnimalStatus,
    /// Replacement notes; `None` keeps the current notes.
    pub notes: Option<String>,
}

/// A batch that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub operation: BatchOperation,
    /// Transitions in request order.
    pub transitions: Vec<Transition>,
    /// Net change to remaining capacity per shelter id. Zero entries omitted.
    pub capacity_deltas: BTreeMap<i64, i64>,
}

impl BatchPlan {
    pub fn animal_ids(&self) -> Vec<i64> {
        self.transitions.iter().map(|t| t.animal_id).collect()
    }
}

/// Why a single animal blocks a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Unknown { animal_id: i64 },
    Duplicate { animal_id: i64 },
    WrongStatus { animal_id: i64, current: AnimalStatus },
}

impl Violation {
    pub fn animal_id(&self) -> i64 {
        match self {
            Self::Unknown { animal_id }
            | Self::Duplicate { animal_id }
            | Self::WrongStatus { animal_id, .. } => *animal_id,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { animal_id } => write!(f, "animal {} not found", animal_id),
            Self::Duplicate { animal_id } => write!(f, "animal {} listed more than once", animal_id),
            Self::WrongStatus { animal_id, current } => {
                write!(f, "animal {} is {}", animal_id, current)
            }
        }
    }
}

/// A batch that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRejection {
    pub operation: BatchOperation,
    pub violations: Vec<Violation>,
}

impl BatchRejection {
    pub fn animal_ids(&self) -> Vec<i64> {
        self.violations.iter().map(Violation::animal_id).collect()
    }
}

impl fmt::Display for BatchRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: ", self.operation)?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchRejection {}

/// Validate a batch against the current animal states.
///
/// `current` holds every known animal referenced by `items`; missing ids are
/// reported as unknown. Every item is checked so the rejection names all
/// offenders, not just the first.
pub fn plan_batch(
    operation: BatchOperation,
    items: &[BatchItem],
    current: &BTreeMap<i64, AnimalState>,
) -> Result<BatchPlan, BatchRejection> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut violations = Vec::new();
    let mut transitions = Vec::with_capacity(items.len());
    let target = operation.target();

    for item in items {
        let animal_id = item.animal_id;
        if !seen.insert(animal_id) {
            violations.push(Violation::Duplicate { animal_id });
            continue;
        }

        let Some(state) = current.get(&animal_id) else {
            violations.push(Violation::Unknown { animal_id });
            continue;
        };

        if !operation.accepts(state.status) {
            violations.push(Violation::WrongStatus {
                animal_id,
                current: state.status,
            });
            continue;
        }

        let notes = match operation {
            BatchOperation::ReturnRequest => Some(RETURN_REQUEST_NOTE.to_string()),
            _ => item.notes.clone(),
        };

        transitions.push(Transition {
            animal_id,
            shelter_id: state.shelter_id,
            from: state.status,
            to: target,
            notes,
        });
    }

    if !violations.is_empty() {
        return Err(BatchRejection {
            operation,
            violations,
        });
    }

    let mut capacity_deltas = BTreeMap::new();
    for transition in &transitions {
        let Some(shelter_id) = transition.shelter_id else {
            continue;
        };
        let delta = transition.from.capacity_delta(transition.to);
        if delta != 0 {
            *capacity_deltas.entry(shelter_id).or_insert(0) += delta;
        }
    }
    capacity_deltas.retain(|_, delta| *delta != 0);

    Ok(BatchPlan {
        operation,
        transitions,
        capacity_deltas,
    })
}
