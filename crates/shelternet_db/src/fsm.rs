//! Animal status transitions.
//!
//! Legal transitions:
//!
//! - Available → Pending (application approved)
//! - Available → Offsite (requested by a partner location)
//! - Available → Adopted
//! - Offsite → Available (returned)
//! - Offsite → Adopted (adopted from the partner location)
//! - Pending → Adopted
//!
//! Adopted is terminal.

use crate::error::{DbError, Result};
use crate::types::AnimalStatus;

impl AnimalStatus {
    /// Whether an animal in this status takes up a slot in its shelter.
    ///
    /// Animals on the premises (Available, Pending) occupy a slot; Offsite and
    /// Adopted animals do not.
    pub fn occupies_slot(&self) -> bool {
        matches!(self, Self::Available | Self::Pending)
    }

    /// Checks whether moving to `target` is a legal transition.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidState` if the transition is not allowed.
    pub fn can_transition_to(&self, target: AnimalStatus) -> Result<()> {
        if self.valid_transitions().contains(&target) {
            return Ok(());
        }

        Err(DbError::invalid_state(format!(
            "Cannot transition animal from {} to {}",
            self, target
        )))
    }

    /// Returns the statuses reachable from this one.
    pub fn valid_transitions(&self) -> Vec<AnimalStatus> {
        match self {
            Self::Available => vec![Self::Pending, Self::Offsite, Self::Adopted],
            Self::Offsite => vec![Self::Available, Self::Adopted],
            Self::Pending => vec![Self::Adopted],
            Self::Adopted => vec![],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Signed change to a shelter's remaining capacity when an animal moves
    /// from `self` to `target`. Positive frees slots.
    pub fn capacity_delta(&self, target: AnimalStatus) -> i64 {
        i64::from(self.occupies_slot()) - i64::from(target.occupies_slot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AnimalStatus::*;

    #[test]
    fn test_available_transitions() {
        assert!(Available.can_transition_to(Pending).is_ok());
        assert!(Available.can_transition_to(Offsite).is_ok());
        assert!(Available.can_transition_to(Adopted).is_ok());
        assert!(Available.can_transition_to(Available).is_err());
    }

    #[test]
    fn test_offsite_transitions() {
        assert!(Offsite.can_transition_to(Available).is_ok());
        assert!(Offsite.can_transition_to(Adopted).is_ok());
        assert!(Offsite.can_transition_to(Pending).is_err());
    }

    #[test]
    fn test_adopted_is_terminal() {
        assert!(Adopted.is_terminal());
        for target in AnimalStatus::ALL {
            let err = Adopted.can_transition_to(target).unwrap_err();
            assert!(matches!(err, DbError::InvalidState(_)));
        }
    }

    #[test]
    fn test_capacity_delta_tracks_premises() {
        assert_eq!(Available.capacity_delta(Offsite), 1);
        assert_eq!(Offsite.capacity_delta(Available), -1);
        assert_eq!(Available.capacity_delta(Adopted), 1);
        assert_eq!(Pending.capacity_delta(Adopted), 1);
        assert_eq!(Offsite.capacity_delta(Adopted), 0);
        assert_eq!(Available.capacity_delta(Pending), 0);
    }
}
