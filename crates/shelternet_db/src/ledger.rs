//! Shelter capacity bookkeeping.

use crate::error::{DbError, Result};

/// Total and remaining slots of one shelter.
///
/// Invariant: `0 <= remaining <= total`. Every mutation either keeps it or
/// fails without changing the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLedger {
    total: i64,
    remaining: i64,
}

impl CapacityLedger {
    /// A fresh, empty shelter.
    pub fn new(total: i64) -> Result<Self> {
        if total < 0 {
            return Err(DbError::constraint(format!(
                "Shelter capacity must not be negative (got {})",
                total
            )));
        }
        Ok(Self {
            total,
            remaining: total,
        })
    }

    /// Rebuild a ledger from stored values, rejecting rows that break the invariant.
    pub fn restore(total: i64, remaining: i64) -> Result<Self> {
        if total < 0 || remaining < 0 || remaining > total {
            return Err(DbError::corrupted(format!(
                "Capacity ledger: remaining {} of {}",
                remaining, total
            )));
        }
        Ok(Self { total, remaining })
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn occupied(&self) -> i64 {
        self.total - self.remaining
    }

    /// Take `slots` slots.
    pub fn occupy(&mut self, slots: i64) -> Result<()> {
        if slots > self.remaining {
            return Err(DbError::CapacityExceeded {
                requested: slots,
                remaining: self.remaining,
            });
        }
        self.remaining -= slots;
        Ok(())
    }

    /// Give back `slots` slots.
    pub fn release(&mut self, slots: i64) -> Result<()> {
        if slots > self.occupied() {
            return Err(DbError::corrupted(format!(
                "Cannot release {} slot(s): only {} occupied",
                slots,
                self.occupied()
            )));
        }
        self.remaining += slots;
        Ok(())
    }

    /// Apply a signed change to the remaining capacity (positive frees slots).
    pub fn apply_delta(&mut self, delta: i64) -> Result<()> {
        if delta >= 0 {
            self.release(delta)
        } else {
            self.occupy(-delta)
        }
    }
}
