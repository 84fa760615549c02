//! Token custody port - The external transfer collaborator
//!
//! The pool never holds tokens itself; it instructs the custody
//! collaborator to move them. Transfers are always the last step of an
//! operation, so a failure here rolls back everything the operation
//! changed.

use std::collections::HashSet;
use std::sync::RwLock;

use lendra_core::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Custody failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Transfer of {amount} involving {party} failed: {reason}")]
    TransferFailed {
        party: String,
        amount: Amount,
        reason: String,
    },
}

/// Token custody port
pub trait TokenCustody: Send + Sync {
    /// Pay out pool funds to an account
    fn transfer(&self, to: &str, amount: Amount) -> Result<(), CustodyError>;

    /// Pull funds from an account into the pool
    fn transfer_from(&self, from: &str, amount: Amount) -> Result<(), CustodyError>;
}

/// Direction of a recorded transfer, from the pool's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    /// `transfer_from`: funds entered the pool
    Inbound,
    /// `transfer`: funds left the pool
    Outbound,
}

/// A transfer the mock custody executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub direction: TransferDirection,
    pub party: String,
    pub amount: Amount,
}

/// Mock custody for tests: records transfers and can be told to fail for
/// specific parties, which is how rollback paths are driven.
pub struct MockCustody {
    records: RwLock<Vec<TransferRecord>>,
    failing_parties: RwLock<HashSet<String>>,
}

impl MockCustody {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            failing_parties: RwLock::new(HashSet::new()),
        }
    }

    /// Make every transfer involving `party` fail until cleared
    pub fn fail_for(&self, party: &str) {
        self.failing_parties.write().unwrap().insert(party.to_string());
    }

    /// Clear all injected failures
    pub fn clear_failures(&self) {
        self.failing_parties.write().unwrap().clear();
    }

    /// Transfers executed so far, in call order
    pub fn records(&self) -> Vec<TransferRecord> {
        self.records.read().unwrap().clone()
    }

    fn execute(
        &self,
        direction: TransferDirection,
        party: &str,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        if self.failing_parties.read().unwrap().contains(party) {
            return Err(CustodyError::TransferFailed {
                party: party.to_string(),
                amount,
                reason: "injected failure".to_string(),
            });
        }
        self.records.write().unwrap().push(TransferRecord {
            direction,
            party: party.to_string(),
            amount,
        });
        Ok(())
    }
}

impl Default for MockCustody {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCustody for MockCustody {
    fn transfer(&self, to: &str, amount: Amount) -> Result<(), CustodyError> {
        self.execute(TransferDirection::Outbound, to, amount)
    }

    fn transfer_from(&self, from: &str, amount: Amount) -> Result<(), CustodyError> {
        self.execute(TransferDirection::Inbound, from, amount)
    }
}
