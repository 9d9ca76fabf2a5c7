//! Mock collaborators for testing.
//!
//! `InMemoryBank` and `RecordingSink` stand in for the real transfer
//! backend and notification dispatcher, with assertion helpers and
//! switchable failure injection.

use super::traits::{DispatchError, EventSink, SettlementBank, TransferError};
use crate::events::FundEvent;
use crate::types::{Address, Amount, FundId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory settlement bank: credits recipient balances on transfer.
#[derive(Clone, Default)]
pub struct InMemoryBank {
    balances: Arc<Mutex<HashMap<Address, Amount>>>,
    fail_transfers: Arc<AtomicBool>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credited balance of `address` so far.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Make every subsequent transfer fail (until switched back).
    pub fn set_fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SettlementBank for InMemoryBank {
    async fn transfer(&self, recipient: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(TransferError::Rejected("injected failure".to_string()));
        }
        let mut balances = self.balances.lock().unwrap();
        let entry = balances.entry(*recipient).or_insert(0);
        *entry += amount;
        Ok(())
    }
}

/// Event sink that records every published event for assertions.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<(FundId, FundEvent)>>>,
    fail_publish: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(FundId, FundEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Count events matching a predicate.
    pub fn count_matching(&self, predicate: impl Fn(&FundEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, event)| predicate(event))
            .count()
    }

    /// Make every subsequent publish fail. Deliveries are
    /// fire-and-forget, so operations must still succeed.
    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, fund: FundId, event: &FundEvent) -> Result<(), DispatchError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(DispatchError("injected failure".to_string()));
        }
        self.events.lock().unwrap().push((fund, event.clone()));
        Ok(())
    }
}

/// Sink that drops every event. For callers that don't care.
#[derive(Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, _fund: FundId, _event: &FundEvent) -> Result<(), DispatchError> {
        Ok(())
    }
}
