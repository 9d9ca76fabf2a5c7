//! Collaborator trait abstractions.
//!
//! These traits keep the engine testable without real infrastructure:
//! `SettlementBank` stands in for whatever actually moves value, and
//! `EventSink` for whatever indexes or notifies on domain events.

use crate::events::FundEvent;
use crate::types::{Address, Amount, FundId};
use async_trait::async_trait;

/// External value-transfer boundary.
///
/// The service calls this only after the corresponding state write has
/// committed under the fund mutex; a failure here rolls that write
/// back. Implementations must not call back into the fund.
#[async_trait]
pub trait SettlementBank: Send + Sync {
    /// Pay `amount` to `recipient`.
    async fn transfer(&self, recipient: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// Transfer boundary errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransferError {
    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error("transfer backend unavailable: {0}")]
    Unavailable(String),
}

/// Notification/indexer boundary. Fire-and-forget: the service logs a
/// failed delivery and moves on, never failing the operation.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, fund: FundId, event: &FundEvent) -> Result<(), DispatchError>;
}

/// Event delivery errors. Informational only.
#[derive(Debug, Clone, thiserror::Error)]
#[error("event dispatch failed: {0}")]
pub struct DispatchError(pub String);
