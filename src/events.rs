//! Domain events.
//!
//! Emitted after a mutation commits, for external indexers and
//! notification dispatchers. Delivery is fire-and-forget; the engine
//! never blocks or fails on a slow or broken subscriber.

use crate::types::{Address, Amount, ProposalId};
use serde::{Deserialize, Serialize};

/// One domain event produced by a committed fund mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundEvent {
    ContributionReceived {
        member: Address,
        amount: Amount,
        new_total: Amount,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        recipient: Address,
        amount: Amount,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: bool,
    },
    /// Fired exactly once per proposal, on the vote that first reaches
    /// the approval threshold.
    ProposalApproved {
        id: ProposalId,
        votes_for: u32,
    },
    ProposalExecuted {
        id: ProposalId,
        recipient: Address,
        amount: Amount,
    },
    FundClosed {
        balance_at_closure: Amount,
    },
}
