//! Proposal records and registry.
//!
//! Proposals are created by contributors, voted on by contributors, and
//! either executed (terminal) or canceled by their proposer before
//! execution (terminal). Ids are sequential per fund, starting at 1.

use crate::error::{FundError, FundResult};
use crate::types::{Address, Amount, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// One disbursement proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub description: String,
    pub votes_for: u32,
    pub votes_against: u32,
    /// Irreversible once set; flips on the vote that first reaches the
    /// approval threshold.
    pub approved: bool,
    /// Set at most once, before the external transfer is performed.
    pub executed: bool,
    pub canceled: bool,
    /// Unix timestamp (seconds).
    pub created_at: u64,
}

/// Proposal registry for one fund.
#[derive(Debug, Clone)]
pub struct ProposalBook {
    proposals: BTreeMap<ProposalId, Proposal>,
    next_id: ProposalId,
}

impl Default for ProposalBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalBook {
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a proposal in pending state and return its id.
    ///
    /// Validates the payload only; authorization and balance checks
    /// belong to the fund aggregate.
    pub fn create(
        &mut self,
        proposer: Address,
        recipient: Address,
        amount: Amount,
        description: String,
    ) -> FundResult<ProposalId> {
        if recipient.is_zero() {
            return Err(FundError::NullRecipient);
        }
        if amount == 0 {
            return Err(FundError::AmountNotPositive);
        }
        if description.trim().is_empty() {
            return Err(FundError::EmptyDescription);
        }

        let id = self.next_id;
        self.next_id += 1;

        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer,
                recipient,
                amount,
                description,
                votes_for: 0,
                votes_against: 0,
                approved: false,
                executed: false,
                canceled: false,
                created_at: unix_now(),
            },
        );
        Ok(id)
    }

    /// Cancel a proposal. Proposer-only, and only while unexecuted.
    pub fn cancel(&mut self, caller: Address, id: ProposalId) -> FundResult<()> {
        let proposal = self.get_mut(id)?;
        if proposal.proposer != caller {
            return Err(FundError::NotProposer(id));
        }
        if proposal.executed {
            return Err(FundError::AlreadyExecuted(id));
        }
        if proposal.canceled {
            return Err(FundError::ProposalCanceled(id));
        }
        proposal.canceled = true;
        Ok(())
    }

    pub fn get(&self, id: ProposalId) -> FundResult<&Proposal> {
        self.proposals
            .get(&id)
            .ok_or(FundError::ProposalNotFound(id))
    }

    pub fn get_mut(&mut self, id: ProposalId) -> FundResult<&mut Proposal> {
        self.proposals
            .get_mut(&id)
            .ok_or(FundError::ProposalNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System clock is before UNIX epoch")
        .as_secs()
}
