//! Vote recording and the quorum-threshold rule.
//!
//! Approval requires broad buy-in: the percentage is measured against
//! the whole contributor membership, not against ballots cast, with an
//! absolute minimum-votes floor on top. All threshold math is integer
//! arithmetic using ceiling division, never floats.

use crate::error::{FundError, FundResult};
use crate::types::{Address, ProposalId};
use std::collections::BTreeMap;

/// Per-fund ballot book: (proposal, voter) → support.
///
/// Presence means "has voted"; a cast ballot is immutable.
#[derive(Debug, Clone, Default)]
pub struct VoteBook {
    votes: BTreeMap<(ProposalId, Address), bool>,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ballot. At most one per (proposal, voter).
    pub fn record(&mut self, id: ProposalId, voter: Address, support: bool) -> FundResult<()> {
        if self.votes.contains_key(&(id, voter)) {
            return Err(FundError::AlreadyVoted(id));
        }
        self.votes.insert((id, voter), support);
        Ok(())
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.votes.contains_key(&(id, *voter))
    }
}

/// Votes a proposal needs before it is approved:
/// `max(minimum_votes, ceil(approval_percentage × contributor_count / 100))`.
pub fn required_votes(approval_percentage: u8, minimum_votes: u32, contributor_count: u32) -> u32 {
    let percentage_votes =
        (u64::from(approval_percentage) * u64::from(contributor_count)).div_ceil(100);
    minimum_votes.max(percentage_votes as u32)
}
