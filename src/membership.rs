//! Membership and invitation lifecycle.
//!
//! Who may contribute, propose, and vote. Private funds gate membership
//! behind a creator-issued invitation that the invitee must accept;
//! public funds auto-activate a member on their first deposit.
//!
//! "Is a contributor" is an explicit capability check here, kept
//! separate from ledger arithmetic so authorization is independently
//! testable.

use crate::error::{FundError, FundResult};
use crate::types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    /// Invitation issued, not yet accepted.
    Invited,
    /// Full member; may deposit, and propose/vote once a contributor.
    Active,
}

/// One fund member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub address: Address,
    pub status: MemberStatus,
    /// Lifetime deposit total. Never decreases; settlement weights are
    /// computed from it even after disbursements.
    pub contribution_total: Amount,
    pub has_withdrawn: bool,
}

impl Member {
    fn new(address: Address, status: MemberStatus) -> Self {
        Self {
            address,
            status,
            contribution_total: 0,
            has_withdrawn: false,
        }
    }
}

/// Member map for one fund.
///
/// BTreeMap keeps contributor iteration deterministic.
#[derive(Debug, Clone, Default)]
pub struct MembershipBook {
    members: BTreeMap<Address, Member>,
}

impl MembershipBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the fund creator as an active member at fund creation.
    /// The creator never needs an invitation, even on a private fund.
    pub fn register_creator(&mut self, creator: Address) {
        self.members
            .insert(creator, Member::new(creator, MemberStatus::Active));
    }

    /// Record an invitation for `target`.
    ///
    /// Fails if `target` is already an active member or already holds a
    /// pending invitation.
    pub fn invite(&mut self, target: Address) -> FundResult<()> {
        match self.members.get(&target).map(|m| m.status) {
            Some(MemberStatus::Active) => Err(FundError::AlreadyMember),
            Some(MemberStatus::Invited) => Err(FundError::InvitationPending),
            None => {
                self.members
                    .insert(target, Member::new(target, MemberStatus::Invited));
                Ok(())
            }
        }
    }

    /// Accept a pending invitation, transitioning the member to active.
    pub fn accept_invitation(&mut self, caller: Address) -> FundResult<()> {
        match self.members.get_mut(&caller) {
            Some(member) if member.status == MemberStatus::Invited => {
                member.status = MemberStatus::Active;
                Ok(())
            }
            Some(_) => Err(FundError::AlreadyMember),
            None => Err(FundError::NoPendingInvitation),
        }
    }

    /// Check, without mutating, whether `caller` may deposit.
    ///
    /// Runs before the ledger is touched so a rejection leaves no
    /// partial state behind.
    pub fn check_deposit_eligibility(&self, caller: &Address, is_private: bool) -> FundResult<()> {
        match self.members.get(caller).map(|m| m.status) {
            Some(MemberStatus::Active) => Ok(()),
            Some(MemberStatus::Invited) => Err(FundError::NotInvited),
            None if is_private => Err(FundError::NotInvited),
            None => Ok(()),
        }
    }

    /// Record a deposit for `caller` and return their new lifetime total.
    ///
    /// On a public fund the first deposit implicitly registers an active
    /// membership; on a private fund the caller must already be active.
    pub fn record_deposit(
        &mut self,
        caller: Address,
        amount: Amount,
        is_private: bool,
    ) -> FundResult<Amount> {
        let member = match self.members.get_mut(&caller) {
            Some(member) => {
                if member.status != MemberStatus::Active {
                    return Err(FundError::NotInvited);
                }
                member
            }
            None if is_private => return Err(FundError::NotInvited),
            None => {
                // Public fund: first deposit registers membership
                self.members
                    .entry(caller)
                    .or_insert_with(|| Member::new(caller, MemberStatus::Active))
            }
        };

        member.contribution_total = member
            .contribution_total
            .checked_add(amount)
            .ok_or(FundError::AmountOverflow)?;
        Ok(member.contribution_total)
    }

    /// Capability check: active member with a nonzero lifetime deposit.
    pub fn is_contributor(&self, address: &Address) -> bool {
        self.members
            .get(address)
            .map(|m| m.status == MemberStatus::Active && m.contribution_total > 0)
            .unwrap_or(false)
    }

    pub fn get(&self, address: &Address) -> Option<&Member> {
        self.members.get(address)
    }

    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Member> {
        self.members.get_mut(address)
    }

    /// Addresses of all contributors, in deterministic order.
    pub fn contributors(&self) -> Vec<Address> {
        self.members
            .values()
            .filter(|m| m.status == MemberStatus::Active && m.contribution_total > 0)
            .map(|m| m.address)
            .collect()
    }

    pub fn contributor_count(&self) -> u32 {
        self.members
            .values()
            .filter(|m| m.status == MemberStatus::Active && m.contribution_total > 0)
            .count() as u32
    }
}
