//! The fund aggregate.
//!
//! One `Fund` owns its nickname registry, member map, ledger, proposal
//! book, and ballot book. There is no ambient or global state, one
//! instance per fund. Every mutating operation is check-then-act and
//! all-or-nothing:
//! on any precondition failure the fund is untouched and a specific
//! error comes back. Committed mutations return the domain events they
//! produced; the async service layer dispatches them.
//!
//! Disbursement and withdrawal are two-phase (`begin_*` / `abort_*`):
//! the state write commits first, the external transfer runs second,
//! and a transfer failure unwinds the staged write. Combined with the
//! per-fund mutex in the service layer this closes the reentrancy
//! window between approval and settlement.

use crate::config::FundConfig;
use crate::error::{FundError, FundResult};
use crate::events::FundEvent;
use crate::identity::NicknameRegistry;
use crate::ledger::ContributionLedger;
use crate::membership::{Member, MembershipBook};
use crate::proposal::{Proposal, ProposalBook};
use crate::settlement::proportional_share;
use crate::types::{Address, Amount, FundId, ProposalId};
use crate::voting::{required_votes, VoteBook};
use serde::{Deserialize, Serialize};

/// Group treasury with quorum-governed spending.
#[derive(Debug, Clone)]
pub struct Fund {
    id: FundId,
    config: FundConfig,
    creator: Address,
    active: bool,
    /// Frozen once, by `close`.
    balance_at_closure: Option<Amount>,
    nicknames: NicknameRegistry,
    members: MembershipBook,
    ledger: ContributionLedger,
    proposals: ProposalBook,
    votes: VoteBook,
}

/// Read model snapshot, comparable against external mirror ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundInfo {
    pub id: FundId,
    pub name: String,
    pub description: String,
    pub target_amount: Amount,
    pub is_private: bool,
    pub approval_percentage: u8,
    pub minimum_votes: u32,
    pub active: bool,
    pub creator: Address,
    pub total_contributions: Amount,
    pub current_balance: Amount,
    pub contributor_count: u32,
    pub proposal_count: u64,
    pub balance_at_closure: Option<Amount>,
}

impl Fund {
    /// Create a fund. The creator becomes an active member immediately
    /// and never needs an invitation, private or not.
    pub fn new(creator: Address, config: FundConfig) -> FundResult<Self> {
        config.validate()?;
        let mut members = MembershipBook::new();
        members.register_creator(creator);

        Ok(Self {
            id: FundId::new(),
            config,
            creator,
            active: true,
            balance_at_closure: None,
            nicknames: NicknameRegistry::new(),
            members,
            ledger: ContributionLedger::new(),
            proposals: ProposalBook::new(),
            votes: VoteBook::new(),
        })
    }

    // --- identity ---

    /// Bind a nickname to the caller. Identity-level, so it stays
    /// available after closure.
    pub fn set_nickname(&mut self, caller: Address, name: &str) -> FundResult<()> {
        self.nicknames.set_nickname(caller, name)
    }

    // --- membership ---

    /// Invite `target` by address. Creator-only; self-invite forbidden.
    pub fn invite_by_address(&mut self, caller: Address, target: Address) -> FundResult<()> {
        self.ensure_active()?;
        if caller != self.creator {
            return Err(FundError::NotCreator);
        }
        if target == caller {
            return Err(FundError::SelfInvite);
        }
        self.members.invite(target)
    }

    /// Invite by registered nickname.
    pub fn invite_by_nickname(&mut self, caller: Address, nickname: &str) -> FundResult<()> {
        let target = self.nicknames.resolve(nickname)?;
        self.invite_by_address(caller, target)
    }

    /// Accept a pending invitation, becoming an active member.
    pub fn accept_invitation(&mut self, caller: Address) -> FundResult<()> {
        self.ensure_active()?;
        self.members.accept_invitation(caller)
    }

    // --- contributions ---

    /// Deposit value into the fund.
    pub fn deposit(&mut self, caller: Address, amount: Amount) -> FundResult<FundEvent> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(FundError::AmountNotPositive);
        }
        self.members
            .check_deposit_eligibility(&caller, self.config.is_private)?;

        self.ledger.record_deposit(amount)?;
        // Cannot fail now: eligibility is pre-checked and the member
        // total is bounded by the aggregate total that just fit.
        let new_total = self
            .members
            .record_deposit(caller, amount, self.config.is_private)?;

        Ok(FundEvent::ContributionReceived {
            member: caller,
            amount,
            new_total,
        })
    }

    // --- proposals ---

    /// Create a disbursement proposal and return its id.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        recipient: Address,
        amount: Amount,
        description: String,
    ) -> FundResult<(ProposalId, FundEvent)> {
        self.ensure_active()?;
        self.ensure_contributor(&caller)?;

        let available = self.ledger.current_balance();
        if amount > available {
            return Err(FundError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let id = self.proposals.create(caller, recipient, amount, description)?;
        Ok((
            id,
            FundEvent::ProposalCreated {
                id,
                proposer: caller,
                recipient,
                amount,
            },
        ))
    }

    /// Cancel a proposal. Proposer-only, pre-execution only.
    pub fn cancel_proposal(&mut self, caller: Address, id: ProposalId) -> FundResult<()> {
        self.ensure_active()?;
        self.proposals.cancel(caller, id)
    }

    // --- voting ---

    /// Cast a ballot. Returns `VoteCast`, plus `ProposalApproved` when
    /// this is the vote that first reaches the threshold.
    pub fn vote(
        &mut self,
        caller: Address,
        id: ProposalId,
        support: bool,
    ) -> FundResult<Vec<FundEvent>> {
        self.ensure_active()?;
        self.ensure_contributor(&caller)?;

        {
            let proposal = self.proposals.get(id)?;
            if proposal.canceled {
                return Err(FundError::ProposalCanceled(id));
            }
            if proposal.executed {
                return Err(FundError::AlreadyExecuted(id));
            }
        }

        self.votes.record(id, caller, support)?;

        let threshold = required_votes(
            self.config.approval_percentage,
            self.config.minimum_votes,
            self.members.contributor_count(),
        );

        let proposal = self.proposals.get_mut(id)?;
        let mut events = vec![FundEvent::VoteCast {
            id,
            voter: caller,
            support,
        }];

        if support {
            proposal.votes_for += 1;
            // Irreversible, and announced exactly once
            if !proposal.approved && proposal.votes_for >= threshold {
                proposal.approved = true;
                events.push(FundEvent::ProposalApproved {
                    id,
                    votes_for: proposal.votes_for,
                });
            }
        } else {
            proposal.votes_against += 1;
        }

        Ok(events)
    }

    // --- disbursement (two-phase) ---

    /// Stage execution of an approved proposal: debit the ledger and
    /// mark `executed` before any external transfer happens. Any active
    /// contributor may trigger this. Returns the transfer instruction.
    pub fn begin_disbursement(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> FundResult<(Address, Amount)> {
        self.ensure_active()?;
        self.ensure_contributor(&caller)?;

        let (recipient, amount) = {
            let proposal = self.proposals.get(id)?;
            if proposal.canceled {
                return Err(FundError::ProposalCanceled(id));
            }
            if proposal.executed {
                return Err(FundError::AlreadyExecuted(id));
            }
            if !proposal.approved {
                return Err(FundError::NotApproved(id));
            }
            (proposal.recipient, proposal.amount)
        };

        // Re-checked at execution time, not creation time
        self.ledger.record_disbursement(amount)?;
        self.proposals.get_mut(id)?.executed = true;

        Ok((recipient, amount))
    }

    /// Unwind a staged disbursement whose external transfer failed.
    pub fn abort_disbursement(&mut self, id: ProposalId, amount: Amount) {
        self.ledger.revert_disbursement(amount);
        if let Ok(proposal) = self.proposals.get_mut(id) {
            proposal.executed = false;
        }
    }

    // --- settlement ---

    /// Close the fund. Creator-only, terminal: freezes the balance and
    /// permits nothing but withdrawals afterwards.
    pub fn close(&mut self, caller: Address) -> FundResult<FundEvent> {
        if caller != self.creator {
            return Err(FundError::NotCreator);
        }
        self.ensure_active()?;

        let balance = self.ledger.current_balance();
        self.active = false;
        self.balance_at_closure = Some(balance);

        Ok(FundEvent::FundClosed {
            balance_at_closure: balance,
        })
    }

    /// Stage the caller's one-time proportional withdrawal: mark the
    /// member withdrawn and debit the ledger before the external
    /// transfer. Returns the amount to pay out.
    pub fn begin_withdrawal(&mut self, caller: Address) -> FundResult<Amount> {
        if self.active {
            return Err(FundError::FundStillActive);
        }
        let balance_at_closure = self.balance_at_closure.unwrap_or(0);
        let total = self.ledger.total_contributions();

        let member = self
            .members
            .get(&caller)
            .filter(|m| m.contribution_total > 0)
            .ok_or(FundError::NothingToWithdraw)?;
        if member.has_withdrawn {
            return Err(FundError::AlreadyWithdrawn);
        }

        let share = proportional_share(member.contribution_total, balance_at_closure, total);
        self.ledger.record_withdrawal(share)?;
        if let Some(member) = self.members.get_mut(&caller) {
            member.has_withdrawn = true;
        }

        Ok(share)
    }

    /// Unwind a staged withdrawal whose external transfer failed.
    pub fn abort_withdrawal(&mut self, caller: Address, amount: Amount) {
        self.ledger.revert_withdrawal(amount);
        if let Some(member) = self.members.get_mut(&caller) {
            member.has_withdrawn = false;
        }
    }

    // --- queries ---

    pub fn id(&self) -> FundId {
        self.id
    }

    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn balance(&self) -> Amount {
        self.ledger.current_balance()
    }

    pub fn contributors(&self) -> Vec<Address> {
        self.members.contributors()
    }

    pub fn contributor_count(&self) -> u32 {
        self.members.contributor_count()
    }

    pub fn member(&self, address: &Address) -> Option<&Member> {
        self.members.get(address)
    }

    pub fn proposal(&self, id: ProposalId) -> FundResult<&Proposal> {
        self.proposals.get(id)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.votes.has_voted(id, voter)
    }

    /// `max(0, required_votes − votes_for)` for a proposal, computed
    /// against the current contributor count.
    pub fn votes_needed_for_approval(&self, id: ProposalId) -> FundResult<u32> {
        let proposal = self.proposals.get(id)?;
        let threshold = required_votes(
            self.config.approval_percentage,
            self.config.minimum_votes,
            self.members.contributor_count(),
        );
        Ok(threshold.saturating_sub(proposal.votes_for))
    }

    /// The caller's payout against the balance frozen at closure.
    /// Before closure there is no frozen balance, so the share is 0.
    pub fn proportional_share_of(&self, address: &Address) -> Amount {
        let contribution = self
            .members
            .get(address)
            .map(|m| m.contribution_total)
            .unwrap_or(0);
        proportional_share(
            contribution,
            self.balance_at_closure.unwrap_or(0),
            self.ledger.total_contributions(),
        )
    }

    /// Lifetime contributions toward the target, as a capped
    /// percentage. 0 for unlimited funds (no target).
    pub fn progress_percentage(&self) -> u8 {
        if self.config.target_amount == 0 {
            return 0;
        }
        let pct = u128::from(self.ledger.total_contributions()) * 100
            / u128::from(self.config.target_amount);
        pct.min(100) as u8
    }

    pub fn info(&self) -> FundInfo {
        FundInfo {
            id: self.id,
            name: self.config.name.clone(),
            description: self.config.description.clone(),
            target_amount: self.config.target_amount,
            is_private: self.config.is_private,
            approval_percentage: self.config.approval_percentage,
            minimum_votes: self.config.minimum_votes,
            active: self.active,
            creator: self.creator,
            total_contributions: self.ledger.total_contributions(),
            current_balance: self.ledger.current_balance(),
            contributor_count: self.members.contributor_count(),
            proposal_count: self.proposals.len() as u64,
            balance_at_closure: self.balance_at_closure,
        }
    }

    /// Conservation identity, exposed for tests and reconciliation:
    /// `balance + disbursed + withdrawn == contributed`.
    pub fn conservation_holds(&self) -> bool {
        self.ledger.current_balance() + self.ledger.total_disbursed()
            + self.ledger.total_withdrawn()
            == self.ledger.total_contributions()
    }

    // --- guards ---

    fn ensure_active(&self) -> FundResult<()> {
        if !self.active {
            return Err(FundError::FundClosed);
        }
        Ok(())
    }

    fn ensure_contributor(&self, caller: &Address) -> FundResult<()> {
        if !self.members.is_contributor(caller) {
            return Err(FundError::NotAContributor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn addr(id: u8) -> Address {
        Address::from_bytes(&[id; 32])
    }

    fn config(approval_percentage: u8, minimum_votes: u32) -> FundConfig {
        FundConfig {
            name: "test fund".to_string(),
            approval_percentage,
            minimum_votes,
            ..FundConfig::default()
        }
    }

    /// Public fund, creator addr(1), contributors addr(1..=n) with 10 each.
    fn fund_with_contributors(n: u8, approval_percentage: u8, minimum_votes: u32) -> Fund {
        let mut fund = Fund::new(addr(1), config(approval_percentage, minimum_votes)).unwrap();
        for i in 1..=n {
            fund.deposit(addr(i), 10).unwrap();
        }
        fund
    }

    #[test]
    fn deposits_accumulate_balance_and_contributors() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        fund.deposit(addr(1), 2).unwrap();
        fund.deposit(addr(2), 3).unwrap();

        assert_eq!(fund.balance(), 5);
        assert_eq!(fund.contributor_count(), 2);
        assert!(fund.conservation_holds());
    }

    #[test]
    fn zero_deposit_rejected() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        let err = fund.deposit(addr(1), 0).unwrap_err();
        assert_eq!(err, FundError::AmountNotPositive);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn private_fund_gates_deposits_behind_invitation() {
        let mut cfg = config(60, 1);
        cfg.is_private = true;
        let mut fund = Fund::new(addr(1), cfg).unwrap();

        // Creator deposits without invitation
        fund.deposit(addr(1), 5).unwrap();

        // Stranger cannot
        assert_eq!(fund.deposit(addr(2), 5), Err(FundError::NotInvited));

        // Invited + accepted member can
        fund.invite_by_address(addr(1), addr(2)).unwrap();
        assert_eq!(fund.deposit(addr(2), 5), Err(FundError::NotInvited));
        fund.accept_invitation(addr(2)).unwrap();
        fund.deposit(addr(2), 5).unwrap();
        assert_eq!(fund.balance(), 10);
    }

    #[test]
    fn only_creator_invites_and_no_self_invite() {
        let mut cfg = config(60, 1);
        cfg.is_private = true;
        let mut fund = Fund::new(addr(1), cfg).unwrap();

        assert_eq!(
            fund.invite_by_address(addr(2), addr(3)),
            Err(FundError::NotCreator)
        );
        assert_eq!(
            fund.invite_by_address(addr(1), addr(1)),
            Err(FundError::SelfInvite)
        );
    }

    #[test]
    fn invite_by_nickname_resolves_through_registry() {
        let mut cfg = config(60, 1);
        cfg.is_private = true;
        let mut fund = Fund::new(addr(1), cfg).unwrap();

        fund.set_nickname(addr(2), "bob99").unwrap();
        fund.invite_by_nickname(addr(1), "bob99").unwrap();
        fund.accept_invitation(addr(2)).unwrap();
        fund.deposit(addr(2), 1).unwrap();

        assert_eq!(
            fund.invite_by_nickname(addr(1), "ghost"),
            Err(FundError::NicknameNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn non_contributor_cannot_propose_or_vote() {
        let mut fund = fund_with_contributors(2, 60, 1);

        let err = fund
            .create_proposal(addr(9), addr(8), 1, "x".to_string())
            .unwrap_err();
        assert_eq!(err, FundError::NotAContributor);
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 1, "x".to_string())
            .unwrap();
        assert_eq!(fund.vote(addr(9), id, true), Err(FundError::NotAContributor));
    }

    #[test]
    fn proposal_amount_capped_by_balance() {
        let mut fund = fund_with_contributors(1, 60, 1);
        assert_eq!(
            fund.create_proposal(addr(1), addr(8), 11, "x".to_string()),
            Err(FundError::InsufficientBalance {
                requested: 11,
                available: 10
            })
        );
    }

    #[test]
    fn approval_flips_exactly_on_threshold_vote() {
        // 60%, min 2, 3 contributors → required = 2
        let mut fund = fund_with_contributors(3, 60, 2);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 2, "supplies".to_string())
            .unwrap();

        assert_eq!(fund.votes_needed_for_approval(id).unwrap(), 2);

        let events = fund.vote(addr(1), id, true).unwrap();
        assert_eq!(events.len(), 1); // VoteCast only
        assert!(!fund.proposal(id).unwrap().approved);
        assert_eq!(fund.votes_needed_for_approval(id).unwrap(), 1);

        let events = fund.vote(addr(2), id, true).unwrap();
        assert!(matches!(events[1], FundEvent::ProposalApproved { .. }));
        assert!(fund.proposal(id).unwrap().approved);
        assert_eq!(fund.votes_needed_for_approval(id).unwrap(), 0);

        // A third yes does not re-announce approval
        let events = fund.vote(addr(3), id, true).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn against_votes_never_approve() {
        let mut fund = fund_with_contributors(3, 60, 1);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 2, "x".to_string())
            .unwrap();

        fund.vote(addr(1), id, false).unwrap();
        fund.vote(addr(2), id, false).unwrap();
        fund.vote(addr(3), id, false).unwrap();

        let proposal = fund.proposal(id).unwrap();
        assert!(!proposal.approved);
        assert_eq!(proposal.votes_against, 3);
    }

    #[test]
    fn double_vote_rejected_with_unchanged_tallies() {
        let mut fund = fund_with_contributors(3, 60, 2);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 2, "x".to_string())
            .unwrap();

        fund.vote(addr(1), id, true).unwrap();
        let err = fund.vote(addr(1), id, false).unwrap_err();
        assert_eq!(err, FundError::AlreadyVoted(id));
        assert_eq!(err.kind(), ErrorKind::State);

        let proposal = fund.proposal(id).unwrap();
        assert_eq!(proposal.votes_for, 1);
        assert_eq!(proposal.votes_against, 0);
        assert!(fund.has_voted(id, &addr(1)));
        assert!(!fund.has_voted(id, &addr(2)));
    }

    #[test]
    fn canceled_proposal_rejects_votes_and_execution() {
        let mut fund = fund_with_contributors(2, 60, 1);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 2, "x".to_string())
            .unwrap();
        fund.cancel_proposal(addr(1), id).unwrap();

        assert_eq!(fund.vote(addr(2), id, true), Err(FundError::ProposalCanceled(id)));
        assert_eq!(
            fund.begin_disbursement(addr(2), id),
            Err(FundError::ProposalCanceled(id))
        );
    }

    #[test]
    fn execution_requires_approval_and_is_exactly_once() {
        let mut fund = fund_with_contributors(2, 60, 1);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 7, "x".to_string())
            .unwrap();

        assert_eq!(
            fund.begin_disbursement(addr(1), id),
            Err(FundError::NotApproved(id))
        );

        fund.vote(addr(1), id, true).unwrap();
        fund.vote(addr(2), id, true).unwrap();

        let (recipient, amount) = fund.begin_disbursement(addr(2), id).unwrap();
        assert_eq!((recipient, amount), (addr(8), 7));
        assert_eq!(fund.balance(), 13);
        assert!(fund.proposal(id).unwrap().executed);
        assert!(fund.conservation_holds());

        let err = fund.begin_disbursement(addr(1), id).unwrap_err();
        assert_eq!(err, FundError::AlreadyExecuted(id));
        assert_eq!(fund.balance(), 13);
    }

    #[test]
    fn execution_rechecks_balance_at_call_time() {
        let mut fund = fund_with_contributors(2, 60, 1);
        // Two proposals that each fit the balance alone, but not together
        let (a, _) = fund
            .create_proposal(addr(1), addr(8), 15, "first".to_string())
            .unwrap();
        let (b, _) = fund
            .create_proposal(addr(1), addr(8), 15, "second".to_string())
            .unwrap();
        for id in [a, b] {
            fund.vote(addr(1), id, true).unwrap();
            fund.vote(addr(2), id, true).unwrap();
        }

        fund.begin_disbursement(addr(1), a).unwrap();
        assert_eq!(
            fund.begin_disbursement(addr(1), b),
            Err(FundError::InsufficientBalance {
                requested: 15,
                available: 5
            })
        );
        assert!(!fund.proposal(b).unwrap().executed);
    }

    #[test]
    fn aborted_disbursement_unwinds_cleanly() {
        let mut fund = fund_with_contributors(2, 60, 1);
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 7, "x".to_string())
            .unwrap();
        fund.vote(addr(1), id, true).unwrap();
        fund.vote(addr(2), id, true).unwrap();

        let (_, amount) = fund.begin_disbursement(addr(1), id).unwrap();
        fund.abort_disbursement(id, amount);

        assert_eq!(fund.balance(), 20);
        assert!(!fund.proposal(id).unwrap().executed);
        // And it can be retried
        fund.begin_disbursement(addr(1), id).unwrap();
    }

    #[test]
    fn close_is_creator_only_and_terminal() {
        let mut fund = fund_with_contributors(2, 60, 1);

        let err = fund.close(addr(2)).unwrap_err();
        assert_eq!(err, FundError::NotCreator);
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let event = fund.close(addr(1)).unwrap();
        assert_eq!(event, FundEvent::FundClosed { balance_at_closure: 20 });
        assert!(!fund.is_active());

        // Closed fund refuses every mutation except withdrawal
        assert_eq!(fund.deposit(addr(1), 1), Err(FundError::FundClosed));
        assert_eq!(
            fund.create_proposal(addr(1), addr(8), 1, "x".to_string()),
            Err(FundError::FundClosed)
        );
        assert_eq!(fund.vote(addr(1), 1, true), Err(FundError::FundClosed));
        assert_eq!(fund.begin_disbursement(addr(1), 1), Err(FundError::FundClosed));
        assert_eq!(fund.close(addr(1)), Err(FundError::FundClosed));
    }

    #[test]
    fn withdrawal_only_after_closure_and_once_per_member() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        fund.deposit(addr(1), 4).unwrap();
        fund.deposit(addr(2), 5).unwrap();

        let err = fund.begin_withdrawal(addr(1)).unwrap_err();
        assert_eq!(err, FundError::FundStillActive);
        assert_eq!(err.kind(), ErrorKind::State);

        fund.close(addr(1)).unwrap();

        // balance_at_closure = 9; shares floor(4/9×9)=4, floor(5/9×9)=5
        assert_eq!(fund.begin_withdrawal(addr(1)).unwrap(), 4);
        assert_eq!(fund.begin_withdrawal(addr(2)).unwrap(), 5);

        assert_eq!(fund.begin_withdrawal(addr(1)), Err(FundError::AlreadyWithdrawn));
        assert_eq!(fund.begin_withdrawal(addr(9)), Err(FundError::NothingToWithdraw));
        assert_eq!(fund.balance(), 0);
        assert!(fund.conservation_holds());
    }

    #[test]
    fn withdrawal_shares_leave_dust_behind() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        fund.deposit(addr(1), 4).unwrap();
        fund.deposit(addr(2), 5).unwrap();

        // Disburse 3 so balance_at_closure = 6
        let (id, _) = fund
            .create_proposal(addr(1), addr(8), 3, "x".to_string())
            .unwrap();
        fund.vote(addr(1), id, true).unwrap();
        fund.vote(addr(2), id, true).unwrap();
        fund.begin_disbursement(addr(1), id).unwrap();

        fund.close(addr(1)).unwrap();
        assert_eq!(fund.proportional_share_of(&addr(1)), 2); // floor(4/9×6)
        assert_eq!(fund.proportional_share_of(&addr(2)), 3); // floor(5/9×6)

        let a = fund.begin_withdrawal(addr(1)).unwrap();
        let b = fund.begin_withdrawal(addr(2)).unwrap();
        assert_eq!(a + b, 5);
        assert_eq!(fund.balance(), 1); // dust
        assert!(fund.conservation_holds());
    }

    #[test]
    fn aborted_withdrawal_unwinds_cleanly() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        fund.deposit(addr(1), 9).unwrap();
        fund.close(addr(1)).unwrap();

        let share = fund.begin_withdrawal(addr(1)).unwrap();
        fund.abort_withdrawal(addr(1), share);

        assert_eq!(fund.balance(), 9);
        assert_eq!(fund.begin_withdrawal(addr(1)).unwrap(), 9);
    }

    #[test]
    fn share_query_is_zero_before_closure() {
        let mut fund = Fund::new(addr(1), config(60, 1)).unwrap();
        fund.deposit(addr(1), 9).unwrap();
        assert_eq!(fund.proportional_share_of(&addr(1)), 0);
        fund.close(addr(1)).unwrap();
        assert_eq!(fund.proportional_share_of(&addr(1)), 9);
    }

    #[test]
    fn progress_percentage_tracks_target() {
        let mut cfg = config(60, 1);
        cfg.target_amount = 40;
        let mut fund = Fund::new(addr(1), cfg).unwrap();

        assert_eq!(fund.progress_percentage(), 0);
        fund.deposit(addr(1), 10).unwrap();
        assert_eq!(fund.progress_percentage(), 25);
        fund.deposit(addr(1), 50).unwrap();
        assert_eq!(fund.progress_percentage(), 100); // capped

        let unlimited = Fund::new(addr(1), config(60, 1)).unwrap();
        assert_eq!(unlimited.progress_percentage(), 0);
    }

    #[test]
    fn info_snapshot_reflects_state() {
        let mut fund = fund_with_contributors(2, 60, 2);
        fund.create_proposal(addr(1), addr(8), 5, "x".to_string())
            .unwrap();

        let info = fund.info();
        assert_eq!(info.name, "test fund");
        assert_eq!(info.total_contributions, 20);
        assert_eq!(info.current_balance, 20);
        assert_eq!(info.contributor_count, 2);
        assert_eq!(info.proposal_count, 1);
        assert!(info.active);
        assert_eq!(info.balance_at_closure, None);

        fund.close(addr(1)).unwrap();
        assert_eq!(fund.info().balance_at_closure, Some(20));
    }

    #[test]
    fn invalid_config_rejected_at_creation() {
        let mut cfg = config(0, 1);
        cfg.approval_percentage = 0;
        assert!(matches!(
            Fund::new(addr(1), cfg),
            Err(FundError::InvalidConfig(_))
        ));
    }
}
