//! Async fund service.
//!
//! Wraps the synchronous `Fund` aggregate for use as a standalone
//! concurrent service while preserving the serialized, all-or-nothing
//! call model: one `tokio::sync::Mutex` per fund serializes every
//! state-mutating call, and the guard is held across the external
//! transfer await. Balance, contribution totals, `executed`, and
//! `has_withdrawn` are only ever touched under that lock, which makes
//! deposit / execute / withdraw linearizable and closes the reentrancy
//! window between approval and settlement.
//!
//! Events are published after the state commit. Delivery is
//! fire-and-forget: a sink failure is logged and dropped.

pub mod mock;
pub mod traits;

use crate::config::FundConfig;
use crate::error::{FundError, FundResult};
use crate::events::FundEvent;
use crate::fund::{Fund, FundInfo};
use crate::proposal::Proposal;
use crate::types::{Address, Amount, FundId, ProposalId};
use tokio::sync::Mutex;
use tracing::{info, warn};
use traits::{EventSink, SettlementBank};

/// One fund behind a mutex, wired to its external collaborators.
pub struct FundService<B: SettlementBank, E: EventSink> {
    fund: Mutex<Fund>,
    bank: B,
    events: E,
}

impl<B: SettlementBank, E: EventSink> FundService<B, E> {
    /// Create a fund and wrap it as a service.
    pub fn create(
        creator: Address,
        config: FundConfig,
        bank: B,
        events: E,
    ) -> FundResult<Self> {
        let fund = Fund::new(creator, config)?;
        info!(fund = %fund.id(), %creator, "fund created");
        Ok(Self {
            fund: Mutex::new(fund),
            bank,
            events,
        })
    }

    // --- identity & membership ---

    pub async fn set_nickname(&self, caller: Address, name: &str) -> FundResult<()> {
        self.fund.lock().await.set_nickname(caller, name)
    }

    pub async fn invite_by_address(&self, caller: Address, target: Address) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        fund.invite_by_address(caller, target)?;
        info!(fund = %fund.id(), %target, "invitation issued");
        Ok(())
    }

    pub async fn invite_by_nickname(&self, caller: Address, nickname: &str) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        fund.invite_by_nickname(caller, nickname)?;
        info!(fund = %fund.id(), nickname, "invitation issued");
        Ok(())
    }

    pub async fn accept_invitation(&self, caller: Address) -> FundResult<()> {
        self.fund.lock().await.accept_invitation(caller)
    }

    // --- contributions ---

    pub async fn deposit(&self, caller: Address, amount: Amount) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        let event = fund.deposit(caller, amount)?;
        info!(fund = %fund.id(), %caller, amount, "contribution received");
        let id = fund.id();
        drop(fund);
        self.dispatch(id, &[event]).await;
        Ok(())
    }

    // --- proposals & voting ---

    pub async fn create_proposal(
        &self,
        caller: Address,
        recipient: Address,
        amount: Amount,
        description: String,
    ) -> FundResult<ProposalId> {
        let mut fund = self.fund.lock().await;
        let (id, event) = fund.create_proposal(caller, recipient, amount, description)?;
        info!(fund = %fund.id(), proposal = id, amount, "proposal created");
        let fund_id = fund.id();
        drop(fund);
        self.dispatch(fund_id, &[event]).await;
        Ok(id)
    }

    pub async fn cancel_proposal(&self, caller: Address, id: ProposalId) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        fund.cancel_proposal(caller, id)?;
        info!(fund = %fund.id(), proposal = id, "proposal canceled");
        Ok(())
    }

    pub async fn vote(&self, caller: Address, id: ProposalId, support: bool) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        let events = fund.vote(caller, id, support)?;
        if events.len() > 1 {
            info!(fund = %fund.id(), proposal = id, "proposal approved");
        }
        let fund_id = fund.id();
        drop(fund);
        self.dispatch(fund_id, &events).await;
        Ok(())
    }

    // --- disbursement ---

    /// Execute an approved proposal: commit the `executed` flag and the
    /// ledger debit, then perform the external transfer, all under the
    /// fund lock. A transfer failure unwinds the staged write and
    /// surfaces as `TransferFailed`.
    pub async fn execute_proposal(&self, caller: Address, id: ProposalId) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        let (recipient, amount) = fund.begin_disbursement(caller, id)?;

        if let Err(e) = self.bank.transfer(&recipient, amount).await {
            fund.abort_disbursement(id, amount);
            warn!(fund = %fund.id(), proposal = id, error = %e, "disbursement rolled back");
            return Err(FundError::TransferFailed(e.to_string()));
        }

        info!(fund = %fund.id(), proposal = id, %recipient, amount, "proposal executed");
        let fund_id = fund.id();
        drop(fund);
        self.dispatch(
            fund_id,
            &[FundEvent::ProposalExecuted {
                id,
                recipient,
                amount,
            }],
        )
        .await;
        Ok(())
    }

    // --- settlement ---

    pub async fn close_fund(&self, caller: Address) -> FundResult<()> {
        let mut fund = self.fund.lock().await;
        let event = fund.close(caller)?;
        info!(fund = %fund.id(), "fund closed");
        let id = fund.id();
        drop(fund);
        self.dispatch(id, &[event]).await;
        Ok(())
    }

    /// Withdraw the caller's one-time proportional share. Returns the
    /// amount paid out. Same state-first/transfer-second discipline as
    /// `execute_proposal`.
    pub async fn withdraw_proportional(&self, caller: Address) -> FundResult<Amount> {
        let mut fund = self.fund.lock().await;
        let share = fund.begin_withdrawal(caller)?;

        if let Err(e) = self.bank.transfer(&caller, share).await {
            fund.abort_withdrawal(caller, share);
            warn!(fund = %fund.id(), %caller, error = %e, "withdrawal rolled back");
            return Err(FundError::TransferFailed(e.to_string()));
        }

        info!(fund = %fund.id(), %caller, amount = share, "share withdrawn");
        Ok(share)
    }

    // --- queries ---

    pub async fn balance(&self) -> Amount {
        self.fund.lock().await.balance()
    }

    pub async fn contributors(&self) -> Vec<Address> {
        self.fund.lock().await.contributors()
    }

    pub async fn contributor_count(&self) -> u32 {
        self.fund.lock().await.contributor_count()
    }

    pub async fn proposal(&self, id: ProposalId) -> FundResult<Proposal> {
        self.fund.lock().await.proposal(id).cloned()
    }

    pub async fn has_voted(&self, id: ProposalId, voter: Address) -> bool {
        self.fund.lock().await.has_voted(id, &voter)
    }

    pub async fn votes_needed_for_approval(&self, id: ProposalId) -> FundResult<u32> {
        self.fund.lock().await.votes_needed_for_approval(id)
    }

    pub async fn proportional_share_of(&self, address: Address) -> Amount {
        self.fund.lock().await.proportional_share_of(&address)
    }

    pub async fn fund_info(&self) -> FundInfo {
        self.fund.lock().await.info()
    }

    pub async fn progress_percentage(&self) -> u8 {
        self.fund.lock().await.progress_percentage()
    }

    // --- internals ---

    async fn dispatch(&self, fund: FundId, events: &[FundEvent]) {
        for event in events {
            if let Err(e) = self.events.publish(fund, event).await {
                warn!(%fund, error = %e, "event delivery dropped");
            }
        }
    }
}
