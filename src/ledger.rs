//! Aggregate value accounting.
//!
//! The fund balance is never stored directly; it is derived from three
//! monotone totals so conservation can be checked at any observable
//! point:
//!
//! `current_balance = contributed − disbursed − withdrawn`
//!
//! Before closure `withdrawn` is always 0, which reduces to the classic
//! form `balance = total_contributions − Σ(executed amounts)`.

use crate::error::{FundError, FundResult};
use crate::types::Amount;

/// Aggregate deposit/disbursement/withdrawal totals for one fund.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionLedger {
    contributed: Amount,
    disbursed: Amount,
    withdrawn: Amount,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an incoming deposit.
    pub fn record_deposit(&mut self, amount: Amount) -> FundResult<()> {
        self.contributed = self
            .contributed
            .checked_add(amount)
            .ok_or(FundError::AmountOverflow)?;
        Ok(())
    }

    /// Debit an executed disbursement. Fails if the balance cannot
    /// cover it; the check and the debit are one step.
    pub fn record_disbursement(&mut self, amount: Amount) -> FundResult<()> {
        let available = self.current_balance();
        if amount > available {
            return Err(FundError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.disbursed += amount;
        Ok(())
    }

    /// Unwind a disbursement whose external transfer failed.
    pub fn revert_disbursement(&mut self, amount: Amount) {
        debug_assert!(self.disbursed >= amount);
        self.disbursed -= amount;
    }

    /// Debit a settlement withdrawal.
    pub fn record_withdrawal(&mut self, amount: Amount) -> FundResult<()> {
        let available = self.current_balance();
        if amount > available {
            return Err(FundError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.withdrawn += amount;
        Ok(())
    }

    /// Unwind a withdrawal whose external transfer failed.
    pub fn revert_withdrawal(&mut self, amount: Amount) {
        debug_assert!(self.withdrawn >= amount);
        self.withdrawn -= amount;
    }

    /// Derived balance. Cannot underflow: every debit path checks
    /// against this value first.
    pub fn current_balance(&self) -> Amount {
        self.contributed - self.disbursed - self.withdrawn
    }

    pub fn total_contributions(&self) -> Amount {
        self.contributed
    }

    pub fn total_disbursed(&self) -> Amount {
        self.disbursed
    }

    pub fn total_withdrawn(&self) -> Amount {
        self.withdrawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_derived_from_totals() {
        let mut ledger = ContributionLedger::new();
        ledger.record_deposit(10).unwrap();
        ledger.record_deposit(5).unwrap();
        ledger.record_disbursement(4).unwrap();

        assert_eq!(ledger.current_balance(), 11);
        assert_eq!(ledger.total_contributions(), 15);
        assert_eq!(ledger.total_disbursed(), 4);
    }

    #[test]
    fn conservation_holds_after_each_operation() {
        let mut ledger = ContributionLedger::new();
        for amount in [3u64, 8, 2] {
            ledger.record_deposit(amount).unwrap();
            assert_eq!(
                ledger.current_balance() + ledger.total_disbursed() + ledger.total_withdrawn(),
                ledger.total_contributions()
            );
        }
        ledger.record_disbursement(7).unwrap();
        ledger.record_withdrawal(2).unwrap();
        assert_eq!(
            ledger.current_balance() + ledger.total_disbursed() + ledger.total_withdrawn(),
            ledger.total_contributions()
        );
    }

    #[test]
    fn overdraw_rejected_with_unchanged_state() {
        let mut ledger = ContributionLedger::new();
        ledger.record_deposit(5).unwrap();

        let before = ledger;
        assert_eq!(
            ledger.record_disbursement(6),
            Err(FundError::InsufficientBalance {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn revert_restores_balance() {
        let mut ledger = ContributionLedger::new();
        ledger.record_deposit(9).unwrap();
        ledger.record_disbursement(4).unwrap();
        ledger.revert_disbursement(4);
        assert_eq!(ledger.current_balance(), 9);

        ledger.record_withdrawal(3).unwrap();
        ledger.revert_withdrawal(3);
        assert_eq!(ledger.current_balance(), 9);
    }

    #[test]
    fn deposit_overflow_rejected() {
        let mut ledger = ContributionLedger::new();
        ledger.record_deposit(u64::MAX).unwrap();
        assert_eq!(ledger.record_deposit(1), Err(FundError::AmountOverflow));
        assert_eq!(ledger.total_contributions(), u64::MAX);
    }
}
