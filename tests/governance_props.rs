//! Property tests for the financial invariants.
//!
//! Conservation of value, approval monotonicity, and payout fairness
//! must hold for arbitrary deposit patterns, not just the handpicked
//! scenarios in the lifecycle tests.

use commonpool::fund::Fund;
use commonpool::settlement::proportional_share;
use commonpool::{Address, FundConfig};
use proptest::prelude::*;

fn addr(id: u8) -> Address {
    Address::from_bytes(&[id; 32])
}

fn config(approval_percentage: u8, minimum_votes: u32) -> FundConfig {
    FundConfig {
        name: "prop fund".to_string(),
        approval_percentage,
        minimum_votes,
        ..FundConfig::default()
    }
}

/// Deposits as (member 1-8, amount 1-1000) pairs.
fn deposits() -> impl Strategy<Value = Vec<(u8, u64)>> {
    prop::collection::vec((1u8..=8, 1u64..=1000), 1..40)
}

proptest! {
    #[test]
    fn conservation_through_deposits_and_disbursement(
        deposits in deposits(),
        spend_fraction in 0u64..=100,
    ) {
        let mut fund = Fund::new(addr(1), config(50, 1)).unwrap();

        for (member, amount) in &deposits {
            fund.deposit(addr(*member), *amount).unwrap();
            prop_assert!(fund.conservation_holds());
        }

        let amount = fund.balance() * spend_fraction / 100;
        if amount > 0 {
            let proposer = addr(deposits[0].0);
            let (id, _) = fund
                .create_proposal(proposer, addr(99), amount, "spend".to_string())
                .unwrap();
            // Everyone approves so the threshold is met regardless of
            // contributor count
            for member in fund.contributors() {
                let _ = fund.vote(member, id, true);
            }
            fund.begin_disbursement(proposer, id).unwrap();
        }

        prop_assert!(fund.conservation_holds());
        prop_assert_eq!(
            fund.balance(),
            deposits.iter().map(|(_, a)| a).sum::<u64>() - amount
        );
    }

    #[test]
    fn approval_is_monotone(extra_votes in 0usize..5) {
        // 5 contributors at 60% → threshold 3
        let mut fund = Fund::new(addr(1), config(60, 2)).unwrap();
        for i in 1..=5u8 {
            fund.deposit(addr(i), 10).unwrap();
        }

        let (id, _) = fund
            .create_proposal(addr(1), addr(99), 5, "spend".to_string())
            .unwrap();

        // Drive to approval
        let mut voters = fund.contributors().into_iter();
        while !fund.proposal(id).unwrap().approved {
            let voter = voters.next().unwrap();
            fund.vote(voter, id, true).unwrap();
        }
        prop_assert!(fund.proposal(id).unwrap().approved);

        // Any further voting never reverts it
        for voter in voters.take(extra_votes) {
            fund.vote(voter, id, false).unwrap();
            prop_assert!(fund.proposal(id).unwrap().approved);
        }
    }

    #[test]
    fn payout_sum_never_exceeds_frozen_balance(
        contributions in prop::collection::vec(1u64..=10_000, 1..12),
        balance_fraction in 0u64..=100,
    ) {
        let total: u64 = contributions.iter().sum();
        let balance_at_closure = total * balance_fraction / 100;

        let payouts: u64 = contributions
            .iter()
            .map(|c| proportional_share(*c, balance_at_closure, total))
            .sum();

        prop_assert!(payouts <= balance_at_closure);
        // Dust is bounded by the number of members
        prop_assert!(balance_at_closure - payouts < contributions.len() as u64);
    }

    #[test]
    fn every_member_withdraws_at_most_once(
        contributions in prop::collection::vec(1u64..=1000, 2..8),
    ) {
        let mut fund = Fund::new(addr(1), config(50, 1)).unwrap();
        for (i, amount) in contributions.iter().enumerate() {
            fund.deposit(addr(i as u8 + 1), *amount).unwrap();
        }
        fund.close(addr(1)).unwrap();

        for i in 0..contributions.len() {
            let member = addr(i as u8 + 1);
            fund.begin_withdrawal(member).unwrap();
            prop_assert!(fund.begin_withdrawal(member).is_err());
            prop_assert!(fund.conservation_holds());
        }
    }
}
