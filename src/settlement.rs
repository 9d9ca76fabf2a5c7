//! Proportional settlement math.
//!
//! When a fund closes, each member's payout is their lifetime
//! contribution share applied to the balance frozen at closure, rounded
//! down. Floor division leaves an unrecoverable dust remainder in the
//! fund; that is accepted, not a bug.

use crate::types::Amount;

/// `floor(contribution × balance_at_closure / total_contributions)`.
///
/// Widened to u128 so the product cannot overflow. Returns 0 when the
/// fund never received contributions.
pub fn proportional_share(
    contribution: Amount,
    balance_at_closure: Amount,
    total_contributions: Amount,
) -> Amount {
    if total_contributions == 0 {
        return 0;
    }
    let share =
        u128::from(contribution) * u128::from(balance_at_closure) / u128::from(total_contributions);
    // contribution ≤ total, so share ≤ balance_at_closure ≤ u64::MAX
    share as Amount
}
