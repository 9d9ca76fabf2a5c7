//! Commonpool - Group Treasury & Spending Governance
//!
//! Members pool value into a fund, propose disbursements, vote under a
//! quorum rule, execute approved transfers, and wind the fund down with
//! a one-time proportional withdrawal per member.
//!
//! Key principles:
//! - Conservation of value at every observable point
//! - Exactly-once execution and withdrawal, no double voting
//! - Explicit per-fund aggregate, no ambient state
//! - Serialized, all-or-nothing mutations (one mutex per fund)

pub mod config;
pub mod error;
pub mod events;
pub mod fund;
pub mod identity;
pub mod ledger;
pub mod membership;
pub mod proposal;
pub mod service;
pub mod settlement;
pub mod types;
pub mod voting;

pub use config::FundConfig;
pub use error::{ErrorKind, FundError, FundResult};
pub use events::FundEvent;
pub use fund::{Fund, FundInfo};
pub use service::FundService;
pub use types::{Address, Amount, FundId, ProposalId};
