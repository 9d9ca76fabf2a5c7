//! Error taxonomy for fund operations.
//!
//! Every failure is synchronous and atomic: the failing call leaves fund
//! state untouched and returns a specific reason. `ErrorKind` buckets the
//! variants into the four categories callers branch on.

use crate::types::{Amount, ProposalId};

/// Result type for fund operations.
pub type FundResult<T> = Result<T, FundError>;

/// Fund operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FundError {
    // --- validation ---
    #[error("amount must be positive")]
    AmountNotPositive,

    #[error("amount overflows the ledger")]
    AmountOverflow,

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("proposal description must not be empty")]
    EmptyDescription,

    #[error("recipient must not be the null address")]
    NullRecipient,

    #[error("nickname must be 3-32 alphanumeric characters: {0:?}")]
    MalformedNickname(String),

    #[error("nickname already taken: {0}")]
    NicknameTaken(String),

    #[error("invalid fund config: {0}")]
    InvalidConfig(String),

    // --- authorization ---
    #[error("caller is not an active contributor")]
    NotAContributor,

    #[error("only the fund creator may perform this operation")]
    NotCreator,

    #[error("the creator cannot invite themselves")]
    SelfInvite,

    #[error("only the original proposer may cancel proposal {0}")]
    NotProposer(ProposalId),

    #[error("membership in a private fund requires an accepted invitation")]
    NotInvited,

    // --- state ---
    #[error("caller has already voted on proposal {0}")]
    AlreadyVoted(ProposalId),

    #[error("proposal {0} has been canceled")]
    ProposalCanceled(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} is not approved")]
    NotApproved(ProposalId),

    #[error("fund is closed")]
    FundClosed,

    #[error("fund is still active")]
    FundStillActive,

    #[error("caller has already withdrawn their share")]
    AlreadyWithdrawn,

    #[error("caller has no contribution to withdraw")]
    NothingToWithdraw,

    #[error("target is already an active member")]
    AlreadyMember,

    #[error("an invitation for this address is already pending")]
    InvitationPending,

    #[error("caller has no pending invitation")]
    NoPendingInvitation,

    // --- not found ---
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("nickname not registered: {0}")]
    NicknameNotFound(String),

    // --- settlement boundary ---
    #[error("value transfer failed: {0}")]
    TransferFailed(String),
}

/// Error category, per the fund error-handling taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    NotFound,
    /// Failure at the external value-transfer boundary. The staged state
    /// write has been rolled back by the time the caller sees this.
    Transfer,
}

impl FundError {
    /// Bucket this error into its taxonomy category.
    pub fn kind(&self) -> ErrorKind {
        use FundError::*;
        match self {
            AmountNotPositive
            | AmountOverflow
            | InsufficientBalance { .. }
            | EmptyDescription
            | NullRecipient
            | MalformedNickname(_)
            | NicknameTaken(_)
            | InvalidConfig(_) => ErrorKind::Validation,

            NotAContributor | NotCreator | SelfInvite | NotProposer(_) | NotInvited => {
                ErrorKind::Authorization
            }

            AlreadyVoted(_)
            | ProposalCanceled(_)
            | AlreadyExecuted(_)
            | NotApproved(_)
            | FundClosed
            | FundStillActive
            | AlreadyWithdrawn
            | NothingToWithdraw
            | AlreadyMember
            | InvitationPending
            | NoPendingInvitation => ErrorKind::State,

            ProposalNotFound(_) | NicknameNotFound(_) => ErrorKind::NotFound,

            TransferFailed(_) => ErrorKind::Transfer,
        }
    }
}
