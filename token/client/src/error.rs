//! Error types

use {
    crate::{client::ProgramClientError, extension::ExtensionKind},
    allow_block_list_interface::error::AccessListError,
    solana_sdk::{program_error::ProgramError, pubkey::Pubkey},
    std::fmt::Write,
    thiserror::Error,
    token_acl_interface::{
        error::{GatingError, OffchainError},
        token_acl_tlv_account_resolution::error::AccountResolutionError,
        PermissionlessAction,
    },
};

/// Caller-supplied data violates a local invariant
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Decimals outside `0..=9`
    #[error("decimals {0} exceeds the maximum of 9")]
    InvalidDecimals(u8),
    /// Two specs of the same kind
    #[error("extension {0} is configured more than once")]
    DuplicateExtension(ExtensionKind),
    /// Bounded field over its maximum length
    #[error("{kind} field `{field}` is {len} bytes, the maximum is {max}")]
    FieldTooLong {
        /// Offending extension
        kind: ExtensionKind,
        /// Offending field
        field: &'static str,
        /// Supplied length
        len: usize,
        /// Maximum length
        max: usize,
    },
    /// Field value out of range or otherwise unusable
    #[error("{kind} field `{field}` {reason}")]
    InvalidField {
        /// Offending extension
        kind: ExtensionKind,
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}
impl ValidationError {
    /// Extension the error is about, if any
    pub fn extension(&self) -> Option<ExtensionKind> {
        match self {
            Self::InvalidDecimals(_) => None,
            Self::DuplicateExtension(kind)
            | Self::FieldTooLong { kind, .. }
            | Self::InvalidField { kind, .. } => Some(*kind),
        }
    }
}

/// On-ledger data is missing, cannot be decoded, or cannot be encoded
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Gating configuration or published extra metas unusable for an action
    #[error("{source} (action {action}, mint {mint})")]
    Gating {
        /// Underlying failure
        source: GatingError,
        /// Action being resolved
        action: PermissionlessAction,
        /// Mint being resolved
        mint: Pubkey,
    },
    /// Mint config could not be decoded
    #[error("mint config: {0}")]
    MintConfig(GatingError),
    /// Published extra metas could not be decoded or resolved
    #[error("extra account metas: {0}")]
    Resolution(#[from] AccountResolutionError),
    /// Access list account or extra metas unusable
    #[error("access list: {0}")]
    AccessList(#[from] AccessListError),
    /// Account owned by an unexpected program
    #[error("account {0} has an unexpected owner")]
    AccountInvalidOwner(Pubkey),
    /// Instruction or transaction could not be encoded
    #[error("encoding: {0}")]
    Encoding(String),
}
impl From<ProgramError> for ProtocolError {
    fn from(e: ProgramError) -> Self {
        Self::Encoding(e.to_string())
    }
}

/// Broad family of a `TokenError`, for deciding whether to retry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fix the input
    Validation,
    /// Retry the whole call
    Transient,
    /// Reconfigure or redeploy on-ledger programs
    Protocol,
    /// Split the work across transactions
    Capacity,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("client error: {0}")]
    Client(ProgramClientError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error(
        "transaction is {size} bytes, over the {limit} byte limit; {}",
        describe_contributions(.contributions)
    )]
    TransactionTooLarge {
        size: usize,
        limit: usize,
        /// Bytes added by each extension, largest first
        contributions: Vec<(ExtensionKind, usize)>,
    },
}
impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Client(_) => ErrorKind::Transient,
            Self::Protocol(_) => ErrorKind::Protocol,
            Self::TransactionTooLarge { .. } => ErrorKind::Capacity,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
impl From<OffchainError> for TokenError {
    fn from(e: OffchainError) -> Self {
        match e {
            OffchainError::Fetch(e) => Self::Client(e),
            OffchainError::Gating {
                source,
                action,
                mint,
            } => ProtocolError::Gating {
                source,
                action,
                mint,
            }
            .into(),
            OffchainError::Resolution(e) => ProtocolError::Resolution(e).into(),
            OffchainError::Config(e) => ProtocolError::MintConfig(e).into(),
        }
    }
}
impl From<AccessListError> for TokenError {
    fn from(e: AccessListError) -> Self {
        ProtocolError::AccessList(e).into()
    }
}

fn describe_contributions(contributions: &[(ExtensionKind, usize)]) -> String {
    if contributions.is_empty() {
        return "no extensions to remove".to_string();
    }
    let mut out = "largest contributors:".to_string();
    for (kind, bytes) in contributions {
        let _ = write!(out, " {kind} ({bytes} bytes)");
    }
    out
}

pub type TokenResult<T> = Result<T, TokenError>;
