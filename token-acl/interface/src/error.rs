//! Error types

use {
    crate::PermissionlessAction,
    num_derive::FromPrimitive,
    solana_program::{decode_error::DecodeError, program_error::ProgramError, pubkey::Pubkey},
    thiserror::Error,
    token_acl_tlv_account_resolution::error::{
        AccountFetchError, AccountResolutionError, ResolveError,
    },
};

/// Errors that may be returned by the interface.
///
/// Note: Error codes range from 31_000 - (31_000 + n)
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum GatingError {
    /// Mint config data is malformed
    #[error("Mint config data is malformed")]
    InvalidMintConfig = 31_000, // Error code offset
    /// Mint config belongs to a different mint
    #[error("Mint config belongs to a different mint")]
    MintMismatch,
    /// Mint has no gating program configured
    #[error("Mint has no gating program configured")]
    NoGatingProgram,
    /// Permissionless instruction is disabled in the mint config
    #[error("Permissionless instruction is disabled for this mint")]
    PermissionlessDisabled,
    /// Gating program has not published extra metas for the action
    #[error("Gating program has not published extra account metas for this action")]
    ExtraMetasNotPublished,
    /// Base instruction lacks the fixed accounts of the gating interface
    #[error("Base instruction is missing required accounts")]
    MissingBaseAccounts,
    /// Incorrect account provided
    #[error("Incorrect account provided")]
    IncorrectAccount,
    /// Instruction data is malformed
    #[error("Instruction data is malformed")]
    InvalidInstruction,
}
impl From<GatingError> for ProgramError {
    fn from(e: GatingError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
impl<T> DecodeError<T> for GatingError {
    fn type_of() -> &'static str {
        "GatingError"
    }
}

/// Failure of an offchain lookup or resolution
#[derive(Debug, Error)]
pub enum OffchainError {
    /// The account-data source returned an error; safe to retry
    #[error("Failed to fetch account data: {0}")]
    Fetch(AccountFetchError),
    /// Gating configuration or published data is missing or unusable
    #[error("{source} (action {action}, mint {mint})")]
    Gating {
        /// Underlying failure
        source: GatingError,
        /// Action being resolved
        action: PermissionlessAction,
        /// Mint being resolved
        mint: Pubkey,
    },
    /// Published extra metas could not be decoded or resolved
    #[error(transparent)]
    Resolution(#[from] AccountResolutionError),
    /// Mint config could not be decoded
    #[error("{0}")]
    Config(GatingError),
}
impl From<ResolveError> for OffchainError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Fetch(e) => Self::Fetch(e),
            ResolveError::Resolution(e) => Self::Resolution(e),
        }
    }
}
impl OffchainError {
    /// Whether the failure came from the data source rather than the data
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
