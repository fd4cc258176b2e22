//! Error types

use {
    num_derive::FromPrimitive,
    solana_program::{decode_error::DecodeError, program_error::ProgramError},
    thiserror::Error,
};

/// Errors that may be returned by the interface.
///
/// Note: Error codes range from 32_000 - (32_000 + n)
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum AccessListError {
    /// Unknown list mode
    #[error("Unknown list mode")]
    InvalidMode = 32_000, // Error code offset
    /// List config data is malformed
    #[error("List config data is malformed")]
    InvalidListConfig,
    /// Wallet entry data is malformed
    #[error("Wallet entry data is malformed")]
    InvalidWalletEntry,
    /// Instruction data is malformed
    #[error("Instruction data is malformed")]
    InvalidInstruction,
    /// Too many lists to reference from one extra metas account
    #[error("Too many lists for one extra metas account")]
    TooManyLists,
    /// Extra account metas could not be encoded
    #[error("Extra account metas could not be encoded")]
    InvalidExtraMetas,
}
impl From<AccessListError> for ProgramError {
    fn from(e: AccessListError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
impl<T> DecodeError<T> for AccessListError {
    fn type_of() -> &'static str {
        "AccessListError"
    }
}
