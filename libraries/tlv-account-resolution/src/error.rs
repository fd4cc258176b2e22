//! Error types

use {
    solana_program::{program_error::ProgramError, pubkey::Pubkey},
    spl_pod::error::PodSliceError,
    spl_type_length_value::error::TlvError,
    thiserror::Error,
};

/// Boxed error returned by the account-data source
pub type AccountFetchError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while decoding or resolving a published extra account meta
/// list. All of them mean the published data cannot be used as-is, so none are
/// worth retrying.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AccountResolutionError {
    /// TLV data is malformed
    #[error("TLV data is malformed")]
    InvalidTlv,
    /// No TLV entry for the requested instruction
    #[error("No extra account metas found for the requested instruction")]
    TlvTypeNotFound,
    /// TLV entry already written for the requested instruction
    #[error("Extra account metas already initialized for this instruction")]
    TlvInitialized,
    /// Provided byte buffer too small for the extra account metas
    #[error("Provided byte buffer too small for extra account metas")]
    BufferTooSmall,
    /// Unknown extra account meta discriminator
    #[error("Unknown extra account meta type {0}")]
    InvalidAccountType(u8),
    /// Seed configuration bytes are malformed
    #[error("Seed configuration is malformed")]
    InvalidSeedConfig,
    /// Seed configurations do not fit the 32-byte address config
    #[error("Seed configurations do not fit in 32 bytes")]
    SeedConfigsTooLarge,
    /// Pubkey data configuration bytes are malformed
    #[error("Pubkey data configuration is malformed")]
    InvalidPubkeyDataConfig,
    /// An entry references an account that is not resolved yet
    #[error("Extra account meta {entry} references account {index} before it is resolved")]
    ForwardReference {
        /// Position of the offending entry in the list
        entry: usize,
        /// Account index it references
        index: u8,
    },
    /// Instruction data too short for a seed or pubkey configuration
    #[error("Instruction data too small for seed or pubkey configuration")]
    InstructionDataTooSmall,
    /// Account data too short for a seed or pubkey configuration
    #[error("Account data too small for seed or pubkey configuration")]
    AccountDataTooSmall,
    /// Referenced account holds no data
    #[error("Account data not found for {0}")]
    AccountDataNotFound(Pubkey),
    /// Seeds do not produce a program address
    #[error("Seeds do not derive a valid program address")]
    InvalidSeeds,
    /// External program index collides with the discriminator top bit
    #[error("Program index {0} is out of range for an external PDA")]
    InvalidProgramIndex(u8),
}

impl From<ProgramError> for AccountResolutionError {
    fn from(error: ProgramError) -> Self {
        if error == ProgramError::from(TlvError::TypeNotFound) {
            Self::TlvTypeNotFound
        } else if error == ProgramError::from(TlvError::TypeAlreadyExists) {
            Self::TlvInitialized
        } else if error == ProgramError::from(PodSliceError::BufferTooSmall) {
            Self::BufferTooSmall
        } else {
            Self::InvalidTlv
        }
    }
}

/// Failure of a resolution pass: either the data source failed, or the
/// published data could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The account-data source returned an error
    #[error("Failed to fetch account data: {0}")]
    Fetch(AccountFetchError),
    /// The published data could not be decoded or resolved
    #[error(transparent)]
    Resolution(#[from] AccountResolutionError),
}
