//! Addresses read out of instruction data or out of a resolved account's
//! data, for gating programs that store a key rather than derive one.

use crate::error::AccountResolutionError;

const INSTRUCTION_DATA_TAG: u8 = 1;
const ACCOUNT_DATA_TAG: u8 = 2;

/// Where a 32-byte address is read from.
///
/// Packed into the address config as a tag byte followed by its indices,
/// zero-padded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PubkeyData {
    /// `instruction_data[index..index + 32]`
    InstructionData {
        /// Offset of the address in the instruction data
        index: u8,
    },
    /// `data(accounts[account_index])[data_index..data_index + 32]`
    AccountData {
        /// Position of the account in the resolved pool
        account_index: u8,
        /// Offset of the address in the account's data
        data_index: u8,
    },
}
impl PubkeyData {
    /// Packed length, without padding
    pub fn tlv_size(&self) -> usize {
        match self {
            Self::InstructionData { .. } => 2,
            Self::AccountData { .. } => 3,
        }
    }

    /// Zero-padded address config
    pub fn address_config(&self) -> [u8; 32] {
        let mut config = [0u8; 32];
        match *self {
            Self::InstructionData { index } => {
                config[..2].copy_from_slice(&[INSTRUCTION_DATA_TAG, index]);
            }
            Self::AccountData {
                account_index,
                data_index,
            } => {
                config[..3].copy_from_slice(&[ACCOUNT_DATA_TAG, account_index, data_index]);
            }
        }
        config
    }

    /// Decode an address config
    pub fn unpack(config: &[u8]) -> Result<Self, AccountResolutionError> {
        match *config {
            [INSTRUCTION_DATA_TAG, index, ..] => Ok(Self::InstructionData { index }),
            [ACCOUNT_DATA_TAG, account_index, data_index, ..] => Ok(Self::AccountData {
                account_index,
                data_index,
            }),
            _ => Err(AccountResolutionError::InvalidPubkeyDataConfig),
        }
    }

    /// Resolved account this reads from, which must precede the entry
    pub fn account_index(&self) -> Option<u8> {
        match *self {
            Self::AccountData { account_index, .. } => Some(account_index),
            Self::InstructionData { .. } => None,
        }
    }
}
