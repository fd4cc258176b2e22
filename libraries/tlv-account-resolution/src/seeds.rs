//! Types for managing seed configurations in TLV Account Resolution
//!
//! A seed list is packed into the 32-byte `address_config` of an
//! `ExtraAccountMeta`. The largest fixed-size configuration is
//! `AccountData` at 4 bytes; a literal takes two bytes plus its contents.
//! The first zero byte ends the list.

use crate::error::AccountResolutionError;

const ADDRESS_CONFIG_LEN: usize = 32;

/// Enum to describe a required seed for a Program-Derived Address
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    /// A literal hard-coded argument
    Literal {
        /// The literal value represented as a vector of bytes.
        bytes: Vec<u8>,
    },
    /// A slice of the instruction data
    InstructionData {
        /// The index where the bytes of an instruction argument begin
        index: u8,
        /// The length of the instruction argument (number of bytes)
        length: u8,
    },
    /// The public key of an account from the entire accounts list, which
    /// includes the extra accounts resolved so far
    AccountKey {
        /// The index of the account in the entire accounts list
        index: u8,
    },
    /// A slice of the data of an account from the entire accounts list
    AccountData {
        /// The index of the account in the entire accounts list
        account_index: u8,
        /// The index where the bytes begin in the account data
        data_index: u8,
        /// The length of the argument (number of bytes)
        length: u8,
    },
}
impl Seed {
    /// Get the packed size of a seed configuration
    pub fn tlv_size(&self) -> usize {
        match &self {
            // 1 byte for the discriminator, 1 byte for the length, then the raw bytes
            Self::Literal { bytes } => 1 + 1 + bytes.len(),
            // 1 byte for the discriminator, 1 byte for the index, 1 byte for the length
            Self::InstructionData { .. } => 1 + 1 + 1,
            // 1 byte for the discriminator, 1 byte for the index
            Self::AccountKey { .. } => 1 + 1,
            // 1 byte for the discriminator, 1 byte for the account index,
            // 1 byte for the data index, 1 byte for the length
            Self::AccountData { .. } => 1 + 1 + 1 + 1,
        }
    }

    /// Packs a seed configuration into a slice of exactly `tlv_size` bytes
    pub fn pack(&self, dst: &mut [u8]) -> Result<(), AccountResolutionError> {
        if dst.len() != self.tlv_size() {
            return Err(AccountResolutionError::InvalidSeedConfig);
        }
        match &self {
            Self::Literal { bytes } => {
                dst[0] = 1;
                dst[1] = u8::try_from(bytes.len())
                    .map_err(|_| AccountResolutionError::SeedConfigsTooLarge)?;
                dst[2..].copy_from_slice(bytes);
            }
            Self::InstructionData { index, length } => {
                dst[0] = 2;
                dst[1] = *index;
                dst[2] = *length;
            }
            Self::AccountKey { index } => {
                dst[0] = 3;
                dst[1] = *index;
            }
            Self::AccountData {
                account_index,
                data_index,
                length,
            } => {
                dst[0] = 4;
                dst[1] = *account_index;
                dst[2] = *data_index;
                dst[3] = *length;
            }
        }
        Ok(())
    }

    /// Packs a list of seed configurations into a 32-byte array, filling the
    /// rest with 0s. Errors if it overflows.
    pub fn pack_into_address_config(
        seeds: &[Self],
    ) -> Result<[u8; ADDRESS_CONFIG_LEN], AccountResolutionError> {
        let mut packed = [0u8; ADDRESS_CONFIG_LEN];
        let mut i: usize = 0;
        for seed in seeds {
            let slice_end = i + seed.tlv_size();
            if slice_end > ADDRESS_CONFIG_LEN {
                return Err(AccountResolutionError::SeedConfigsTooLarge);
            }
            seed.pack(&mut packed[i..slice_end])?;
            i = slice_end;
        }
        Ok(packed)
    }

    /// Unpacks a single seed configuration from the start of a slice
    pub fn unpack(bytes: &[u8]) -> Result<Self, AccountResolutionError> {
        let (discrim, rest) = bytes
            .split_first()
            .ok_or(AccountResolutionError::InvalidSeedConfig)?;
        match discrim {
            1 => unpack_seed_literal(rest),
            2 => match rest {
                [index, length, ..] => Ok(Self::InstructionData {
                    index: *index,
                    length: *length,
                }),
                _ => Err(AccountResolutionError::InvalidSeedConfig),
            },
            3 => match rest {
                [index, ..] => Ok(Self::AccountKey { index: *index }),
                _ => Err(AccountResolutionError::InvalidSeedConfig),
            },
            4 => match rest {
                [account_index, data_index, length, ..] => Ok(Self::AccountData {
                    account_index: *account_index,
                    data_index: *data_index,
                    length: *length,
                }),
                _ => Err(AccountResolutionError::InvalidSeedConfig),
            },
            _ => Err(AccountResolutionError::InvalidSeedConfig),
        }
    }

    /// Unpacks all seed configurations from a 32-byte array, stopping at the
    /// first uninitialized (zero) byte
    pub fn unpack_address_config(
        bytes: &[u8; ADDRESS_CONFIG_LEN],
    ) -> Result<Vec<Self>, AccountResolutionError> {
        let mut seeds = vec![];
        let mut i = 0;
        while i < ADDRESS_CONFIG_LEN && bytes[i] != 0 {
            let seed = Self::unpack(&bytes[i..])?;
            i += seed.tlv_size();
            seeds.push(seed);
        }
        Ok(seeds)
    }

    /// Index of the account this seed reads from, if any
    pub fn account_index(&self) -> Option<u8> {
        match self {
            Self::AccountKey { index } => Some(*index),
            Self::AccountData { account_index, .. } => Some(*account_index),
            _ => None,
        }
    }
}

fn unpack_seed_literal(bytes: &[u8]) -> Result<Seed, AccountResolutionError> {
    let (length, rest) = bytes
        .split_first()
        .ok_or(AccountResolutionError::InvalidSeedConfig)?;
    let bytes = rest
        .get(..*length as usize)
        .ok_or(AccountResolutionError::InvalidSeedConfig)?;
    Ok(Seed::Literal {
        bytes: bytes.to_vec(),
    })
}
