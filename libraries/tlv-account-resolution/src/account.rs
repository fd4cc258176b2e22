//! Struct for managing extra required account configs, ie. defining accounts
//! required for a gated instruction, which can be `AccountMeta`s - which
//! have fixed addresses - PDAs - which have addresses derived from a
//! collection of seeds - or addresses read out of some data

use {
    crate::{error::AccountResolutionError, pubkey_data::PubkeyData, seeds::Seed},
    bytemuck::{Pod, Zeroable},
    solana_program::{instruction::AccountMeta, pubkey::Pubkey},
    spl_pod::primitives::PodBool,
};

/// Discriminator bit marking a PDA derived by an external program, whose
/// address sits at the index stored in the lower bits
const U8_TOP_BIT: u8 = 1 << 7;

/// `Pod` type for defining a required account in a validation account.
///
/// This can be a standard `AccountMeta`, a PDA, or a pubkey read from data.
/// Can be used in TLV-encoded data.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ExtraAccountMeta {
    /// Discriminator to tell whether this represents a standard
    /// `AccountMeta`, a PDA, or a pubkey stored in data
    pub discriminator: u8,
    /// This `address_config` field can either be the pubkey of the account,
    /// the seeds used to derive the pubkey from provided inputs, or the
    /// location of the pubkey in some data
    pub address_config: [u8; 32],
    /// Whether the account should sign
    pub is_signer: PodBool,
    /// Whether the account should be writable
    pub is_writable: PodBool,
}

/// Decoded form of `ExtraAccountMeta::address_config`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressConfig {
    /// A fixed address
    Pubkey(Pubkey),
    /// A PDA derived from the given seeds
    Seeds {
        /// Index of the deriving program in the accounts list, or `None` for
        /// the program the instruction is addressed to
        program_index: Option<u8>,
        /// Seeds fed to the derivation, in order
        seeds: Vec<Seed>,
    },
    /// An address stored in instruction or account data
    PubkeyData(PubkeyData),
}

impl ExtraAccountMeta {
    /// Create a `ExtraAccountMeta` from a public key, thus representing a
    /// standard `AccountMeta`
    pub fn new_with_pubkey(pubkey: &Pubkey, is_signer: bool, is_writable: bool) -> Self {
        Self {
            discriminator: 0,
            address_config: pubkey.to_bytes(),
            is_signer: is_signer.into(),
            is_writable: is_writable.into(),
        }
    }

    /// Create a `ExtraAccountMeta` from a list of seed configurations, thus
    /// representing a PDA of the program the instruction is addressed to
    pub fn new_with_seeds(
        seeds: &[Seed],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, AccountResolutionError> {
        Ok(Self {
            discriminator: 1,
            address_config: Seed::pack_into_address_config(seeds)?,
            is_signer: is_signer.into(),
            is_writable: is_writable.into(),
        })
    }

    /// Create a `ExtraAccountMeta` from a pubkey data configuration
    pub fn new_with_pubkey_data(
        pubkey_data: &PubkeyData,
        is_signer: bool,
        is_writable: bool,
    ) -> Self {
        Self {
            discriminator: 2,
            address_config: pubkey_data.address_config(),
            is_signer: is_signer.into(),
            is_writable: is_writable.into(),
        }
    }

    /// Create a `ExtraAccountMeta` representing a PDA of the program found
    /// at `program_index` in the accounts list
    pub fn new_external_pda_with_seeds(
        program_index: u8,
        seeds: &[Seed],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, AccountResolutionError> {
        if program_index >= U8_TOP_BIT {
            return Err(AccountResolutionError::InvalidProgramIndex(program_index));
        }
        Ok(Self {
            discriminator: U8_TOP_BIT | program_index,
            address_config: Seed::pack_into_address_config(seeds)?,
            is_signer: is_signer.into(),
            is_writable: is_writable.into(),
        })
    }

    /// Decode the address configuration according to the discriminator
    pub fn address_config(&self) -> Result<AddressConfig, AccountResolutionError> {
        match self.discriminator {
            0 => Ok(AddressConfig::Pubkey(Pubkey::new_from_array(
                self.address_config,
            ))),
            1 => Ok(AddressConfig::Seeds {
                program_index: None,
                seeds: Seed::unpack_address_config(&self.address_config)?,
            }),
            2 => Ok(AddressConfig::PubkeyData(PubkeyData::unpack(
                &self.address_config,
            )?)),
            x if x >= U8_TOP_BIT => Ok(AddressConfig::Seeds {
                program_index: Some(x - U8_TOP_BIT),
                seeds: Seed::unpack_address_config(&self.address_config)?,
            }),
            x => Err(AccountResolutionError::InvalidAccountType(x)),
        }
    }
}

impl AddressConfig {
    /// All account indices this configuration reads, including the deriving
    /// program of an external PDA
    pub fn account_indices(&self) -> Vec<u8> {
        match self {
            Self::Pubkey(_) => vec![],
            Self::Seeds {
                program_index,
                seeds,
            } => program_index
                .iter()
                .copied()
                .chain(seeds.iter().filter_map(Seed::account_index))
                .collect(),
            Self::PubkeyData(data) => data.account_index().into_iter().collect(),
        }
    }
}

impl From<&AccountMeta> for ExtraAccountMeta {
    fn from(meta: &AccountMeta) -> Self {
        Self::new_with_pubkey(&meta.pubkey, meta.is_signer, meta.is_writable)
    }
}
