//! State transition types

use {
    crate::error::AccessListError,
    bytemuck::{Pod, Zeroable},
    solana_program::pubkey::Pubkey,
    spl_pod::primitives::PodU64,
};

/// How a list treats the wallets recorded in it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Only listed wallets are permitted
    Allow = 0,
    /// Listed wallets are refused
    Block = 1,
    /// Listed wallets and every wallet on the ed25519 curve are permitted
    AllowAllEoas = 2,
}
impl TryFrom<u8> for Mode {
    type Error = AccessListError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Allow),
            1 => Ok(Self::Block),
            2 => Ok(Self::AllowAllEoas),
            _ => Err(AccessListError::InvalidMode),
        }
    }
}

fn unpack<T: Pod>(data: &[u8], error: AccessListError) -> Result<&T, AccessListError> {
    data.get(..std::mem::size_of::<T>())
        .and_then(|bytes| bytemuck::try_from_bytes::<T>(bytes).ok())
        .ok_or(error)
}

/// List configuration, stored at `["list_config", authority, seed]`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ListConfig {
    /// Account discriminator, always `ListConfig::DISCRIMINATOR`
    pub discriminator: u8,
    /// Authority allowed to edit the list
    pub authority: Pubkey,
    /// Seed of the list, conventionally the governed mint
    pub seed: Pubkey,
    /// `Mode` as a byte
    pub mode: u8,
    /// Bump seed of the list address
    pub bump: u8,
    /// Number of wallet entries in the list
    pub wallets_count: PodU64,
}

impl ListConfig {
    /// Account discriminator
    pub const DISCRIMINATOR: u8 = 1;
    /// Serialized size
    pub const LEN: usize = std::mem::size_of::<Self>();

    /// Deserialize a list config from account data
    pub fn unpack(data: &[u8]) -> Result<&Self, AccessListError> {
        let config = unpack::<Self>(data, AccessListError::InvalidListConfig)?;
        if config.discriminator != Self::DISCRIMINATOR {
            return Err(AccessListError::InvalidListConfig);
        }
        config.mode()?;
        Ok(config)
    }

    /// Decoded list mode
    pub fn mode(&self) -> Result<Mode, AccessListError> {
        Mode::try_from(self.mode)
    }

    /// Whether `wallet` may hold the governed token, given whether it has an
    /// entry in this list
    pub fn permits(&self, wallet: &Pubkey, is_listed: bool) -> Result<bool, AccessListError> {
        Ok(match self.mode()? {
            Mode::Allow => is_listed,
            Mode::Block => !is_listed,
            Mode::AllowAllEoas => is_listed || wallet.is_on_curve(),
        })
    }
}

/// Record of one wallet in a list, stored at
/// `["ab_wallet", list_config, wallet]`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WalletEntry {
    /// Account discriminator, always `WalletEntry::DISCRIMINATOR`
    pub discriminator: u8,
    /// Listed wallet
    pub wallet: Pubkey,
    /// List the wallet belongs to
    pub list_config: Pubkey,
}

impl WalletEntry {
    /// Account discriminator
    pub const DISCRIMINATOR: u8 = 2;
    /// Serialized size
    pub const LEN: usize = std::mem::size_of::<Self>();

    /// Deserialize a wallet entry from account data
    pub fn unpack(data: &[u8]) -> Result<&Self, AccessListError> {
        let entry = unpack::<Self>(data, AccessListError::InvalidWalletEntry)?;
        if entry.discriminator != Self::DISCRIMINATOR {
            return Err(AccessListError::InvalidWalletEntry);
        }
        Ok(entry)
    }
}
