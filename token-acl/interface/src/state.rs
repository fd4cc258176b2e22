//! State transition types

use {
    crate::error::GatingError,
    bytemuck::{Pod, Zeroable},
    solana_program::pubkey::Pubkey,
    spl_pod::{optional_keys::OptionalNonZeroPubkey, primitives::PodBool},
};

/// Per-mint configuration of the Token ACL program, stored at the PDA
/// `["MINT_CFG", mint]`. The program holds the mint's freeze authority and
/// lets the configured gating program approve permissionless thaw and freeze.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MintConfig {
    /// Account discriminator, always `MintConfig::DISCRIMINATOR`
    pub discriminator: u8,
    /// Mint governed by this config
    pub mint: Pubkey,
    /// Authority allowed to thaw, freeze and reconfigure
    pub freeze_authority: Pubkey,
    /// Gating program, if any
    pub gating_program: OptionalNonZeroPubkey,
    /// Bump seed of the config address
    pub bump: u8,
    /// Whether permissionless thaw may be invoked
    pub enable_permissionless_thaw: PodBool,
    /// Whether permissionless freeze may be invoked
    pub enable_permissionless_freeze: PodBool,
}

impl MintConfig {
    /// Account discriminator
    pub const DISCRIMINATOR: u8 = 1;
    /// Serialized size
    pub const LEN: usize = std::mem::size_of::<Self>();

    /// Deserialize a config from account data
    pub fn unpack(data: &[u8]) -> Result<&Self, GatingError> {
        let config = data
            .get(..Self::LEN)
            .and_then(|bytes| bytemuck::try_from_bytes::<Self>(bytes).ok())
            .ok_or(GatingError::InvalidMintConfig)?;
        if config.discriminator != Self::DISCRIMINATOR {
            return Err(GatingError::InvalidMintConfig);
        }
        Ok(config)
    }

    /// Gating program, if one is set
    pub fn gating_program(&self) -> Option<Pubkey> {
        self.gating_program.into()
    }

    /// Whether the given permissionless action is enabled
    pub fn is_enabled(&self, action: crate::PermissionlessAction) -> bool {
        match action {
            crate::PermissionlessAction::Thaw => self.enable_permissionless_thaw.into(),
            crate::PermissionlessAction::Freeze => self.enable_permissionless_freeze.into(),
        }
    }
}
