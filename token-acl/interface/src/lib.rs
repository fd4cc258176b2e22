//! Crate defining the Token ACL program interface: the per-mint gating
//! configuration, the program's instructions, and the interface a gating
//! program implements to approve permissionless thaw and freeze.

#![allow(clippy::arithmetic_side_effects)]
#![deny(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod instruction;
pub mod offchain;
pub mod state;

// Export current sdk types for downstream users building with a different sdk
// version
pub use {solana_program, token_acl_tlv_account_resolution};
use {
    crate::instruction::{CanFreezePermissionlessInstruction, CanThawPermissionlessInstruction},
    solana_program::pubkey::Pubkey,
    spl_discriminator::{ArrayDiscriminator, SplDiscriminate},
    std::fmt,
};

solana_program::declare_id!("TACLkU6CiCdkQN2MjoyDkVg2yAH9zkxiHDsiztQ52TP");

/// Seed for the mint config
pub const MINT_CONFIG_SEED: &[u8] = b"MINT_CFG";

/// Seed for the extra metas a gating program publishes for permissionless
/// thaw
pub const THAW_EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"thaw-extra-account-metas";

/// Seed for the extra metas a gating program publishes for permissionless
/// freeze
pub const FREEZE_EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"freeze-extra-account-metas";

/// Action a gating program may approve without the freeze authority signing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionlessAction {
    /// Thaw a frozen token account
    Thaw,
    /// Freeze a token account
    Freeze,
}
impl PermissionlessAction {
    /// Seed prefix of the extra metas account published for this action
    pub fn extra_account_metas_seed(&self) -> &'static [u8] {
        match self {
            Self::Thaw => THAW_EXTRA_ACCOUNT_METAS_SEED,
            Self::Freeze => FREEZE_EXTRA_ACCOUNT_METAS_SEED,
        }
    }

    /// Discriminator of the gating instruction, which also tags the action's
    /// entry in the published list
    pub fn discriminator(&self) -> ArrayDiscriminator {
        match self {
            Self::Thaw => CanThawPermissionlessInstruction::SPL_DISCRIMINATOR,
            Self::Freeze => CanFreezePermissionlessInstruction::SPL_DISCRIMINATOR,
        }
    }
}
impl fmt::Display for PermissionlessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thaw => f.write_str("thaw"),
            Self::Freeze => f.write_str("freeze"),
        }
    }
}

/// Get the mint config address for a mint
pub fn get_mint_config_address(mint: &Pubkey, program_id: &Pubkey) -> Pubkey {
    get_mint_config_address_and_bump_seed(mint, program_id).0
}

/// Get the mint config address and its bump seed
pub fn get_mint_config_address_and_bump_seed(mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&collect_mint_config_seeds(mint), program_id)
}

/// Seeds of the mint config, without the bump
pub fn collect_mint_config_seeds(mint: &Pubkey) -> [&[u8]; 2] {
    [MINT_CONFIG_SEED, mint.as_ref()]
}

/// Get the address of the extra metas a gating program publishes for an
/// action on a mint
pub fn get_extra_account_metas_address(
    mint: &Pubkey,
    gating_program_id: &Pubkey,
    action: PermissionlessAction,
) -> Pubkey {
    Pubkey::find_program_address(
        &[action.extra_account_metas_seed(), mint.as_ref()],
        gating_program_id,
    )
    .0
}

/// Get the thaw extra metas address
pub fn get_thaw_extra_account_metas_address(mint: &Pubkey, gating_program_id: &Pubkey) -> Pubkey {
    get_extra_account_metas_address(mint, gating_program_id, PermissionlessAction::Thaw)
}

/// Get the freeze extra metas address
pub fn get_freeze_extra_account_metas_address(
    mint: &Pubkey,
    gating_program_id: &Pubkey,
) -> Pubkey {
    get_extra_account_metas_address(mint, gating_program_id, PermissionlessAction::Freeze)
}
