//! Crate defining the interface of the allow/block list gating program: list
//! and wallet-entry addresses and state, the list-management instructions,
//! and the extra account metas the program publishes for Token ACL.

#![allow(clippy::arithmetic_side_effects)]
#![deny(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod extra_metas;
pub mod instruction;
pub mod state;

// Export current sdk types for downstream users building with a different sdk
// version
pub use solana_program;
use solana_program::pubkey::Pubkey;

solana_program::declare_id!("ABL37q2e55mQ87KxUuMYtSYdwBRx6ngaxzKUuA6Z1gk");

/// Seed for a list config
pub const LIST_CONFIG_SEED: &[u8] = b"list_config";

/// Seed for a wallet entry
pub const WALLET_ENTRY_SEED: &[u8] = b"ab_wallet";

/// Get the address of the list config owned by `authority` under `seed`
pub fn get_list_config_address(authority: &Pubkey, seed: &Pubkey, program_id: &Pubkey) -> Pubkey {
    get_list_config_address_and_bump_seed(authority, seed, program_id).0
}

/// Get the list config address and its bump seed
pub fn get_list_config_address_and_bump_seed(
    authority: &Pubkey,
    seed: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(&collect_list_config_seeds(authority, seed), program_id)
}

/// Seeds of a list config, without the bump
pub fn collect_list_config_seeds<'a>(authority: &'a Pubkey, seed: &'a Pubkey) -> [&'a [u8]; 3] {
    [LIST_CONFIG_SEED, authority.as_ref(), seed.as_ref()]
}

/// Get the address of the entry recording `wallet` in `list_config`
pub fn get_wallet_entry_address(
    list_config: &Pubkey,
    wallet: &Pubkey,
    program_id: &Pubkey,
) -> Pubkey {
    get_wallet_entry_address_and_bump_seed(list_config, wallet, program_id).0
}

/// Get the wallet entry address and its bump seed
pub fn get_wallet_entry_address_and_bump_seed(
    list_config: &Pubkey,
    wallet: &Pubkey,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &collect_wallet_entry_seeds(list_config, wallet),
        program_id,
    )
}

/// Seeds of a wallet entry, without the bump
pub fn collect_wallet_entry_seeds<'a>(
    list_config: &'a Pubkey,
    wallet: &'a Pubkey,
) -> [&'a [u8]; 3] {
    [WALLET_ENTRY_SEED, list_config.as_ref(), wallet.as_ref()]
}
