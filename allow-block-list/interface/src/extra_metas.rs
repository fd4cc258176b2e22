//! Extra account metas published for Token ACL permissionless thaw and freeze.
//!
//! Every governed list contributes two accounts, appended after the fixed
//! gating interface accounts: the list config itself, then the owner's wallet
//! entry in that list, derived as `["ab_wallet", list_config, owner]`. The
//! entry may not exist, which is what lets the program tell listed wallets
//! from unlisted ones.

use {
    crate::{error::AccessListError, WALLET_ENTRY_SEED},
    solana_program::pubkey::Pubkey,
    token_acl_interface::{
        instruction::{
            CanFreezePermissionlessInstruction, CanThawPermissionlessInstruction,
            GATING_BASE_ACCOUNTS_LEN,
        },
        PermissionlessAction,
    },
    token_acl_tlv_account_resolution::{
        account::ExtraAccountMeta, seeds::Seed, state::ExtraAccountMetaList,
    },
};

/// Index of the token account owner in a gating interface instruction
pub const OWNER_ACCOUNT_INDEX: u8 = 3;

/// Build the extra account metas referencing each list in order
pub fn extra_account_metas_for_lists(
    list_configs: &[Pubkey],
) -> Result<Vec<ExtraAccountMeta>, AccessListError> {
    check_list_capacity(list_configs.len())?;
    let mut metas = Vec::with_capacity(list_configs.len() * 2);
    for (i, list_config) in list_configs.iter().enumerate() {
        let list_index = u8::try_from(GATING_BASE_ACCOUNTS_LEN + 2 * i)
            .map_err(|_| AccessListError::TooManyLists)?;
        metas.push(ExtraAccountMeta::new_with_pubkey(list_config, false, false));
        metas.push(
            ExtraAccountMeta::new_with_seeds(
                &[
                    Seed::Literal {
                        bytes: WALLET_ENTRY_SEED.to_vec(),
                    },
                    Seed::AccountKey { index: list_index },
                    Seed::AccountKey {
                        index: OWNER_ACCOUNT_INDEX,
                    },
                ],
                false,
                false,
            )
            .map_err(|_| AccessListError::InvalidExtraMetas)?,
        );
    }
    Ok(metas)
}

/// Every wallet entry seed names its list by account index, which must fit in
/// a byte
pub fn check_list_capacity(lists: usize) -> Result<(), AccessListError> {
    match lists.checked_sub(1) {
        Some(last) if GATING_BASE_ACCOUNTS_LEN + 2 * last > u8::MAX as usize => {
            Err(AccessListError::TooManyLists)
        }
        _ => Ok(()),
    }
}

/// Encode the extra metas account data published for `action`
pub fn pack_extra_account_metas(
    action: PermissionlessAction,
    list_configs: &[Pubkey],
) -> Result<Vec<u8>, AccessListError> {
    let metas = extra_account_metas_for_lists(list_configs)?;
    match action {
        PermissionlessAction::Thaw => {
            ExtraAccountMetaList::pack::<CanThawPermissionlessInstruction>(&metas)
        }
        PermissionlessAction::Freeze => {
            ExtraAccountMetaList::pack::<CanFreezePermissionlessInstruction>(&metas)
        }
    }
    .map_err(|_| AccessListError::InvalidExtraMetas)
}
