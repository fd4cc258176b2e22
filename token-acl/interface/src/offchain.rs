//! Offchain helpers for looking up a mint's gating program and building
//! permissionless thaw and freeze instructions

pub use token_acl_tlv_account_resolution::{error::AccountFetchError, state::AccountDataResult};
use {
    crate::{
        error::{GatingError, OffchainError},
        get_extra_account_metas_address, get_mint_config_address,
        instruction::{
            can_permissionless, permissionless_with_extra_account_metas,
            CanFreezePermissionlessInstruction, CanThawPermissionlessInstruction,
            GATING_BASE_ACCOUNTS_LEN,
        },
        state::MintConfig,
        PermissionlessAction,
    },
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
    },
    std::future::Future,
    token_acl_tlv_account_resolution::state::ExtraAccountMetaList,
};

/// Fetch and decode the mint config of `mint`, or `None` if the mint has no
/// config
pub async fn fetch_mint_config<F, Fut>(
    program_id: &Pubkey,
    mint: &Pubkey,
    fetch_account_data_fn: F,
) -> Result<Option<MintConfig>, OffchainError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    let mint_config_address = get_mint_config_address(mint, program_id);
    let Some(data) = fetch_account_data_fn(mint_config_address)
        .await
        .map_err(OffchainError::Fetch)?
    else {
        return Ok(None);
    };
    let config = MintConfig::unpack(&data).map_err(OffchainError::Config)?;
    if config.mint != *mint {
        return Err(OffchainError::Config(GatingError::MintMismatch));
    }
    Ok(Some(*config))
}

/// Look up which gating program governs permissionless actions on `mint`.
///
/// A mint without a config, or whose config has the gating program unset,
/// resolves to `None`.
pub async fn resolve_gating_program<F, Fut>(
    program_id: &Pubkey,
    mint: &Pubkey,
    fetch_account_data_fn: F,
) -> Result<Option<Pubkey>, OffchainError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    Ok(fetch_mint_config(program_id, mint, fetch_account_data_fn)
        .await?
        .and_then(|config| config.gating_program()))
}

/// Offchain helper to resolve the additional accounts of a gating interface
/// instruction, based on the extra metas the gating program published for
/// the action.
///
/// The base instruction must start with the fixed gating interface accounts:
/// 1. caller
/// 2. token account
/// 3. mint
/// 4. owner
/// 5. extra metas account for `action`
///
/// Returns only the resolved additional accounts, in published order.
pub async fn resolve_extra_account_metas<F, Fut>(
    base_instruction: &Instruction,
    gating_program_id: &Pubkey,
    action: PermissionlessAction,
    fetch_account_data_fn: F,
) -> Result<Vec<AccountMeta>, OffchainError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    let gating_error = |source, mint| OffchainError::Gating {
        source,
        action,
        mint,
    };
    let accounts = &base_instruction.accounts;
    let mint = accounts
        .get(2)
        .map(|meta| meta.pubkey)
        .filter(|_| accounts.len() >= GATING_BASE_ACCOUNTS_LEN)
        .ok_or_else(|| gating_error(GatingError::MissingBaseAccounts, Pubkey::default()))?;

    let extra_account_metas = get_extra_account_metas_address(&mint, gating_program_id, action);
    if accounts[4].pubkey != extra_account_metas
        || base_instruction.program_id != *gating_program_id
    {
        return Err(gating_error(GatingError::IncorrectAccount, mint));
    }

    let data = fetch_account_data_fn(extra_account_metas)
        .await
        .map_err(OffchainError::Fetch)?
        .ok_or_else(|| gating_error(GatingError::ExtraMetasNotPublished, mint))?;

    let resolved = match action {
        PermissionlessAction::Thaw => {
            ExtraAccountMetaList::resolve::<CanThawPermissionlessInstruction, _, _>(
                base_instruction,
                fetch_account_data_fn,
                &data,
            )
            .await
        }
        PermissionlessAction::Freeze => {
            ExtraAccountMetaList::resolve::<CanFreezePermissionlessInstruction, _, _>(
                base_instruction,
                fetch_account_data_fn,
                &data,
            )
            .await
        }
    }?;
    Ok(resolved)
}

/// Offchain helper to build a complete `ThawPermissionless` or
/// `FreezePermissionless` instruction: looks up the mint config, checks the
/// action is enabled, then resolves the gating program's extra metas.
///
/// To be client-agnostic this takes a function returning the data of an
/// account, as in:
///
/// ```rust,ignore
/// create_permissionless_instruction(
///     &token_acl_program_id,
///     PermissionlessAction::Thaw,
///     &caller,
///     &token_account,
///     &mint,
///     &owner,
///     &token_program_id,
///     |address| client.get_account(address).map_ok(|opt| opt.map(|acc| acc.data)),
/// )
/// .await?;
/// ```
#[allow(clippy::too_many_arguments)]
pub async fn create_permissionless_instruction<F, Fut>(
    program_id: &Pubkey,
    action: PermissionlessAction,
    caller: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    token_program_id: &Pubkey,
    fetch_account_data_fn: F,
) -> Result<Instruction, OffchainError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    let gating_error = |source| OffchainError::Gating {
        source,
        action,
        mint: *mint,
    };
    let config = fetch_mint_config(program_id, mint, &fetch_account_data_fn)
        .await?
        .ok_or_else(|| gating_error(GatingError::NoGatingProgram))?;
    let gating_program_id = config
        .gating_program()
        .ok_or_else(|| gating_error(GatingError::NoGatingProgram))?;
    if !config.is_enabled(action) {
        return Err(gating_error(GatingError::PermissionlessDisabled));
    }

    let extra_account_metas = get_extra_account_metas_address(mint, &gating_program_id, action);
    let base_instruction = can_permissionless(
        &gating_program_id,
        action,
        caller,
        token_account,
        mint,
        owner,
        &extra_account_metas,
    );
    let additional_accounts = resolve_extra_account_metas(
        &base_instruction,
        &gating_program_id,
        action,
        &fetch_account_data_fn,
    )
    .await?;

    Ok(permissionless_with_extra_account_metas(
        program_id,
        action,
        caller,
        token_account,
        mint,
        &get_mint_config_address(mint, program_id),
        owner,
        token_program_id,
        &gating_program_id,
        &extra_account_metas,
        &additional_accounts,
    ))
}
