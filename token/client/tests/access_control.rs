use {
    allow_block_list_interface::{
        error::AccessListError,
        extra_metas::pack_extra_account_metas,
        get_list_config_address, get_wallet_entry_address,
        state::{ListConfig, Mode, WalletEntry},
    },
    assert_matches::assert_matches,
    program_test::{decode_instructions, TestContext},
    solana_sdk::{pubkey::Pubkey, system_program},
    spl_pod::{
        optional_keys::OptionalNonZeroPubkey,
        primitives::{PodBool, PodU64},
    },
    token_acl_interface::{
        error::GatingError,
        get_freeze_extra_account_metas_address, get_mint_config_address,
        get_thaw_extra_account_metas_address,
        instruction::TokenAclInstruction,
        state::MintConfig,
        PermissionlessAction,
    },
    token_issuance_client::{
        config::ProgramIds,
        error::{ErrorKind, ProtocolError, TokenError},
    },
};

fn mint_config_data(mint: &Pubkey, gating_program: Option<&Pubkey>, enabled: bool) -> Vec<u8> {
    let config = MintConfig {
        discriminator: MintConfig::DISCRIMINATOR,
        mint: *mint,
        freeze_authority: Pubkey::new_unique(),
        gating_program: OptionalNonZeroPubkey::try_from(gating_program.copied()).unwrap(),
        bump: 255,
        enable_permissionless_thaw: PodBool::from(enabled),
        enable_permissionless_freeze: PodBool::from(enabled),
    };
    bytemuck::bytes_of(&config).to_vec()
}

/// A mint gated by the allow/block list program through one list
struct GatedMint {
    context: TestContext,
    list_config: Pubkey,
}

impl GatedMint {
    fn new(enabled: bool) -> Self {
        let context = TestContext::new();
        let ProgramIds {
            token_acl_program,
            access_list_program,
            ..
        } = context.program_ids;
        let mint = context.mint;
        let list_config = Pubkey::new_unique();
        let context = context
            .with_account(
                get_mint_config_address(&mint, &token_acl_program),
                &token_acl_program,
                mint_config_data(&mint, Some(&access_list_program), enabled),
            )
            .with_account(
                get_thaw_extra_account_metas_address(&mint, &access_list_program),
                &access_list_program,
                pack_extra_account_metas(PermissionlessAction::Thaw, &[list_config]).unwrap(),
            );
        Self {
            context,
            list_config,
        }
    }
}

#[tokio::test]
async fn no_mint_config() {
    let token = TestContext::new().token();
    assert_eq!(token.get_gating_program().await.unwrap(), None);
    assert_eq!(token.get_mint_config().await.unwrap(), None);

    let error = token
        .thaw_permissionless(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        )
        .await
        .unwrap_err();
    assert_matches!(
        error,
        TokenError::Protocol(ProtocolError::Gating {
            source: GatingError::NoGatingProgram,
            action: PermissionlessAction::Thaw,
            ..
        })
    );
}

#[tokio::test]
async fn unset_gating_program() {
    let context = TestContext::new();
    let mint = context.mint;
    let token_acl_program = context.program_ids.token_acl_program;
    let token = context
        .with_account(
            get_mint_config_address(&mint, &token_acl_program),
            &token_acl_program,
            mint_config_data(&mint, None, true),
        )
        .token();

    assert!(token.get_mint_config().await.unwrap().is_some());
    assert_eq!(token.get_gating_program().await.unwrap(), None);
}

#[tokio::test]
async fn thaw_permissionless() {
    let GatedMint {
        context,
        list_config,
    } = GatedMint::new(true);
    let ProgramIds {
        token_program,
        token_acl_program,
        access_list_program,
    } = context.program_ids;
    let mint = context.mint;
    let token = context.token();
    let caller = Pubkey::new_unique();
    let token_account = Pubkey::new_unique();
    let owner = Pubkey::new_unique();

    assert_eq!(
        token.get_gating_program().await.unwrap(),
        Some(access_list_program)
    );

    let instruction = token
        .permissionless_instruction(PermissionlessAction::Thaw, &caller, &token_account, &owner)
        .await
        .unwrap();
    assert_eq!(instruction.program_id, token_acl_program);
    assert_eq!(
        TokenAclInstruction::unpack(&instruction.data).unwrap(),
        TokenAclInstruction::ThawPermissionless
    );
    let accounts = instruction
        .accounts
        .iter()
        .map(|meta| meta.pubkey)
        .collect::<Vec<_>>();
    assert_eq!(
        accounts,
        vec![
            caller,
            token_account,
            mint,
            get_mint_config_address(&mint, &token_acl_program),
            owner,
            token_program,
            access_list_program,
            get_thaw_extra_account_metas_address(&mint, &access_list_program),
            list_config,
            get_wallet_entry_address(&list_config, &owner, &access_list_program),
        ]
    );
    assert!(instruction.accounts[0].is_signer);
    assert!(instruction.accounts[1].is_writable);

    let transaction = token
        .thaw_permissionless(&caller, &token_account, &owner)
        .await
        .unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].accounts, accounts);
}

#[tokio::test]
async fn freeze_extra_metas_not_published() {
    let GatedMint { context, .. } = GatedMint::new(true);
    let mint = context.mint;
    let token = context.token();

    let error = token
        .freeze_permissionless(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        )
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Protocol);
    assert_matches!(
        error,
        TokenError::Protocol(ProtocolError::Gating {
            source: GatingError::ExtraMetasNotPublished,
            action: PermissionlessAction::Freeze,
            mint: m,
        }) if m == mint
    );
}

#[tokio::test]
async fn permissionless_disabled() {
    let GatedMint { context, .. } = GatedMint::new(false);
    let token = context.token();

    let error = token
        .thaw_permissionless(
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
        )
        .await
        .unwrap_err();
    assert_matches!(
        error,
        TokenError::Protocol(ProtocolError::Gating {
            source: GatingError::PermissionlessDisabled,
            ..
        })
    );
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn authority_instructions() {
    let context = TestContext::new();
    let ProgramIds {
        token_acl_program,
        access_list_program,
        ..
    } = context.program_ids;
    let mint = context.mint;
    let payer = context.payer;
    let token = context.token();
    let authority = Pubkey::new_unique();
    let mint_config = get_mint_config_address(&mint, &token_acl_program);

    let transaction = token
        .create_mint_config(&authority, Some(&access_list_program))
        .await
        .unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(decoded[0].program_id, token_acl_program);
    assert_eq!(
        TokenAclInstruction::unpack(&decoded[0].data).unwrap(),
        TokenAclInstruction::CreateConfig {
            gating_program: OptionalNonZeroPubkey(access_list_program)
        }
    );
    assert_eq!(transaction.message.account_keys[0], payer);
    assert!(decoded[0].accounts.contains(&mint_config));

    let transaction = token.set_gating_program(&authority, None).await.unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(
        TokenAclInstruction::unpack(&decoded[0].data).unwrap(),
        TokenAclInstruction::SetGatingProgram {
            gating_program: OptionalNonZeroPubkey::default()
        }
    );

    let transaction = token
        .toggle_permissionless_instructions(&authority, false, true)
        .await
        .unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(
        TokenAclInstruction::unpack(&decoded[0].data).unwrap(),
        TokenAclInstruction::TogglePermissionlessInstructions {
            freeze_enabled: false,
            thaw_enabled: true,
        }
    );

    let token_account = Pubkey::new_unique();
    let transaction = token.freeze_account(&token_account, &authority).await.unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(
        TokenAclInstruction::unpack(&decoded[0].data).unwrap(),
        TokenAclInstruction::Freeze
    );
    assert!(decoded[0].accounts.contains(&token_account));
}

#[tokio::test]
async fn lists() {
    let context = TestContext::new();
    let access_list_program = context.program_ids.access_list_program;
    let mint = context.mint;
    let authority = Pubkey::new_unique();
    let wallet = Pubkey::new_unique();
    let token = context.token();
    let list_config = get_list_config_address(&authority, &mint, &access_list_program);
    assert_eq!(token.get_list_config_address(&authority), list_config);

    let transaction = token.create_list(&authority, Mode::Block).await.unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(decoded[0].program_id, access_list_program);
    assert_eq!(&decoded[0].data[..2], &[0, 1]);
    assert_eq!(&decoded[0].data[2..], mint.as_ref());
    assert_eq!(
        decoded[0].accounts,
        vec![authority, list_config, system_program::id()]
    );

    let transaction = token.add_wallet(&authority, &wallet).await.unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(
        decoded[0].accounts[3],
        get_wallet_entry_address(&list_config, &wallet, &access_list_program)
    );

    let error = token
        .setup_extra_metas(&authority, &vec![list_config; 127])
        .await
        .unwrap_err();
    assert_matches!(
        error,
        TokenError::Protocol(ProtocolError::AccessList(AccessListError::TooManyLists))
    );
    let transaction = token
        .setup_extra_metas(&authority, &[list_config])
        .await
        .unwrap();
    let decoded = decode_instructions(&transaction);
    assert_eq!(
        decoded[0].accounts[3..5],
        [
            get_thaw_extra_account_metas_address(&mint, &access_list_program),
            get_freeze_extra_account_metas_address(&mint, &access_list_program),
        ]
    );
}

#[tokio::test]
async fn list_reads() {
    let context = TestContext::new();
    let access_list_program = context.program_ids.access_list_program;
    let mint = context.mint;
    let authority = Pubkey::new_unique();
    let listed = Pubkey::new_unique();
    let list_config = get_list_config_address(&authority, &mint, &access_list_program);
    let config = ListConfig {
        discriminator: ListConfig::DISCRIMINATOR,
        authority,
        seed: mint,
        mode: Mode::Allow as u8,
        bump: 254,
        wallets_count: PodU64::from(1),
    };
    let entry = WalletEntry {
        discriminator: WalletEntry::DISCRIMINATOR,
        wallet: listed,
        list_config,
    };
    let token = context
        .with_account(
            list_config,
            &access_list_program,
            bytemuck::bytes_of(&config).to_vec(),
        )
        .with_account(
            get_wallet_entry_address(&list_config, &listed, &access_list_program),
            &access_list_program,
            bytemuck::bytes_of(&entry).to_vec(),
        )
        .token();

    assert_eq!(token.get_list_config(&authority).await.unwrap(), Some(config));
    assert_eq!(
        token.get_list_config(&Pubkey::new_unique()).await.unwrap(),
        None
    );
    assert!(token.is_wallet_listed(&list_config, &listed).await.unwrap());
    assert!(!token
        .is_wallet_listed(&list_config, &Pubkey::new_unique())
        .await
        .unwrap());

    let foreign = TestContext {
        mint,
        ..TestContext::new()
    }
    .with_account(list_config, &system_program::id(), bytemuck::bytes_of(&config).to_vec())
    .token();
    assert_matches!(
        foreign.get_list_config(&authority).await,
        Err(TokenError::Protocol(ProtocolError::AccountInvalidOwner(address)))
            if address == list_config
    );
}
