use {
    assert_matches::assert_matches,
    program_test::{decode_instructions, TestContext, TestToken, UnreachableClient},
    proptest::prelude::*,
    solana_sdk::{
        pubkey::Pubkey, rent::Rent, system_instruction::SystemInstruction, system_program,
    },
    spl_token_2022::{instruction::TokenInstruction, solana_program::program_option::COption},
    spl_token_metadata_interface::{
        instruction::{Initialize, TokenMetadataInstruction, UpdateField},
        state::Field,
    },
    std::sync::{atomic::Ordering, Arc},
    token_issuance_client::{
        catalog::{Phase, CATALOG},
        compose::{LayoutPlan, MintDescriptor},
        config::ProgramIds,
        error::{ErrorKind, TokenError, ValidationError},
        extension::{AccountState, ExtensionKind, ExtensionSpec, TokenMetadataSpec},
        layout::{base_metadata_tlv_len, mint_len},
    },
};

fn usdc_metadata(authority: Pubkey) -> TokenMetadataSpec {
    TokenMetadataSpec {
        update_authority: authority,
        name: "USD Coin".to_string(),
        symbol: "USDC".to_string(),
        uri: "https://x/m.json".to_string(),
        additional_metadata: vec![],
    }
}

fn system_instruction(data: &[u8]) -> SystemInstruction {
    bincode::deserialize(data).unwrap()
}

#[tokio::test]
async fn metadata_and_pausable_mint() {
    let context = TestContext::new();
    let token_program_id = context.program_ids.token_program;
    let mint = context.mint;
    let token = context.token();
    let authority = Pubkey::new_unique();

    let transaction = token
        .create_mint(
            &authority,
            None,
            6,
            vec![
                ExtensionSpec::TokenMetadata(usdc_metadata(authority)),
                ExtensionSpec::Pausable { authority },
            ],
        )
        .await
        .unwrap();
    let instructions = decode_instructions(&transaction);
    assert_eq!(instructions.len(), 4);

    assert_eq!(instructions[0].program_id, system_program::id());
    assert_eq!(
        system_instruction(&instructions[0].data),
        SystemInstruction::CreateAccount {
            lamports: Rent::default().minimum_balance(203 + 112),
            space: 203,
            owner: token_program_id,
        }
    );

    assert_eq!(instructions[1].program_id, token_program_id);
    assert_eq!(&instructions[1].data[..2], &[44, 0]);
    assert_eq!(&instructions[1].data[2..], authority.as_ref());

    assert_eq!(
        TokenInstruction::unpack(&instructions[2].data).unwrap(),
        TokenInstruction::InitializeMint2 {
            decimals: 6,
            mint_authority: authority,
            freeze_authority: COption::None,
        }
    );
    assert_eq!(instructions[2].accounts, vec![mint]);

    assert_eq!(
        TokenMetadataInstruction::unpack(&instructions[3].data).unwrap(),
        TokenMetadataInstruction::Initialize(Initialize {
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            uri: "https://x/m.json".to_string(),
        })
    );
    assert_eq!(instructions[3].accounts, vec![mint, authority, mint, authority]);
}

#[tokio::test]
async fn plain_mint() {
    let context = TestContext::new();
    let payer = context.payer;
    let token = context.token();
    let authority = Pubkey::new_unique();
    let freeze_authority = Pubkey::new_unique();

    let transaction = token
        .create_mint(&authority, Some(&freeze_authority), 0, vec![])
        .await
        .unwrap();
    assert_eq!(transaction.message.account_keys[0], payer);
    let instructions = decode_instructions(&transaction);
    assert_eq!(instructions.len(), 2);
    assert_matches!(
        system_instruction(&instructions[0].data),
        SystemInstruction::CreateAccount { space: 82, lamports, .. }
            if lamports == Rent::default().minimum_balance(82)
    );
    assert_matches!(
        TokenInstruction::unpack(&instructions[1].data),
        Ok(TokenInstruction::InitializeMint2 {
            decimals: 0,
            freeze_authority: COption::Some(key),
            ..
        }) if key == freeze_authority
    );
}

#[tokio::test]
async fn metadata_top_ups() {
    let context = TestContext::new();
    let mint = context.mint;
    let payer = context.payer;
    let token = context.token();
    let authority = Pubkey::new_unique();
    let metadata = TokenMetadataSpec {
        additional_metadata: vec![("issuer".to_string(), "circle".to_string())],
        ..usdc_metadata(authority)
    };

    let transaction = token
        .create_mint(
            &authority,
            None,
            6,
            vec![
                ExtensionSpec::TokenMetadata(metadata.clone()),
                ExtensionSpec::MetadataPointer {
                    authority: Some(authority),
                    metadata_address: Some(mint),
                },
            ],
        )
        .await
        .unwrap();
    let instructions = decode_instructions(&transaction);
    assert_eq!(instructions.len(), 6);

    let rent = Rent::default();
    let funded_len = 234 + base_metadata_tlv_len(&metadata).unwrap();
    assert_eq!(
        system_instruction(&instructions[0].data),
        SystemInstruction::CreateAccount {
            lamports: rent.minimum_balance(funded_len),
            space: 234,
            owner: ProgramIds::default().token_program,
        }
    );
    assert_eq!(&instructions[1].data[..2], &[39, 0]);
    assert_matches!(
        TokenInstruction::unpack(&instructions[2].data),
        Ok(TokenInstruction::InitializeMint2 { decimals: 6, .. })
    );
    assert_matches!(
        TokenMetadataInstruction::unpack(&instructions[3].data),
        Ok(TokenMetadataInstruction::Initialize(_))
    );

    assert_eq!(instructions[4].program_id, system_program::id());
    assert_eq!(instructions[4].accounts, vec![payer, mint]);
    assert_eq!(
        system_instruction(&instructions[4].data),
        SystemInstruction::Transfer {
            lamports: rent.minimum_balance(funded_len + 4 + 6 + 4 + 6)
                - rent.minimum_balance(funded_len),
        }
    );
    assert_eq!(
        TokenMetadataInstruction::unpack(&instructions[5].data).unwrap(),
        TokenMetadataInstruction::UpdateField(UpdateField {
            field: Field::Key("issuer".to_string()),
            value: "circle".to_string(),
        })
    );
}

#[tokio::test]
async fn oversized_transaction() {
    let token = TestContext::new().token();
    let authority = Pubkey::new_unique();
    let metadata = TokenMetadataSpec {
        update_authority: authority,
        name: "n".repeat(32),
        symbol: "s".repeat(10),
        uri: "u".repeat(200),
        additional_metadata: (0..10)
            .map(|i| (format!("attribute-{i}"), "x".repeat(48)))
            .collect(),
    };

    let error = token
        .create_mint(
            &authority,
            None,
            6,
            vec![
                ExtensionSpec::DefaultAccountState {
                    state: AccountState::Frozen,
                },
                ExtensionSpec::TokenMetadata(metadata),
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Capacity);
    assert_matches!(
        error,
        TokenError::TransactionTooLarge { contributions, .. }
            if contributions.len() == 2
                && contributions[0].0 == ExtensionKind::TokenMetadata
                && contributions[1].0 == ExtensionKind::DefaultAccountState
    );
}

#[tokio::test]
async fn validation_before_network() {
    let client = Arc::new(UnreachableClient::default());
    let token = TestToken::new(
        client.clone(),
        ProgramIds::default(),
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
    );
    let authority = Pubkey::new_unique();

    let error = token
        .create_mint(
            &authority,
            None,
            6,
            vec![
                ExtensionSpec::Pausable { authority },
                ExtensionSpec::TokenMetadata(TokenMetadataSpec {
                    symbol: "TOOLONGSYMBOL".to_string(),
                    ..usdc_metadata(authority)
                }),
            ],
        )
        .await
        .unwrap_err();
    assert_matches!(
        error,
        TokenError::Validation(ValidationError::FieldTooLong {
            kind: ExtensionKind::TokenMetadata,
            field: "symbol",
            ..
        })
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);

    // a valid mint reaches the ledger, and the failure is retryable
    let error = token
        .create_mint(&authority, None, 6, vec![ExtensionSpec::Pausable { authority }])
        .await
        .unwrap_err();
    assert_matches!(error, TokenError::Client(_));
    assert!(error.is_retryable());
    assert!(client.calls.load(Ordering::SeqCst) > 0);
}

fn all_specs() -> Vec<ExtensionSpec> {
    let key = Pubkey::new_from_array([7; 32]);
    vec![
        ExtensionSpec::TransferFeeConfig {
            transfer_fee_config_authority: Some(key),
            withdraw_withheld_authority: None,
            transfer_fee_basis_points: 100,
            maximum_fee: 1_000_000,
        },
        ExtensionSpec::MintCloseAuthority {
            close_authority: Some(key),
        },
        ExtensionSpec::ConfidentialTransferMint {
            authority: None,
            auto_approve_new_accounts: true,
            auditor_elgamal_pubkey: None,
        },
        ExtensionSpec::DefaultAccountState {
            state: AccountState::Initialized,
        },
        ExtensionSpec::NonTransferable,
        ExtensionSpec::InterestBearingConfig {
            rate_authority: Some(key),
            rate: 500,
        },
        ExtensionSpec::PermanentDelegate { delegate: key },
        ExtensionSpec::TransferHook {
            authority: Some(key),
            program_id: Some(key),
        },
        ExtensionSpec::MetadataPointer {
            authority: Some(key),
            metadata_address: None,
        },
        ExtensionSpec::GroupPointer {
            authority: None,
            group_address: Some(key),
        },
        ExtensionSpec::ScaledUiAmount {
            authority: Some(key),
            multiplier: 2.0,
        },
        ExtensionSpec::Pausable { authority: key },
        ExtensionSpec::TokenMetadata(TokenMetadataSpec {
            update_authority: key,
            name: "Name".to_string(),
            symbol: "SYM".to_string(),
            uri: "https://example.com".to_string(),
            additional_metadata: vec![("k".to_string(), "v".to_string())],
        }),
    ]
}

proptest! {
    #[test]
    fn instruction_order(
        specs in proptest::sample::subsequence(all_specs(), 0..=13).prop_shuffle()
    ) {
        let payer = Pubkey::new_unique();
        let descriptor = MintDescriptor {
            mint: Pubkey::new_unique(),
            decimals: 2,
            mint_authority: Pubkey::new_unique(),
            freeze_authority: None,
            extensions: specs.clone(),
        };
        let plan = LayoutPlan::new(&ProgramIds::default().token_program, &descriptor).unwrap();
        let balances = plan
            .rent_lengths()
            .into_iter()
            .map(|len| Rent::default().minimum_balance(len))
            .collect::<Vec<_>>();
        let instructions = plan.instructions(&payer, &balances);

        // creation first, then pre-phase, base mint, post-phase
        prop_assert_eq!(instructions[0].kind, None);
        let init_index = instructions
            .iter()
            .rposition(|planned| planned.kind.is_none())
            .unwrap();
        prop_assert!(matches!(
            TokenInstruction::unpack(&instructions[init_index].instruction.data),
            Ok(TokenInstruction::InitializeMint2 { decimals: 2, .. })
        ));
        for (i, planned) in instructions.iter().enumerate().skip(1) {
            if let Some(kind) = planned.kind {
                match kind.phase() {
                    Phase::Pre => prop_assert!(i < init_index),
                    Phase::Post => prop_assert!(i > init_index),
                }
            }
        }

        // pre-phase instructions follow catalog order
        let pre_kinds = instructions[1..init_index]
            .iter()
            .filter_map(|planned| planned.kind)
            .collect::<Vec<_>>();
        let mut sorted = pre_kinds.clone();
        sorted.sort_by_key(|kind| CATALOG.iter().position(|entry| entry == kind));
        prop_assert_eq!(&pre_kinds, &sorted);

        // the variable-length payload never inflates the allocation
        let fixed_kinds = specs
            .iter()
            .map(ExtensionSpec::kind)
            .filter(|kind| kind.phase() == Phase::Pre)
            .collect::<Vec<_>>();
        let expected_len = if specs.is_empty() || !fixed_kinds.is_empty() {
            mint_len(fixed_kinds).unwrap()
        } else {
            166
        };
        prop_assert_eq!(plan.account_len(), expected_len);
    }
}
