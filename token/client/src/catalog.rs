//! Extension instruction catalog: which phase each extension is initialized
//! in, and the instructions that initialize it

use {
    crate::{
        extension::{ExtensionKind, ExtensionSpec},
        layout::{base_metadata_tlv_len, metadata_field_lens},
    },
    solana_sdk::{instruction::Instruction, program_error::ProgramError, pubkey::Pubkey},
    spl_token_2022::{
        extension::{
            confidential_transfer, default_account_state, group_pointer, interest_bearing_mint,
            metadata_pointer, pausable, scaled_ui_amount, transfer_fee, transfer_hook,
        },
        instruction as token_instruction,
        solana_zk_sdk::encryption::pod::elgamal::PodElGamalPubkey,
    },
    spl_token_metadata_interface::{instruction as metadata_instruction, state::Field},
};

/// When an extension is initialized relative to `InitializeMint2`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Fixed-size configuration written before the base mint
    Pre,
    /// Variable-length data appended after the base mint
    Post,
}

/// Account growth caused by executing an instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// The instruction writes inside the allocated account
    None,
    /// Growth known when the account is created, funded up front
    Funded(usize),
    /// Growth funded by a transfer placed right before the instruction
    Incremental(usize),
}

/// All supported extensions, in the order their instructions are emitted
pub const CATALOG: [ExtensionKind; 13] = [
    ExtensionKind::TransferFeeConfig,
    ExtensionKind::MintCloseAuthority,
    ExtensionKind::ConfidentialTransferMint,
    ExtensionKind::DefaultAccountState,
    ExtensionKind::NonTransferable,
    ExtensionKind::InterestBearingConfig,
    ExtensionKind::PermanentDelegate,
    ExtensionKind::TransferHook,
    ExtensionKind::MetadataPointer,
    ExtensionKind::GroupPointer,
    ExtensionKind::ScaledUiAmount,
    ExtensionKind::Pausable,
    ExtensionKind::TokenMetadata,
];

impl ExtensionKind {
    /// Phase the extension is initialized in. Only fixed-size extensions can
    /// be sized before the base mint exists.
    pub fn phase(&self) -> Phase {
        match self {
            Self::TokenMetadata => Phase::Post,
            _ => Phase::Pre,
        }
    }
}

/// Accounts every extension instruction refers to
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    pub token_program_id: &'a Pubkey,
    pub mint: &'a Pubkey,
    /// Signs the metadata initialization
    pub mint_authority: &'a Pubkey,
}

/// An instruction produced for an extension, with the growth it causes
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedInstruction {
    pub kind: ExtensionKind,
    pub instruction: Instruction,
    pub growth: Growth,
}

/// Pair each supplied spec with its phase, walking the catalog so the
/// result follows catalog order whatever the input order
pub fn ordered_specs(specs: &[ExtensionSpec]) -> Vec<(Phase, &ExtensionSpec)> {
    CATALOG
        .iter()
        .flat_map(|kind| {
            specs
                .iter()
                .filter(move |spec| spec.kind() == *kind)
                .map(move |spec| (kind.phase(), spec))
        })
        .collect()
}

impl ExtensionSpec {
    /// Instructions that initialize the extension on the mint
    pub fn build(&self, ctx: &BuildContext) -> Result<Vec<PlannedInstruction>, ProgramError> {
        let BuildContext {
            token_program_id,
            mint,
            mint_authority,
        } = *ctx;
        let kind = self.kind();
        let fixed = |instruction| {
            vec![PlannedInstruction {
                kind,
                instruction,
                growth: Growth::None,
            }]
        };
        Ok(match self {
            Self::TransferFeeConfig {
                transfer_fee_config_authority,
                withdraw_withheld_authority,
                transfer_fee_basis_points,
                maximum_fee,
            } => fixed(transfer_fee::instruction::initialize_transfer_fee_config(
                token_program_id,
                mint,
                transfer_fee_config_authority.as_ref(),
                withdraw_withheld_authority.as_ref(),
                *transfer_fee_basis_points,
                *maximum_fee,
            )?),
            Self::MintCloseAuthority { close_authority } => {
                fixed(token_instruction::initialize_mint_close_authority(
                    token_program_id,
                    mint,
                    close_authority.as_ref(),
                )?)
            }
            Self::ConfidentialTransferMint {
                authority,
                auto_approve_new_accounts,
                auditor_elgamal_pubkey,
            } => fixed(confidential_transfer::instruction::initialize_mint(
                token_program_id,
                mint,
                *authority,
                *auto_approve_new_accounts,
                (*auditor_elgamal_pubkey).map(bytemuck::cast::<[u8; 32], PodElGamalPubkey>),
            )?),
            Self::DefaultAccountState { state } => fixed(
                default_account_state::instruction::initialize_default_account_state(
                    token_program_id,
                    mint,
                    state,
                )?,
            ),
            Self::NonTransferable => fixed(token_instruction::initialize_non_transferable_mint(
                token_program_id,
                mint,
            )?),
            Self::InterestBearingConfig {
                rate_authority,
                rate,
            } => fixed(interest_bearing_mint::instruction::initialize(
                token_program_id,
                mint,
                *rate_authority,
                *rate,
            )?),
            Self::PermanentDelegate { delegate } => fixed(
                token_instruction::initialize_permanent_delegate(token_program_id, mint, delegate)?,
            ),
            Self::TransferHook {
                authority,
                program_id,
            } => fixed(transfer_hook::instruction::initialize(
                token_program_id,
                mint,
                *authority,
                *program_id,
            )?),
            Self::MetadataPointer {
                authority,
                metadata_address,
            } => fixed(metadata_pointer::instruction::initialize(
                token_program_id,
                mint,
                *authority,
                *metadata_address,
            )?),
            Self::GroupPointer {
                authority,
                group_address,
            } => fixed(group_pointer::instruction::initialize(
                token_program_id,
                mint,
                *authority,
                *group_address,
            )?),
            Self::ScaledUiAmount {
                authority,
                multiplier,
            } => fixed(scaled_ui_amount::instruction::initialize(
                token_program_id,
                mint,
                *authority,
                *multiplier,
            )?),
            Self::Pausable { authority } => fixed(pausable::instruction::initialize(
                token_program_id,
                mint,
                authority,
            )?),
            Self::TokenMetadata(metadata) => {
                let mut planned = vec![PlannedInstruction {
                    kind,
                    instruction: metadata_instruction::initialize(
                        token_program_id,
                        mint,
                        &metadata.update_authority,
                        mint,
                        mint_authority,
                        metadata.name.clone(),
                        metadata.symbol.clone(),
                        metadata.uri.clone(),
                    ),
                    growth: Growth::Funded(base_metadata_tlv_len(metadata)?),
                }];
                let field_lens = metadata_field_lens(metadata)?;
                for ((key, value), field_len) in metadata.additional_metadata.iter().zip(field_lens)
                {
                    planned.push(PlannedInstruction {
                        kind,
                        instruction: metadata_instruction::update_field(
                            token_program_id,
                            mint,
                            &metadata.update_authority,
                            Field::Key(key.clone()),
                            value.clone(),
                        ),
                        growth: Growth::Incremental(field_len),
                    });
                }
                planned
            }
        })
    }
}
