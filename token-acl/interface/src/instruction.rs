//! Instruction types

use {
    crate::{error::GatingError, PermissionlessAction},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
    spl_discriminator::SplDiscriminate,
    spl_pod::optional_keys::OptionalNonZeroPubkey,
};

/// Instructions supported by the Token ACL program.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenAclInstruction {
    /// Creates the mint config and hands the mint's freeze authority to it.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Payer
    ///   1. `[s]` Current freeze authority of the mint
    ///   2. `[w]` Mint
    ///   3. `[w]` Mint config
    ///   4. `[]` System program
    ///   5. `[]` Token program
    CreateConfig {
        /// Gating program, if any
        gating_program: OptionalNonZeroPubkey,
    },
    /// Sets the authority stored in the mint config.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[s]` Current authority
    ///   1. `[w]` Mint config
    SetAuthority {
        /// New authority
        new_authority: Pubkey,
    },
    /// Sets or unsets the gating program. Extra metas already published by a
    /// previous gating program are left in place.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[s]` Authority
    ///   1. `[w]` Mint config
    SetGatingProgram {
        /// New gating program, `None` to unset
        gating_program: OptionalNonZeroPubkey,
    },
    /// Thaws a token account, signed by the authority.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[s]` Authority
    ///   1. `[]` Mint
    ///   2. `[w]` Token account
    ///   3. `[]` Mint config
    ///   4. `[]` Token program
    Thaw,
    /// Freezes a token account, signed by the authority.
    ///
    /// Accounts expected by this instruction: same as `Thaw`
    Freeze,
    /// Thaws a token account if the gating program approves.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[s]` Caller
    ///   1. `[w]` Token account
    ///   2. `[]` Mint
    ///   3. `[]` Mint config
    ///   4. `[]` Token account owner
    ///   5. `[]` Token program
    ///   6. `[]` Gating program
    ///   7. `[]` Thaw extra metas account
    ///   8..8+M `[]` `M` additional accounts, resolved from the extra metas
    ThawPermissionless,
    /// Freezes a token account if the gating program approves.
    ///
    /// Accounts expected by this instruction: same as `ThawPermissionless`,
    /// with the freeze extra metas account
    FreezePermissionless,
    /// Enables or disables the permissionless instructions.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[s]` Authority
    ///   1. `[w]` Mint config
    TogglePermissionlessInstructions {
        /// Whether permissionless freeze is enabled
        freeze_enabled: bool,
        /// Whether permissionless thaw is enabled
        thaw_enabled: bool,
    },
}

/// Gating interface instruction asking whether a permissionless thaw may
/// proceed. The gating program fails the instruction to refuse.
///
/// Accounts expected by this instruction:
///
///   0. `[]` Caller
///   1. `[]` Token account
///   2. `[]` Mint
///   3. `[]` Token account owner
///   4. `[]` Thaw extra metas account
///   5..5+M `[]` `M` additional accounts, resolved from the extra metas
#[derive(SplDiscriminate)]
#[discriminator_hash_input("token-acl-interface:can-thaw-permissionless")]
pub struct CanThawPermissionlessInstruction;

/// Gating interface instruction asking whether a permissionless freeze may
/// proceed. Accounts as in `CanThawPermissionlessInstruction`, with the freeze
/// extra metas account.
#[derive(SplDiscriminate)]
#[discriminator_hash_input("token-acl-interface:can-freeze-permissionless")]
pub struct CanFreezePermissionlessInstruction;

/// Number of fixed accounts in a gating interface instruction
pub const GATING_BASE_ACCOUNTS_LEN: usize = 5;

impl TokenAclInstruction {
    /// Unpacks a byte buffer into a
    /// [TokenAclInstruction](enum.TokenAclInstruction.html).
    pub fn unpack(input: &[u8]) -> Result<Self, GatingError> {
        let (&tag, rest) = input
            .split_first()
            .ok_or(GatingError::InvalidInstruction)?;
        Ok(match tag {
            0 => Self::CreateConfig {
                gating_program: OptionalNonZeroPubkey(unpack_pubkey(rest)?),
            },
            1 => Self::SetAuthority {
                new_authority: unpack_pubkey(rest)?,
            },
            2 => Self::SetGatingProgram {
                gating_program: OptionalNonZeroPubkey(unpack_pubkey(rest)?),
            },
            3 => Self::Thaw,
            4 => Self::Freeze,
            5 => Self::ThawPermissionless,
            6 => Self::FreezePermissionless,
            7 => match rest {
                [freeze_enabled, thaw_enabled, ..] => Self::TogglePermissionlessInstructions {
                    freeze_enabled: *freeze_enabled != 0,
                    thaw_enabled: *thaw_enabled != 0,
                },
                _ => return Err(GatingError::InvalidInstruction),
            },
            _ => return Err(GatingError::InvalidInstruction),
        })
    }

    /// Packs a [TokenAclInstruction](enum.TokenAclInstruction.html) into a
    /// byte buffer.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![];
        match self {
            Self::CreateConfig { gating_program } => {
                buf.push(0);
                buf.extend_from_slice(bytemuck::bytes_of(gating_program));
            }
            Self::SetAuthority { new_authority } => {
                buf.push(1);
                buf.extend_from_slice(new_authority.as_ref());
            }
            Self::SetGatingProgram { gating_program } => {
                buf.push(2);
                buf.extend_from_slice(bytemuck::bytes_of(gating_program));
            }
            Self::Thaw => buf.push(3),
            Self::Freeze => buf.push(4),
            Self::ThawPermissionless => buf.push(5),
            Self::FreezePermissionless => buf.push(6),
            Self::TogglePermissionlessInstructions {
                freeze_enabled,
                thaw_enabled,
            } => {
                buf.push(7);
                buf.push((*freeze_enabled).into());
                buf.push((*thaw_enabled).into());
            }
        };
        buf
    }
}

fn unpack_pubkey(input: &[u8]) -> Result<Pubkey, GatingError> {
    input
        .get(..32)
        .and_then(|bytes| Pubkey::try_from(bytes).ok())
        .ok_or(GatingError::InvalidInstruction)
}

fn authority_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint_config: &Pubkey,
    instruction: TokenAclInstruction,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*mint_config, false),
        ],
        data: instruction.pack(),
    }
}

/// Creates a `CreateConfig` instruction.
#[allow(clippy::too_many_arguments)]
pub fn create_config(
    program_id: &Pubkey,
    payer: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    mint_config: &Pubkey,
    token_program_id: &Pubkey,
    gating_program: Option<&Pubkey>,
) -> Instruction {
    let data = TokenAclInstruction::CreateConfig {
        gating_program: OptionalNonZeroPubkey(gating_program.copied().unwrap_or_default()),
    }
    .pack();
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(*mint, false),
            AccountMeta::new(*mint_config, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program_id, false),
        ],
        data,
    }
}

/// Creates a `SetAuthority` instruction.
pub fn set_authority(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint_config: &Pubkey,
    new_authority: &Pubkey,
) -> Instruction {
    authority_instruction(
        program_id,
        authority,
        mint_config,
        TokenAclInstruction::SetAuthority {
            new_authority: *new_authority,
        },
    )
}

/// Creates a `SetGatingProgram` instruction. `None` unsets the gating program.
pub fn set_gating_program(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint_config: &Pubkey,
    gating_program: Option<&Pubkey>,
) -> Instruction {
    authority_instruction(
        program_id,
        authority,
        mint_config,
        TokenAclInstruction::SetGatingProgram {
            gating_program: OptionalNonZeroPubkey(gating_program.copied().unwrap_or_default()),
        },
    )
}

/// Creates a `TogglePermissionlessInstructions` instruction.
pub fn toggle_permissionless_instructions(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint_config: &Pubkey,
    freeze_enabled: bool,
    thaw_enabled: bool,
) -> Instruction {
    authority_instruction(
        program_id,
        authority,
        mint_config,
        TokenAclInstruction::TogglePermissionlessInstructions {
            freeze_enabled,
            thaw_enabled,
        },
    )
}

fn authority_action(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    token_account: &Pubkey,
    mint_config: &Pubkey,
    token_program_id: &Pubkey,
    instruction: TokenAclInstruction,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*mint_config, false),
            AccountMeta::new_readonly(*token_program_id, false),
        ],
        data: instruction.pack(),
    }
}

/// Creates a `Thaw` instruction.
pub fn thaw(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    token_account: &Pubkey,
    mint_config: &Pubkey,
    token_program_id: &Pubkey,
) -> Instruction {
    authority_action(
        program_id,
        authority,
        mint,
        token_account,
        mint_config,
        token_program_id,
        TokenAclInstruction::Thaw,
    )
}

/// Creates a `Freeze` instruction.
pub fn freeze(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
    token_account: &Pubkey,
    mint_config: &Pubkey,
    token_program_id: &Pubkey,
) -> Instruction {
    authority_action(
        program_id,
        authority,
        mint,
        token_account,
        mint_config,
        token_program_id,
        TokenAclInstruction::Freeze,
    )
}

/// Creates a `ThawPermissionless` or `FreezePermissionless` instruction,
/// provided all of the additional required account metas
#[allow(clippy::too_many_arguments)]
pub fn permissionless_with_extra_account_metas(
    program_id: &Pubkey,
    action: PermissionlessAction,
    caller: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    mint_config: &Pubkey,
    owner: &Pubkey,
    token_program_id: &Pubkey,
    gating_program_id: &Pubkey,
    extra_account_metas: &Pubkey,
    additional_accounts: &[AccountMeta],
) -> Instruction {
    let instruction = match action {
        PermissionlessAction::Thaw => TokenAclInstruction::ThawPermissionless,
        PermissionlessAction::Freeze => TokenAclInstruction::FreezePermissionless,
    };
    let mut accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*token_account, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new_readonly(*mint_config, false),
        AccountMeta::new_readonly(*owner, false),
        AccountMeta::new_readonly(*token_program_id, false),
        AccountMeta::new_readonly(*gating_program_id, false),
        AccountMeta::new_readonly(*extra_account_metas, false),
    ];
    accounts.extend_from_slice(additional_accounts);
    Instruction {
        program_id: *program_id,
        accounts,
        data: instruction.pack(),
    }
}

/// Creates a gating interface instruction for the given action, without the
/// additional accounts. This is the base instruction the published extra
/// metas resolve against.
pub fn can_permissionless(
    gating_program_id: &Pubkey,
    action: PermissionlessAction,
    caller: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    extra_account_metas: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *gating_program_id,
        accounts: vec![
            AccountMeta::new_readonly(*caller, false),
            AccountMeta::new_readonly(*token_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*extra_account_metas, false),
        ],
        data: action.discriminator().as_slice().to_vec(),
    }
}
