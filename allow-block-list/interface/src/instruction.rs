//! Instruction types

use {
    crate::{error::AccessListError, state::Mode},
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
};

/// Instructions supported by the allow/block list program.
#[derive(Clone, Debug, PartialEq)]
pub enum AccessListInstruction {
    /// Creates a list config.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Authority, paying for the account
    ///   1. `[w]` List config
    ///   2. `[]` System program
    CreateList {
        /// Mode of the list
        mode: Mode,
        /// Seed of the list, conventionally the governed mint
        seed: Pubkey,
    },
    /// Deletes an empty list config.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Authority, receiving the rent
    ///   1. `[w]` List config
    DeleteList,
    /// Adds a wallet to a list.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Authority, paying for the entry
    ///   1. `[w]` List config
    ///   2. `[]` Wallet
    ///   3. `[w]` Wallet entry
    ///   4. `[]` System program
    AddWallet,
    /// Removes a wallet from a list.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Authority, receiving the rent
    ///   1. `[w]` List config
    ///   2. `[w]` Wallet entry
    RemoveWallet,
    /// Publishes the thaw and freeze extra metas of a mint, referencing each
    /// given list in order.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[w, s]` Authority of the mint config
    ///   1. `[]` Token ACL mint config
    ///   2. `[]` Mint
    ///   3. `[w]` Thaw extra metas account
    ///   4. `[w]` Freeze extra metas account
    ///   5. `[]` System program
    ///   6..6+N `[]` `N` list configs
    SetupExtraMetas,
}

impl AccessListInstruction {
    /// Unpacks a byte buffer into an
    /// [AccessListInstruction](enum.AccessListInstruction.html).
    pub fn unpack(input: &[u8]) -> Result<Self, AccessListError> {
        let (&tag, rest) = input
            .split_first()
            .ok_or(AccessListError::InvalidInstruction)?;
        Ok(match tag {
            0 => {
                let (&mode, seed) = rest
                    .split_first()
                    .ok_or(AccessListError::InvalidInstruction)?;
                let seed = seed
                    .get(..32)
                    .and_then(|bytes| Pubkey::try_from(bytes).ok())
                    .ok_or(AccessListError::InvalidInstruction)?;
                Self::CreateList {
                    mode: Mode::try_from(mode)?,
                    seed,
                }
            }
            1 => Self::DeleteList,
            2 => Self::AddWallet,
            3 => Self::RemoveWallet,
            4 => Self::SetupExtraMetas,
            _ => return Err(AccessListError::InvalidInstruction),
        })
    }

    /// Packs an [AccessListInstruction](enum.AccessListInstruction.html) into
    /// a byte buffer.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![];
        match self {
            Self::CreateList { mode, seed } => {
                buf.push(0);
                buf.push(*mode as u8);
                buf.extend_from_slice(seed.as_ref());
            }
            Self::DeleteList => buf.push(1),
            Self::AddWallet => buf.push(2),
            Self::RemoveWallet => buf.push(3),
            Self::SetupExtraMetas => buf.push(4),
        };
        buf
    }
}

/// Creates a `CreateList` instruction.
pub fn create_list(
    program_id: &Pubkey,
    authority: &Pubkey,
    list_config: &Pubkey,
    mode: Mode,
    seed: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*list_config, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: AccessListInstruction::CreateList { mode, seed: *seed }.pack(),
    }
}

/// Creates a `DeleteList` instruction.
pub fn delete_list(program_id: &Pubkey, authority: &Pubkey, list_config: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*list_config, false),
        ],
        data: AccessListInstruction::DeleteList.pack(),
    }
}

/// Creates an `AddWallet` instruction.
pub fn add_wallet(
    program_id: &Pubkey,
    authority: &Pubkey,
    list_config: &Pubkey,
    wallet: &Pubkey,
    wallet_entry: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*list_config, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new(*wallet_entry, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: AccessListInstruction::AddWallet.pack(),
    }
}

/// Creates a `RemoveWallet` instruction.
pub fn remove_wallet(
    program_id: &Pubkey,
    authority: &Pubkey,
    list_config: &Pubkey,
    wallet_entry: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(*list_config, false),
            AccountMeta::new(*wallet_entry, false),
        ],
        data: AccessListInstruction::RemoveWallet.pack(),
    }
}

/// Creates a `SetupExtraMetas` instruction.
#[allow(clippy::too_many_arguments)]
pub fn setup_extra_metas(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint_config: &Pubkey,
    mint: &Pubkey,
    thaw_extra_account_metas: &Pubkey,
    freeze_extra_account_metas: &Pubkey,
    list_configs: &[Pubkey],
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(*mint_config, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(*thaw_extra_account_metas, false),
        AccountMeta::new(*freeze_extra_account_metas, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    accounts.extend(
        list_configs
            .iter()
            .map(|list_config| AccountMeta::new_readonly(*list_config, false)),
    );
    Instruction {
        program_id: *program_id,
        accounts,
        data: AccessListInstruction::SetupExtraMetas.pack(),
    }
}
