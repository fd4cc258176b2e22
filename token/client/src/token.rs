use {
    crate::{
        client::{ProgramClient, ProgramClientResult, SendTransaction},
        compose::{build_transaction, compose, MintDescriptor, PlanInstruction},
        config::ProgramIds,
        error::{ProtocolError, TokenError, TokenResult},
        extension::ExtensionSpec,
    },
    allow_block_list_interface::{
        extra_metas::check_list_capacity,
        get_list_config_address, get_wallet_entry_address,
        instruction as list_instruction,
        state::{ListConfig, Mode, WalletEntry},
    },
    futures::{future::BoxFuture, FutureExt, TryFutureExt},
    solana_sdk::{instruction::Instruction, pubkey::Pubkey, transaction::Transaction},
    std::{fmt, sync::Arc},
    token_acl_interface::{
        get_freeze_extra_account_metas_address, get_mint_config_address,
        get_thaw_extra_account_metas_address,
        instruction as acl_instruction,
        offchain::{create_permissionless_instruction, fetch_mint_config, resolve_gating_program},
        state::MintConfig,
        PermissionlessAction,
    },
};

/// Handle on one mint: builds the unsigned transactions that create and
/// administer it, paid for by `payer`. Nothing is signed or sent.
pub struct Token<T> {
    client: Arc<dyn ProgramClient<T>>,
    program_ids: ProgramIds,
    pubkey: Pubkey,
    payer: Pubkey,
}

impl<T> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("pubkey", &self.pubkey)
            .field("payer", &self.payer)
            .field("program_ids", &self.program_ids)
            .finish()
    }
}

impl<T> Token<T>
where
    T: SendTransaction,
{
    pub fn new(
        client: Arc<dyn ProgramClient<T>>,
        program_ids: ProgramIds,
        address: &Pubkey,
        payer: &Pubkey,
    ) -> Self {
        Token {
            client,
            program_ids,
            pubkey: *address,
            payer: *payer,
        }
    }

    /// Get token address.
    pub fn get_address(&self) -> &Pubkey {
        &self.pubkey
    }

    pub fn program_ids(&self) -> &ProgramIds {
        &self.program_ids
    }

    pub fn with_payer(&self, payer: &Pubkey) -> Token<T> {
        Token {
            client: Arc::clone(&self.client),
            program_ids: self.program_ids,
            pubkey: self.pubkey,
            payer: *payer,
        }
    }

    /// Address of the mint's Token ACL config
    pub fn get_mint_config_address(&self) -> Pubkey {
        get_mint_config_address(&self.pubkey, &self.program_ids.token_acl_program)
    }

    /// Address of the allow/block list `authority` keeps for this mint
    pub fn get_list_config_address(&self, authority: &Pubkey) -> Pubkey {
        get_list_config_address(
            authority,
            &self.pubkey,
            &self.program_ids.access_list_program,
        )
    }

    fn fetch_account_data(
        &self,
        address: Pubkey,
    ) -> BoxFuture<'_, ProgramClientResult<Option<Vec<u8>>>> {
        self.client
            .get_account(address)
            .map_ok(|account| account.map(|account| account.data))
            .boxed()
    }

    /// Wrap instructions in an unsigned transaction with a fresh blockhash
    pub async fn build_transaction(
        &self,
        instructions: &[Instruction],
    ) -> TokenResult<Transaction> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(TokenError::Client)?;
        let instructions = instructions
            .iter()
            .map(|instruction| PlanInstruction {
                kind: None,
                instruction: instruction.clone(),
            })
            .collect::<Vec<_>>();
        build_transaction(&instructions, &self.payer, blockhash)
    }

    /// Create and initialize the mint with the given extensions.
    pub async fn create_mint(
        &self,
        mint_authority: &Pubkey,
        freeze_authority: Option<&Pubkey>,
        decimals: u8,
        extensions: Vec<ExtensionSpec>,
    ) -> TokenResult<Transaction> {
        let descriptor = MintDescriptor {
            mint: self.pubkey,
            decimals,
            mint_authority: *mint_authority,
            freeze_authority: freeze_authority.copied(),
            extensions,
        };
        compose(
            self.client.as_ref(),
            &self.program_ids.token_program,
            &self.payer,
            &descriptor,
        )
        .await
    }

    /// Hand the mint's freeze authority to Token ACL, optionally naming a
    /// gating program
    pub async fn create_mint_config(
        &self,
        authority: &Pubkey,
        gating_program: Option<&Pubkey>,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::create_config(
            &self.program_ids.token_acl_program,
            &self.payer,
            authority,
            &self.pubkey,
            &self.get_mint_config_address(),
            &self.program_ids.token_program,
            gating_program,
        )])
        .await
    }

    /// Assign a new authority to the mint config.
    pub async fn set_mint_config_authority(
        &self,
        authority: &Pubkey,
        new_authority: &Pubkey,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::set_authority(
            &self.program_ids.token_acl_program,
            authority,
            &self.get_mint_config_address(),
            new_authority,
        )])
        .await
    }

    /// Set, replace or, with `None`, unset the gating program. Extra metas
    /// published by a previous gating program are left in place.
    pub async fn set_gating_program(
        &self,
        authority: &Pubkey,
        gating_program: Option<&Pubkey>,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::set_gating_program(
            &self.program_ids.token_acl_program,
            authority,
            &self.get_mint_config_address(),
            gating_program,
        )])
        .await
    }

    pub async fn toggle_permissionless_instructions(
        &self,
        authority: &Pubkey,
        freeze_enabled: bool,
        thaw_enabled: bool,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::toggle_permissionless_instructions(
            &self.program_ids.token_acl_program,
            authority,
            &self.get_mint_config_address(),
            freeze_enabled,
            thaw_enabled,
        )])
        .await
    }

    /// Freeze a token account
    pub async fn freeze_account(
        &self,
        account: &Pubkey,
        authority: &Pubkey,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::freeze(
            &self.program_ids.token_acl_program,
            authority,
            &self.pubkey,
            account,
            &self.get_mint_config_address(),
            &self.program_ids.token_program,
        )])
        .await
    }

    /// Thaw / unfreeze a token account
    pub async fn thaw_account(
        &self,
        account: &Pubkey,
        authority: &Pubkey,
    ) -> TokenResult<Transaction> {
        self.build_transaction(&[acl_instruction::thaw(
            &self.program_ids.token_acl_program,
            authority,
            &self.pubkey,
            account,
            &self.get_mint_config_address(),
            &self.program_ids.token_program,
        )])
        .await
    }

    /// Build a permissionless thaw or freeze, resolving the accounts the
    /// mint's gating program published for the action
    pub async fn permissionless_instruction(
        &self,
        action: PermissionlessAction,
        caller: &Pubkey,
        account: &Pubkey,
        owner: &Pubkey,
    ) -> TokenResult<Instruction> {
        create_permissionless_instruction(
            &self.program_ids.token_acl_program,
            action,
            caller,
            account,
            &self.pubkey,
            owner,
            &self.program_ids.token_program,
            |address| self.fetch_account_data(address),
        )
        .await
        .map_err(TokenError::from)
    }

    /// Thaw a token account through the mint's gating program
    pub async fn thaw_permissionless(
        &self,
        caller: &Pubkey,
        account: &Pubkey,
        owner: &Pubkey,
    ) -> TokenResult<Transaction> {
        let instruction = self
            .permissionless_instruction(PermissionlessAction::Thaw, caller, account, owner)
            .await?;
        self.build_transaction(&[instruction]).await
    }

    /// Freeze a token account through the mint's gating program
    pub async fn freeze_permissionless(
        &self,
        caller: &Pubkey,
        account: &Pubkey,
        owner: &Pubkey,
    ) -> TokenResult<Transaction> {
        let instruction = self
            .permissionless_instruction(PermissionlessAction::Freeze, caller, account, owner)
            .await?;
        self.build_transaction(&[instruction]).await
    }

    /// Create an allow/block list seeded by this mint
    pub async fn create_list(&self, authority: &Pubkey, mode: Mode) -> TokenResult<Transaction> {
        self.build_transaction(&[list_instruction::create_list(
            &self.program_ids.access_list_program,
            authority,
            &self.get_list_config_address(authority),
            mode,
            &self.pubkey,
        )])
        .await
    }

    pub async fn delete_list(&self, authority: &Pubkey) -> TokenResult<Transaction> {
        self.build_transaction(&[list_instruction::delete_list(
            &self.program_ids.access_list_program,
            authority,
            &self.get_list_config_address(authority),
        )])
        .await
    }

    pub async fn add_wallet(
        &self,
        authority: &Pubkey,
        wallet: &Pubkey,
    ) -> TokenResult<Transaction> {
        let list_config = self.get_list_config_address(authority);
        self.build_transaction(&[list_instruction::add_wallet(
            &self.program_ids.access_list_program,
            authority,
            &list_config,
            wallet,
            &get_wallet_entry_address(&list_config, wallet, &self.program_ids.access_list_program),
        )])
        .await
    }

    pub async fn remove_wallet(
        &self,
        authority: &Pubkey,
        wallet: &Pubkey,
    ) -> TokenResult<Transaction> {
        let list_config = self.get_list_config_address(authority);
        self.build_transaction(&[list_instruction::remove_wallet(
            &self.program_ids.access_list_program,
            authority,
            &list_config,
            &get_wallet_entry_address(&list_config, wallet, &self.program_ids.access_list_program),
        )])
        .await
    }

    /// Publish the thaw and freeze extra metas checking the given lists
    pub async fn setup_extra_metas(
        &self,
        authority: &Pubkey,
        list_configs: &[Pubkey],
    ) -> TokenResult<Transaction> {
        check_list_capacity(list_configs.len())?;
        let gating_program = &self.program_ids.access_list_program;
        self.build_transaction(&[list_instruction::setup_extra_metas(
            gating_program,
            authority,
            &self.get_mint_config_address(),
            &self.pubkey,
            &get_thaw_extra_account_metas_address(&self.pubkey, gating_program),
            &get_freeze_extra_account_metas_address(&self.pubkey, gating_program),
            list_configs,
        )])
        .await
    }

    /// Retrieve the mint's Token ACL config, if it has one
    pub async fn get_mint_config(&self) -> TokenResult<Option<MintConfig>> {
        fetch_mint_config(
            &self.program_ids.token_acl_program,
            &self.pubkey,
            |address| self.fetch_account_data(address),
        )
        .await
        .map_err(Into::into)
    }

    /// Gating program governing permissionless actions, if any
    pub async fn get_gating_program(&self) -> TokenResult<Option<Pubkey>> {
        resolve_gating_program(
            &self.program_ids.token_acl_program,
            &self.pubkey,
            |address| self.fetch_account_data(address),
        )
        .await
        .map_err(Into::into)
    }

    /// Retrieve the list `authority` keeps for this mint, if it exists
    pub async fn get_list_config(&self, authority: &Pubkey) -> TokenResult<Option<ListConfig>> {
        let address = self.get_list_config_address(authority);
        let Some(account) = self
            .client
            .get_account(address)
            .await
            .map_err(TokenError::Client)?
        else {
            return Ok(None);
        };
        if account.owner != self.program_ids.access_list_program {
            return Err(ProtocolError::AccountInvalidOwner(address).into());
        }
        Ok(Some(*ListConfig::unpack(&account.data)?))
    }

    /// Whether `wallet` has an entry in `list_config`
    pub async fn is_wallet_listed(
        &self,
        list_config: &Pubkey,
        wallet: &Pubkey,
    ) -> TokenResult<bool> {
        let address =
            get_wallet_entry_address(list_config, wallet, &self.program_ids.access_list_program);
        let Some(account) = self
            .client
            .get_account(address)
            .await
            .map_err(TokenError::Client)?
        else {
            return Ok(false);
        };
        if account.owner != self.program_ids.access_list_program {
            return Err(ProtocolError::AccountInvalidOwner(address).into());
        }
        let entry = WalletEntry::unpack(&account.data)?;
        Ok(entry.wallet == *wallet && entry.list_config == *list_config)
    }
}
