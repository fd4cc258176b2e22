use {
    async_trait::async_trait,
    futures::future::BoxFuture,
    log::{debug, trace},
    solana_rpc_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{
        account::Account, hash::Hash, pubkey::Pubkey, rent::Rent, signature::Signature,
        transaction::Transaction,
    },
    std::{collections::HashMap, fmt, sync::Arc},
};

/// Basic trait for sending transactions to validators
pub trait SendTransaction {
    type Output;
}

pub type ProgramClientError = Box<dyn std::error::Error + Send + Sync>;
pub type ProgramClientResult<T> = Result<T, ProgramClientError>;

/// Generic client interface for programs.
#[async_trait]
pub trait ProgramClient<ST>
where
    ST: SendTransaction,
{
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> ProgramClientResult<u64>;

    async fn get_latest_blockhash(&self) -> ProgramClientResult<Hash>;

    async fn send_transaction(&self, transaction: &Transaction) -> ProgramClientResult<ST::Output>;

    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>>;
}

/// Extend basic `SendTransaction` trait with function `send` where client is
/// `&RpcClient`. Required for `ProgramRpcClient`.
pub trait SendTransactionRpc: SendTransaction {
    fn send<'a>(
        &self,
        client: &'a RpcClient,
        transaction: &'a Transaction,
    ) -> BoxFuture<'a, ProgramClientResult<Self::Output>>;
}

/// Outcome of handing a transaction to a client: the signature of a
/// confirmed transaction, or the transaction itself when offline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcClientResponse {
    Signature(Signature),
    Transaction(Transaction),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramRpcClientSendTransaction;

impl SendTransaction for ProgramRpcClientSendTransaction {
    type Output = RpcClientResponse;
}

impl SendTransactionRpc for ProgramRpcClientSendTransaction {
    fn send<'a>(
        &self,
        client: &'a RpcClient,
        transaction: &'a Transaction,
    ) -> BoxFuture<'a, ProgramClientResult<Self::Output>> {
        Box::pin(async move {
            if !transaction.is_signed() {
                return Err("Cannot send transaction: not fully signed".into());
            }
            client
                .send_and_confirm_transaction(transaction)
                .await
                .map(RpcClientResponse::Signature)
                .map_err(Into::into)
        })
    }
}

/// Program client for the JSON RPC interface.
pub struct ProgramRpcClient<ST> {
    client: Arc<RpcClient>,
    send: ST,
}

impl<ST> fmt::Debug for ProgramRpcClient<ST> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRpcClient")
            .field("url", &self.client.url())
            .finish()
    }
}

impl<ST> ProgramRpcClient<ST> {
    pub fn new(client: Arc<RpcClient>, send: ST) -> Self {
        Self { client, send }
    }
}

#[async_trait]
impl<ST> ProgramClient<ST> for ProgramRpcClient<ST>
where
    ST: SendTransactionRpc + Send + Sync,
{
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> ProgramClientResult<u64> {
        let lamports = self
            .client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?;
        trace!("rent exemption for {} bytes: {} lamports", data_len, lamports);
        Ok(lamports)
    }

    async fn get_latest_blockhash(&self) -> ProgramClientResult<Hash> {
        let blockhash = self.client.get_latest_blockhash().await?;
        trace!("latest blockhash: {}", blockhash);
        Ok(blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ProgramClientResult<ST::Output> {
        debug!(
            "sending transaction with {} instructions",
            transaction.message.instructions.len()
        );
        self.send.send(&self.client, transaction).await
    }

    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>> {
        let account = self
            .client
            .get_account_with_commitment(&address, self.client.commitment())
            .await?
            .value;
        debug!(
            "fetched account {}: {}",
            address,
            match &account {
                Some(account) => format!("{} bytes owned by {}", account.data.len(), account.owner),
                None => "not found".to_string(),
            }
        );
        Ok(account)
    }
}

/// Program client that never touches the network: accounts are served from
/// memory, rent follows the default schedule, the blockhash is fixed and
/// "sending" hands the transaction back.
pub struct ProgramOfflineClient<ST> {
    blockhash: Hash,
    rent: Rent,
    accounts: HashMap<Pubkey, Account>,
    _send: ST,
}

impl<ST> fmt::Debug for ProgramOfflineClient<ST> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramOfflineClient")
            .field("blockhash", &self.blockhash)
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

impl<ST> ProgramOfflineClient<ST> {
    pub fn new(blockhash: Hash, send: ST) -> Self {
        Self {
            blockhash,
            rent: Rent::default(),
            accounts: HashMap::new(),
            _send: send,
        }
    }

    /// Serve `account` at `address`
    pub fn with_account(mut self, address: Pubkey, account: Account) -> Self {
        self.accounts.insert(address, account);
        self
    }

    /// Store or replace an account
    pub fn set_account(&mut self, address: Pubkey, account: Account) {
        self.accounts.insert(address, account);
    }
}

#[async_trait]
impl<ST> ProgramClient<ST> for ProgramOfflineClient<ST>
where
    ST: SendTransaction<Output = RpcClientResponse> + Send + Sync,
{
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> ProgramClientResult<u64> {
        Ok(self.rent.minimum_balance(data_len))
    }

    async fn get_latest_blockhash(&self) -> ProgramClientResult<Hash> {
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ProgramClientResult<ST::Output> {
        Ok(RpcClientResponse::Transaction(transaction.clone()))
    }

    async fn get_account(&self, address: Pubkey) -> ProgramClientResult<Option<Account>> {
        Ok(self.accounts.get(&address).cloned())
    }
}
