//! State transition types

use {
    crate::{
        account::{AddressConfig, ExtraAccountMeta},
        error::{AccountFetchError, AccountResolutionError, ResolveError},
        pubkey_data::PubkeyData,
        seeds::Seed,
    },
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN},
    },
    spl_discriminator::SplDiscriminate,
    spl_pod::{
        bytemuck::pod_from_bytes,
        primitives::PodU32,
        slice::{PodSlice, PodSliceMut},
    },
    spl_type_length_value::state::{TlvState, TlvStateBorrowed, TlvStateMut},
    std::{future::Future, mem::size_of},
};

/// Result of fetching the data of one account; `None` if it does not exist
pub type AccountDataResult = Result<Option<Vec<u8>>, AccountFetchError>;

/// Stateless helper for storing and resolving the additional accounts
/// required for an instruction.
///
/// Every entry is keyed by the `ArrayDiscriminator` of the instruction it
/// serves, and holds a `PodSlice<ExtraAccountMeta>`.
///
/// Sample usage:
///
/// ```
/// use {
///     solana_program::{instruction::Instruction, pubkey::Pubkey},
///     spl_discriminator::{ArrayDiscriminator, SplDiscriminate},
///     token_acl_tlv_account_resolution::{
///         account::ExtraAccountMeta, state::ExtraAccountMetaList,
///     },
/// };
///
/// struct MyInstruction;
/// impl SplDiscriminate for MyInstruction {
///     const SPL_DISCRIMINATOR: ArrayDiscriminator =
///         ArrayDiscriminator::new([1; ArrayDiscriminator::LENGTH]);
/// }
///
/// let extra_metas = [
///     ExtraAccountMeta::new_with_pubkey(&Pubkey::new_unique(), false, false),
///     ExtraAccountMeta::new_with_pubkey(&Pubkey::new_unique(), false, true),
/// ];
/// let mut buffer = vec![0; ExtraAccountMetaList::size_of(extra_metas.len()).unwrap()];
/// ExtraAccountMetaList::init::<MyInstruction>(&mut buffer, &extra_metas).unwrap();
///
/// let decoded = ExtraAccountMetaList::unpack::<MyInstruction>(&buffer).unwrap();
/// assert_eq!(decoded, extra_metas);
/// ```
pub struct ExtraAccountMetaList;
impl ExtraAccountMetaList {
    /// Get the byte size required to hold `num_items` items
    pub fn size_of(num_items: usize) -> Result<usize, AccountResolutionError> {
        Ok(TlvStateBorrowed::get_base_len()
            .saturating_add(PodSlice::<ExtraAccountMeta>::size_of(num_items)?))
    }

    /// Write a TLV entry for the given instruction into the first free slot
    /// of `data`
    pub fn init<T: SplDiscriminate>(
        data: &mut [u8],
        extra_account_metas: &[ExtraAccountMeta],
    ) -> Result<(), AccountResolutionError> {
        let mut state = TlvStateMut::unpack(data)?;
        let tlv_size = PodSlice::<ExtraAccountMeta>::size_of(extra_account_metas.len())?;
        let (bytes, _) = state.alloc::<T>(tlv_size, false)?;
        let mut extra_account_metas_slice = PodSliceMut::init(bytes)?;
        for meta in extra_account_metas {
            extra_account_metas_slice.push(*meta)?;
        }
        Ok(())
    }

    /// Encode a standalone buffer holding only the entry for `T`
    pub fn pack<T: SplDiscriminate>(
        extra_account_metas: &[ExtraAccountMeta],
    ) -> Result<Vec<u8>, AccountResolutionError> {
        let mut data = vec![0; Self::size_of(extra_account_metas.len())?];
        Self::init::<T>(&mut data, extra_account_metas)?;
        Ok(data)
    }

    /// Decode the extra account metas stored for the given instruction, in
    /// the order they were written.
    ///
    /// Zeroed space after the last entry is free space, however short.
    pub fn unpack<T: SplDiscriminate>(
        data: &[u8],
    ) -> Result<Vec<ExtraAccountMeta>, AccountResolutionError> {
        let state = TlvStateBorrowed::unpack(data)?;
        if !state.get_discriminators()?.contains(&T::SPL_DISCRIMINATOR) {
            return Err(AccountResolutionError::TlvTypeNotFound);
        }
        let bytes = state.get_first_bytes::<T>()?;
        let extra_account_metas = PodSlice::<ExtraAccountMeta>::unpack(bytes)?;
        // the stored count may not run past the allocated entry
        let (length, items) = bytes.split_at(size_of::<PodU32>());
        let count = u32::from(*pod_from_bytes::<PodU32>(length)?) as usize;
        if count > items.len() / size_of::<ExtraAccountMeta>() {
            return Err(AccountResolutionError::InvalidTlv);
        }
        Ok(extra_account_metas.data().to_vec())
    }

    /// Check that every entry only references accounts that precede it, so
    /// that a single left-to-right pass resolves the whole list
    pub fn check_references(
        base_len: usize,
        extra_account_metas: &[ExtraAccountMeta],
    ) -> Result<(), AccountResolutionError> {
        for (entry, meta) in extra_account_metas.iter().enumerate() {
            let available = base_len + entry;
            if let Some(index) = meta
                .address_config()?
                .account_indices()
                .into_iter()
                .find(|index| *index as usize >= available)
            {
                return Err(AccountResolutionError::ForwardReference { entry, index });
            }
        }
        Ok(())
    }

    /// Resolve the extra account metas stored for `T` against `instruction`.
    ///
    /// The pool of accounts starts as the instruction's own accounts and grows
    /// by one with every resolved entry, so later entries may reference
    /// earlier ones. Returns only the resolved extras, in list order.
    pub async fn resolve<T, F, Fut>(
        instruction: &Instruction,
        fetch_account_data_fn: F,
        data: &[u8],
    ) -> Result<Vec<AccountMeta>, ResolveError>
    where
        T: SplDiscriminate,
        F: Fn(Pubkey) -> Fut,
        Fut: Future<Output = AccountDataResult>,
    {
        let extra_account_metas = Self::unpack::<T>(data)?;
        let base_len = instruction.accounts.len();
        Self::check_references(base_len, &extra_account_metas)?;

        let mut accounts = instruction.accounts.clone();
        for extra_meta in &extra_account_metas {
            let pubkey = match extra_meta.address_config()? {
                AddressConfig::Pubkey(pubkey) => pubkey,
                AddressConfig::Seeds {
                    program_index,
                    seeds,
                } => {
                    let program_id = match program_index {
                        None => instruction.program_id,
                        Some(index) => account_at(&accounts, index)?.pubkey,
                    };
                    let seeds = resolve_seeds(
                        &seeds,
                        &instruction.data,
                        &accounts,
                        &fetch_account_data_fn,
                    )
                    .await?;
                    derive_address(&seeds, &program_id)?
                }
                AddressConfig::PubkeyData(pubkey_data) => {
                    resolve_pubkey_data(
                        &pubkey_data,
                        &instruction.data,
                        &accounts,
                        &fetch_account_data_fn,
                    )
                    .await?
                }
            };
            accounts.push(AccountMeta {
                pubkey,
                is_signer: extra_meta.is_signer.into(),
                is_writable: extra_meta.is_writable.into(),
            });
        }
        Ok(accounts.split_off(base_len))
    }

    /// Add the resolved extra account metas to an existing instruction
    pub async fn add_to_instruction<T, F, Fut>(
        instruction: &mut Instruction,
        fetch_account_data_fn: F,
        data: &[u8],
    ) -> Result<(), ResolveError>
    where
        T: SplDiscriminate,
        F: Fn(Pubkey) -> Fut,
        Fut: Future<Output = AccountDataResult>,
    {
        let extras = Self::resolve::<T, F, Fut>(instruction, fetch_account_data_fn, data).await?;
        instruction.accounts.extend(extras);
        Ok(())
    }
}

fn account_at(accounts: &[AccountMeta], index: u8) -> Result<&AccountMeta, AccountResolutionError> {
    // unreachable after `check_references`, kept so a bad index can never
    // turn into a wrong address
    accounts
        .get(index as usize)
        .ok_or(AccountResolutionError::ForwardReference {
            entry: accounts.len(),
            index,
        })
}

fn data_slice(data: &[u8], start: u8, length: usize) -> Option<&[u8]> {
    let start = start as usize;
    data.get(start..start.checked_add(length)?)
}

async fn fetch_account_data<F, Fut>(
    pubkey: Pubkey,
    fetch_account_data_fn: &F,
) -> Result<Vec<u8>, ResolveError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    fetch_account_data_fn(pubkey)
        .await
        .map_err(ResolveError::Fetch)?
        .ok_or_else(|| AccountResolutionError::AccountDataNotFound(pubkey).into())
}

async fn resolve_seeds<F, Fut>(
    seeds: &[Seed],
    instruction_data: &[u8],
    accounts: &[AccountMeta],
    fetch_account_data_fn: &F,
) -> Result<Vec<Vec<u8>>, ResolveError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    let mut resolved = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let bytes = match seed {
            Seed::Literal { bytes } => bytes.clone(),
            Seed::InstructionData { index, length } => {
                data_slice(instruction_data, *index, *length as usize)
                    .ok_or(AccountResolutionError::InstructionDataTooSmall)?
                    .to_vec()
            }
            Seed::AccountKey { index } => account_at(accounts, *index)?.pubkey.to_bytes().to_vec(),
            Seed::AccountData {
                account_index,
                data_index,
                length,
            } => {
                let pubkey = account_at(accounts, *account_index)?.pubkey;
                let account_data = fetch_account_data(pubkey, fetch_account_data_fn).await?;
                data_slice(&account_data, *data_index, *length as usize)
                    .ok_or(AccountResolutionError::AccountDataTooSmall)?
                    .to_vec()
            }
        };
        resolved.push(bytes);
    }
    Ok(resolved)
}

async fn resolve_pubkey_data<F, Fut>(
    pubkey_data: &PubkeyData,
    instruction_data: &[u8],
    accounts: &[AccountMeta],
    fetch_account_data_fn: &F,
) -> Result<Pubkey, ResolveError>
where
    F: Fn(Pubkey) -> Fut,
    Fut: Future<Output = AccountDataResult>,
{
    let bytes = match pubkey_data {
        PubkeyData::InstructionData { index } => data_slice(instruction_data, *index, 32)
            .ok_or(AccountResolutionError::InstructionDataTooSmall)?
            .to_vec(),
        PubkeyData::AccountData {
            account_index,
            data_index,
        } => {
            let pubkey = account_at(accounts, *account_index)?.pubkey;
            let account_data = fetch_account_data(pubkey, fetch_account_data_fn).await?;
            data_slice(&account_data, *data_index, 32)
                .ok_or(AccountResolutionError::AccountDataTooSmall)?
                .to_vec()
        }
    };
    Pubkey::try_from(bytes.as_slice())
        .map_err(|_| AccountResolutionError::InvalidPubkeyDataConfig.into())
}

fn derive_address(
    seeds: &[Vec<u8>],
    program_id: &Pubkey,
) -> Result<Pubkey, AccountResolutionError> {
    // one slot is reserved for the bump seed
    if seeds.len() >= MAX_SEEDS || seeds.iter().any(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(AccountResolutionError::InvalidSeeds);
    }
    let seeds = seeds.iter().map(Vec::as_slice).collect::<Vec<_>>();
    Pubkey::try_find_program_address(&seeds, program_id)
        .map(|(address, _)| address)
        .ok_or(AccountResolutionError::InvalidSeeds)
}
