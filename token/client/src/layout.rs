//! Account sizing for mints carrying extensions.
//!
//! A mint without extensions uses the legacy layout. Any extension moves the
//! mint to the extended layout, sized by Token-2022 from the fixed-size
//! extensions it is created with. Token metadata is appended after the base
//! mint is initialized, so it only affects the rent the account is funded
//! with.

use {
    crate::{
        catalog::Phase,
        error::{ProtocolError, TokenResult},
        extension::{validate_specs, ExtensionKind, ExtensionSpec, TokenMetadataSpec},
    },
    solana_sdk::{program_error::ProgramError, program_pack::Pack, rent::Rent},
    spl_pod::optional_keys::OptionalNonZeroPubkey,
    spl_token_2022::{
        extension::{AccountType, ExtensionType, Length},
        state::{Account, Mint},
    },
    spl_token_metadata_interface::state::{Field, TokenMetadata},
    spl_type_length_value::variable_len_pack::VariableLenPack,
    std::{collections::BTreeSet, mem::size_of},
};

/// Type and length prefix of every extension entry in a mint
const EXTENSION_HEADER_LEN: usize = size_of::<ExtensionType>() + size_of::<Length>();

/// Account size for the given extension kinds, ignoring duplicates and order.
/// Kinds written after initialization contribute nothing; they grow the
/// account later.
pub fn mint_len<I: IntoIterator<Item = ExtensionKind>>(kinds: I) -> Result<usize, ProgramError> {
    let kinds = kinds.into_iter().collect::<BTreeSet<_>>();
    if kinds.is_empty() {
        return Ok(Mint::LEN);
    }
    let extension_types = kinds
        .iter()
        .filter(|kind| kind.phase() == Phase::Pre)
        .map(ExtensionKind::extension_type)
        .collect::<Vec<_>>();
    if extension_types.is_empty() {
        // extended layout without any entry yet
        return Ok(Account::LEN + size_of::<AccountType>());
    }
    ExtensionType::try_calculate_account_len::<Mint>(&extension_types)
}

/// Validate the specs and compute the size the mint account is created with
pub fn calculate_mint_len(decimals: u8, specs: &[ExtensionSpec]) -> TokenResult<usize> {
    validate_specs(decimals, specs)?;
    mint_len(specs.iter().map(ExtensionSpec::kind))
        .map_err(|e| ProtocolError::from(e).into())
}

/// Minimum balance keeping an account of `account_len` bytes rent exempt
pub fn minimum_balance(rent: &Rent, account_len: usize) -> u64 {
    rent.minimum_balance(account_len)
}

/// The metadata record as written by the metadata `Initialize` instruction.
/// The mint address does not affect its size.
fn initial_token_metadata(metadata: &TokenMetadataSpec) -> TokenMetadata {
    TokenMetadata {
        update_authority: OptionalNonZeroPubkey(metadata.update_authority),
        name: metadata.name.clone(),
        symbol: metadata.symbol.clone(),
        uri: metadata.uri.clone(),
        ..TokenMetadata::default()
    }
}

/// Bytes the metadata entry occupies right after initialization, before any
/// additional field is written
pub fn base_metadata_tlv_len(metadata: &TokenMetadataSpec) -> Result<usize, ProgramError> {
    Ok(EXTENSION_HEADER_LEN + initial_token_metadata(metadata).get_packed_len()?)
}

/// Bytes each additional field adds to the metadata entry, in write order
pub fn metadata_field_lens(metadata: &TokenMetadataSpec) -> Result<Vec<usize>, ProgramError> {
    let mut token_metadata = initial_token_metadata(metadata);
    let mut len = token_metadata.get_packed_len()?;
    metadata
        .additional_metadata
        .iter()
        .map(|(key, value)| {
            token_metadata.update(Field::Key(key.clone()), value.clone());
            let new_len = token_metadata.get_packed_len()?;
            let growth = new_len.saturating_sub(len);
            len = new_len;
            Ok(growth)
        })
        .collect()
}

/// Bytes the metadata entry occupies once every additional field is written
pub fn metadata_tlv_len(metadata: &TokenMetadataSpec) -> Result<usize, ProgramError> {
    Ok(base_metadata_tlv_len(metadata)? + metadata_field_lens(metadata)?.iter().sum::<usize>())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::{TokenError, ValidationError},
        assert_matches::assert_matches,
        solana_sdk::pubkey::Pubkey,
        test_case::test_case,
    };

    #[test]
    fn test_empty_is_legacy_mint() {
        assert_eq!(mint_len([]), Ok(82));
        assert_eq!(calculate_mint_len(0, &[]).unwrap(), 82);
    }

    #[test_case(&[ExtensionKind::Pausable], 203 ; "pausable")]
    #[test_case(&[ExtensionKind::NonTransferable], 170 ; "zero length payload")]
    #[test_case(&[ExtensionKind::MintCloseAuthority, ExtensionKind::Pausable], 203 + 36 ; "two")]
    #[test_case(&[ExtensionKind::TokenMetadata], 166 ; "variable only")]
    #[test_case(&[ExtensionKind::TokenMetadata, ExtensionKind::MetadataPointer], 234 ; "pointer")]
    fn test_mint_len(kinds: &[ExtensionKind], expected: usize) {
        assert_eq!(mint_len(kinds.iter().copied()), Ok(expected));
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let kinds = [
            ExtensionKind::TransferFeeConfig,
            ExtensionKind::Pausable,
            ExtensionKind::DefaultAccountState,
        ];
        let mut reversed = kinds;
        reversed.reverse();
        assert_eq!(mint_len(kinds), mint_len(reversed));
        assert_eq!(
            mint_len(kinds),
            mint_len(kinds.iter().chain(kinds.iter()).copied())
        );
    }

    #[test]
    fn test_multisig_collision() {
        // 166 + (4 + 65) + (4 + 52) + (4 + 56) + (4 + 0) = 355
        let kinds = [
            ExtensionKind::ConfidentialTransferMint,
            ExtensionKind::InterestBearingConfig,
            ExtensionKind::ScaledUiAmount,
            ExtensionKind::NonTransferable,
        ];
        assert_eq!(mint_len(kinds), Ok(357));
    }

    #[test]
    fn test_all_fixed_extensions() {
        let all = [
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
        ];
        assert_eq!(mint_len(all), Ok(166 + 12 * 4 + 571));
        let with_metadata = all.into_iter().chain([ExtensionKind::TokenMetadata]);
        assert_eq!(mint_len(with_metadata), mint_len(all));
    }

    #[test]
    fn test_calculate_rejects_before_sizing() {
        let specs = [
            ExtensionSpec::NonTransferable,
            ExtensionSpec::NonTransferable,
        ];
        assert_matches!(
            calculate_mint_len(2, &specs),
            Err(TokenError::Validation(ValidationError::DuplicateExtension(
                ExtensionKind::NonTransferable
            )))
        );
    }

    #[test]
    fn test_metadata_len() {
        let metadata = TokenMetadataSpec {
            update_authority: Pubkey::new_unique(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            uri: "https://x/m.json".to_string(),
            additional_metadata: vec![
                ("issuer".to_string(), "circle".to_string()),
                ("color".to_string(), "blue".to_string()),
            ],
        };
        // 4 + 32 + 32 + (4 + 8) + (4 + 4) + (4 + 16) + 4
        assert_eq!(base_metadata_tlv_len(&metadata), Ok(112));
        assert_eq!(metadata_field_lens(&metadata), Ok(vec![4 + 6 + 4 + 6, 4 + 5 + 4 + 4]));
        assert_eq!(metadata_tlv_len(&metadata), Ok(112 + 20 + 17));
    }

    #[test]
    fn test_minimum_balance_grows_with_len() {
        let rent = Rent::default();
        assert!(minimum_balance(&rent, 203) > minimum_balance(&rent, 82));
        assert_eq!(minimum_balance(&rent, 82), rent.minimum_balance(82));
    }
}
