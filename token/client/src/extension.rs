//! Extension specs: the configuration a caller supplies for each extension of
//! a new mint

pub use spl_token_2022::state::AccountState;
use {
    crate::error::ValidationError,
    solana_sdk::pubkey::Pubkey,
    spl_token_2022::extension::ExtensionType,
    std::{collections::HashSet, fmt},
};

/// Maximum token name length, in bytes
pub const MAX_NAME_LEN: usize = 32;
/// Maximum token symbol length, in bytes
pub const MAX_SYMBOL_LEN: usize = 10;
/// Maximum metadata uri length, in bytes
pub const MAX_URI_LEN: usize = 200;
/// Maximum decimals of a mint
pub const MAX_DECIMALS: u8 = 9;
/// Maximum transfer fee, in basis points
pub const MAX_FEE_BASIS_POINTS: u16 = 10_000;

const RESERVED_METADATA_KEYS: [&str; 3] = ["name", "symbol", "uri"];

/// Supported mint extension kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionKind {
    TransferFeeConfig,
    MintCloseAuthority,
    ConfidentialTransferMint,
    DefaultAccountState,
    NonTransferable,
    InterestBearingConfig,
    PermanentDelegate,
    TransferHook,
    MetadataPointer,
    GroupPointer,
    ScaledUiAmount,
    Pausable,
    TokenMetadata,
}
impl ExtensionKind {
    /// Token-2022 extension written by this kind
    pub fn extension_type(&self) -> ExtensionType {
        match self {
            Self::TransferFeeConfig => ExtensionType::TransferFeeConfig,
            Self::MintCloseAuthority => ExtensionType::MintCloseAuthority,
            Self::ConfidentialTransferMint => ExtensionType::ConfidentialTransferMint,
            Self::DefaultAccountState => ExtensionType::DefaultAccountState,
            Self::NonTransferable => ExtensionType::NonTransferable,
            Self::InterestBearingConfig => ExtensionType::InterestBearingConfig,
            Self::PermanentDelegate => ExtensionType::PermanentDelegate,
            Self::TransferHook => ExtensionType::TransferHook,
            Self::MetadataPointer => ExtensionType::MetadataPointer,
            Self::GroupPointer => ExtensionType::GroupPointer,
            Self::ScaledUiAmount => ExtensionType::ScaledUiAmount,
            Self::Pausable => ExtensionType::Pausable,
            Self::TokenMetadata => ExtensionType::TokenMetadata,
        }
    }
}
impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TransferFeeConfig => "transfer-fee-config",
            Self::MintCloseAuthority => "mint-close-authority",
            Self::ConfidentialTransferMint => "confidential-transfer-mint",
            Self::DefaultAccountState => "default-account-state",
            Self::NonTransferable => "non-transferable",
            Self::InterestBearingConfig => "interest-bearing-config",
            Self::PermanentDelegate => "permanent-delegate",
            Self::TransferHook => "transfer-hook",
            Self::MetadataPointer => "metadata-pointer",
            Self::GroupPointer => "group-pointer",
            Self::ScaledUiAmount => "scaled-ui-amount",
            Self::Pausable => "pausable",
            Self::TokenMetadata => "token-metadata",
        })
    }
}

/// Token metadata stored in the mint itself
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenMetadataSpec {
    /// Authority allowed to update the metadata
    pub update_authority: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Additional key/value pairs, written in order
    pub additional_metadata: Vec<(String, String)>,
}

/// Configuration of one extension of a new mint
#[derive(Clone, Debug, PartialEq)]
pub enum ExtensionSpec {
    TransferFeeConfig {
        transfer_fee_config_authority: Option<Pubkey>,
        withdraw_withheld_authority: Option<Pubkey>,
        transfer_fee_basis_points: u16,
        maximum_fee: u64,
    },
    MintCloseAuthority {
        close_authority: Option<Pubkey>,
    },
    /// Confidential balances
    ConfidentialTransferMint {
        authority: Option<Pubkey>,
        auto_approve_new_accounts: bool,
        /// ElGamal public key of the auditor
        auditor_elgamal_pubkey: Option<[u8; 32]>,
    },
    DefaultAccountState {
        /// `Initialized` or `Frozen`
        state: AccountState,
    },
    NonTransferable,
    InterestBearingConfig {
        rate_authority: Option<Pubkey>,
        /// Rate in basis points
        rate: i16,
    },
    PermanentDelegate {
        delegate: Pubkey,
    },
    TransferHook {
        authority: Option<Pubkey>,
        program_id: Option<Pubkey>,
    },
    MetadataPointer {
        authority: Option<Pubkey>,
        metadata_address: Option<Pubkey>,
    },
    GroupPointer {
        authority: Option<Pubkey>,
        group_address: Option<Pubkey>,
    },
    ScaledUiAmount {
        authority: Option<Pubkey>,
        multiplier: f64,
    },
    Pausable {
        authority: Pubkey,
    },
    TokenMetadata(TokenMetadataSpec),
}

impl ExtensionSpec {
    /// Get the extension kind configured by the spec
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Self::TransferFeeConfig { .. } => ExtensionKind::TransferFeeConfig,
            Self::MintCloseAuthority { .. } => ExtensionKind::MintCloseAuthority,
            Self::ConfidentialTransferMint { .. } => ExtensionKind::ConfidentialTransferMint,
            Self::DefaultAccountState { .. } => ExtensionKind::DefaultAccountState,
            Self::NonTransferable => ExtensionKind::NonTransferable,
            Self::InterestBearingConfig { .. } => ExtensionKind::InterestBearingConfig,
            Self::PermanentDelegate { .. } => ExtensionKind::PermanentDelegate,
            Self::TransferHook { .. } => ExtensionKind::TransferHook,
            Self::MetadataPointer { .. } => ExtensionKind::MetadataPointer,
            Self::GroupPointer { .. } => ExtensionKind::GroupPointer,
            Self::ScaledUiAmount { .. } => ExtensionKind::ScaledUiAmount,
            Self::Pausable { .. } => ExtensionKind::Pausable,
            Self::TokenMetadata(_) => ExtensionKind::TokenMetadata,
        }
    }

    /// Check the spec's own fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.kind();
        match self {
            Self::TransferFeeConfig {
                transfer_fee_basis_points,
                ..
            } if *transfer_fee_basis_points > MAX_FEE_BASIS_POINTS => {
                Err(ValidationError::InvalidField {
                    kind,
                    field: "transfer_fee_basis_points",
                    reason: "exceeds 10000 basis points",
                })
            }
            Self::ScaledUiAmount { multiplier, .. }
                if !(multiplier.is_normal() && *multiplier > 0.0) =>
            {
                Err(ValidationError::InvalidField {
                    kind,
                    field: "multiplier",
                    reason: "must be a finite number greater than zero",
                })
            }
            Self::DefaultAccountState {
                state: AccountState::Uninitialized,
            } => Err(ValidationError::InvalidField {
                kind,
                field: "state",
                reason: "must be initialized or frozen",
            }),
            Self::TokenMetadata(metadata) => validate_metadata(metadata),
            _ => Ok(()),
        }
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::FieldTooLong {
            kind: ExtensionKind::TokenMetadata,
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

fn validate_metadata(metadata: &TokenMetadataSpec) -> Result<(), ValidationError> {
    check_len("name", &metadata.name, MAX_NAME_LEN)?;
    check_len("symbol", &metadata.symbol, MAX_SYMBOL_LEN)?;
    check_len("uri", &metadata.uri, MAX_URI_LEN)?;
    let invalid_key = |reason| ValidationError::InvalidField {
        kind: ExtensionKind::TokenMetadata,
        field: "additional_metadata",
        reason,
    };
    let mut keys = HashSet::new();
    for (key, _) in &metadata.additional_metadata {
        if key.is_empty() {
            return Err(invalid_key("has an empty key"));
        }
        if RESERVED_METADATA_KEYS.contains(&key.as_str()) {
            return Err(invalid_key("uses a reserved key"));
        }
        if !keys.insert(key.as_str()) {
            return Err(invalid_key("repeats a key"));
        }
    }
    Ok(())
}

/// Validate a whole mint request before anything is built
pub fn validate_specs(decimals: u8, specs: &[ExtensionSpec]) -> Result<(), ValidationError> {
    if decimals > MAX_DECIMALS {
        return Err(ValidationError::InvalidDecimals(decimals));
    }
    let mut kinds = HashSet::new();
    for spec in specs {
        if !kinds.insert(spec.kind()) {
            return Err(ValidationError::DuplicateExtension(spec.kind()));
        }
        spec.validate()?;
    }
    Ok(())
}
