//! Program ids and RPC settings, loaded from a Solana CLI config file

use {
    solana_rpc_client::nonblocking::rpc_client::RpcClient,
    solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey},
    std::{str::FromStr, sync::Arc},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load config file `{path}`: {message}")]
    Load { path: String, message: String },
    #[error("invalid commitment `{0}`")]
    InvalidCommitment(String),
}

/// Programs the client builds instructions for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramIds {
    pub token_program: Pubkey,
    pub token_acl_program: Pubkey,
    pub access_list_program: Pubkey,
}
impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            token_program: spl_token_2022::id(),
            token_acl_program: token_acl_interface::id(),
            access_list_program: allow_block_list_interface::id(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IssuanceConfig {
    pub json_rpc_url: String,
    pub commitment: CommitmentConfig,
    pub program_ids: ProgramIds,
}
impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            json_rpc_url: solana_cli_config::Config::default().json_rpc_url,
            commitment: CommitmentConfig::confirmed(),
            program_ids: ProgramIds::default(),
        }
    }
}

impl IssuanceConfig {
    /// Load settings from `config_file`, or the defaults when no file is given
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let cli_config = match config_file {
            Some(path) => {
                solana_cli_config::Config::load(path).map_err(|e| ConfigError::Load {
                    path: path.to_string(),
                    message: e.to_string(),
                })?
            }
            None => solana_cli_config::Config::default(),
        };
        Self::from_cli_config(&cli_config)
    }

    pub fn from_cli_config(cli_config: &solana_cli_config::Config) -> Result<Self, ConfigError> {
        let commitment = CommitmentConfig::from_str(&cli_config.commitment)
            .map_err(|_| ConfigError::InvalidCommitment(cli_config.commitment.clone()))?;
        Ok(Self {
            json_rpc_url: cli_config.json_rpc_url.clone(),
            commitment,
            program_ids: ProgramIds::default(),
        })
    }

    pub fn with_program_ids(mut self, program_ids: ProgramIds) -> Self {
        self.program_ids = program_ids;
        self
    }

    /// Nonblocking RPC client for the configured endpoint and commitment
    pub fn rpc_client(&self) -> Arc<RpcClient> {
        Arc::new(RpcClient::new_with_commitment(
            self.json_rpc_url.clone(),
            self.commitment,
        ))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, solana_sdk::commitment_config::CommitmentLevel};

    #[test]
    fn test_default_program_ids() {
        let ids = ProgramIds::default();
        assert_eq!(
            ids.token_program.to_string(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
        assert_eq!(ids.token_acl_program, token_acl_interface::id());
        assert_eq!(ids.access_list_program, allow_block_list_interface::id());
    }

    #[test]
    fn test_from_cli_config() {
        let cli_config = solana_cli_config::Config {
            json_rpc_url: "http://127.0.0.1:8899".to_string(),
            commitment: "finalized".to_string(),
            ..solana_cli_config::Config::default()
        };
        let config = IssuanceConfig::from_cli_config(&cli_config).unwrap();
        assert_eq!(config.json_rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.commitment.commitment, CommitmentLevel::Finalized);

        let cli_config = solana_cli_config::Config {
            commitment: "eventually".to_string(),
            ..solana_cli_config::Config::default()
        };
        assert_matches!(
            IssuanceConfig::from_cli_config(&cli_config),
            Err(ConfigError::InvalidCommitment(c)) if c == "eventually"
        );
    }

    #[test]
    fn test_load_missing_file() {
        assert_matches!(
            IssuanceConfig::load(Some("/nonexistent/solana/config.yml")),
            Err(ConfigError::Load { .. })
        );
        assert!(IssuanceConfig::load(None).is_ok());
    }
}
