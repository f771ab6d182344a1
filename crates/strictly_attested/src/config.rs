//! Attestation service configuration.
//!
//! Built once at startup from an optional TOML file plus `ATTEST_*`
//! environment variables (environment wins), then passed by reference to
//! whatever needs it.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable for the JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "ATTEST_RPC_URL";
/// Environment variable for the EAS contract address.
pub const ENV_CONTRACT_ADDRESS: &str = "ATTEST_CONTRACT_ADDRESS";
/// Environment variable for the schema UID.
pub const ENV_SCHEMA_UID: &str = "ATTEST_SCHEMA_UID";
/// Environment variable for the signing key.
pub const ENV_PRIVATE_KEY: &str = "ATTEST_PRIVATE_KEY";
/// Environment variable for the chain id.
pub const ENV_CHAIN_ID: &str = "ATTEST_CHAIN_ID";
/// Environment variable for the confirmation count.
pub const ENV_CONFIRMATIONS: &str = "ATTEST_CONFIRMATIONS";
/// Environment variable for the per-call timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "ATTEST_TIMEOUT_SECS";
/// Environment variable for the player's address.
pub const ENV_PLAYER_ADDRESS: &str = "ATTEST_PLAYER_ADDRESS";

#[instrument]
fn default_confirmations() -> usize {
    1
}

#[instrument]
fn default_timeout_secs() -> u64 {
    120
}

/// Raw file contents; every key optional so the environment can fill gaps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rpc_url: Option<String>,
    contract_address: Option<String>,
    schema_uid: Option<String>,
    private_key: Option<String>,
    chain_id: Option<u64>,
    confirmations: Option<usize>,
    timeout_secs: Option<u64>,
    player_address: Option<String>,
}

/// Resolved configuration for the attestation service.
#[derive(Clone, Getters, Serialize)]
pub struct AttestConfig {
    /// JSON-RPC endpoint.
    rpc_url: String,

    /// EAS contract address.
    contract_address: String,

    /// Schema UID the moves are attested against.
    schema_uid: String,

    /// Hex signing key.
    #[serde(skip)]
    private_key: String,

    /// Chain id; fetched from the endpoint when absent.
    chain_id: Option<u64>,

    /// Blocks to wait for before a move counts as attested.
    confirmations: usize,

    /// Seconds before a call is abandoned; `0` waits forever.
    timeout_secs: u64,

    /// Player address used as the attestation recipient.
    player_address: Option<String>,
}

impl AttestConfig {
    /// Loads from `path` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, a value is malformed, or
    /// a required key is missing from both sources.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Loads from `path` (if given) and a key lookup standing in for the
    /// environment.
    #[instrument(skip(path, lookup))]
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, lookup)
    }

    #[instrument(skip(path), fields(path = %path.display()))]
    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    fn resolve(
        file: ConfigFile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = env(ENV_RPC_URL).or(file.rpc_url);
        let contract_address = env(ENV_CONTRACT_ADDRESS).or(file.contract_address);
        let schema_uid = env(ENV_SCHEMA_UID).or(file.schema_uid);
        let private_key = env(ENV_PRIVATE_KEY).or(file.private_key);

        let missing: Vec<&str> = [
            (ENV_RPC_URL, rpc_url.is_none()),
            (ENV_CONTRACT_ADDRESS, contract_address.is_none()),
            (ENV_SCHEMA_UID, schema_uid.is_none()),
            (ENV_PRIVATE_KEY, private_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(rpc_url), Some(contract_address), Some(schema_uid), Some(private_key)) =
            (rpc_url, contract_address, schema_uid, private_key)
        else {
            return Err(ConfigError::new(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        };

        let config = Self {
            rpc_url,
            contract_address,
            schema_uid,
            private_key,
            chain_id: parse_env(&env, ENV_CHAIN_ID)?.or(file.chain_id),
            confirmations: parse_env(&env, ENV_CONFIRMATIONS)?
                .or(file.confirmations)
                .unwrap_or_else(default_confirmations),
            timeout_secs: parse_env(&env, ENV_TIMEOUT_SECS)?
                .or(file.timeout_secs)
                .unwrap_or_else(default_timeout_secs),
            player_address: env(ENV_PLAYER_ADDRESS).or(file.player_address),
        };

        info!(
            rpc_url = %config.rpc_url,
            contract = %config.contract_address,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Per-call timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn parse_env<T>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::new(format!("Invalid {}={}: {}", key, raw, e)))
        })
        .transpose()
}

impl std::fmt::Debug for AttestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestConfig")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("schema_uid", &self.schema_uid)
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("confirmations", &self.confirmations)
            .field("timeout_secs", &self.timeout_secs)
            .field("player_address", &self.player_address)
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
