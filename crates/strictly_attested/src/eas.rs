//! Ethereum Attestation Service client.
//!
//! Each move becomes one `attest` call against the configured schema
//! `uint256 moveIndex, string player, address player_address`, signed with
//! the configured key and awaited until confirmed.

use crate::config::{AttestConfig, ConfigError};
use crate::error::SetupError;
use async_trait::async_trait;
use ethers::{
    abi::{self, Token},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, Eip1559TransactionRequest, H256, TransactionReceipt, U64, U256},
    utils::{id, keccak256},
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use strictly_board::{AttestError, AttestationPort, AttestationRecord, Identity, Player, Position};
use tracing::{debug, error, info, instrument};

/// Schema the move payload is encoded against.
pub const MOVE_SCHEMA: &str = "uint256 moveIndex, string player, address player_address";

/// `IEAS.attest(AttestationRequest)`.
pub const ATTEST_SIGNATURE: &str = "attest((bytes32,(address,uint64,bool,bytes32,bytes,uint256)))";

/// `IEAS.Attested`; the UID is the only non-indexed field.
pub const ATTESTED_EVENT: &str = "Attested(address,address,bytes32,bytes32)";

/// Encodes the move payload for [`MOVE_SCHEMA`].
#[instrument]
pub fn encode_move_payload(position: Position, player: Player, player_address: Address) -> Bytes {
    Bytes::from(abi::encode(&[
        Token::Uint(U256::from(position.to_index())),
        Token::String(player.symbol().to_string()),
        Token::Address(player_address),
    ]))
}

/// Builds calldata for a non-expiring, revocable attestation with no
/// reference and no value.
#[instrument(skip(payload))]
pub fn attest_calldata(schema: H256, recipient: Address, payload: &Bytes) -> Bytes {
    let request = Token::Tuple(vec![
        Token::FixedBytes(schema.as_bytes().to_vec()),
        Token::Tuple(vec![
            Token::Address(recipient),
            Token::Uint(U256::zero()),
            Token::Bool(true),
            Token::FixedBytes(H256::zero().as_bytes().to_vec()),
            Token::Bytes(payload.to_vec()),
            Token::Uint(U256::zero()),
        ]),
    ]);

    let mut data = id(ATTEST_SIGNATURE).to_vec();
    data.extend(abi::encode(&[request]));
    Bytes::from(data)
}

/// Finds the attestation UID in the `Attested` log emitted by `contract`.
pub fn attested_uid(receipt: &TransactionReceipt, contract: Address) -> Option<H256> {
    let topic = H256::from(keccak256(ATTESTED_EVENT));
    receipt
        .logs
        .iter()
        .filter(|log| log.address == contract)
        .find(|log| log.topics.first() == Some(&topic))
        .filter(|log| log.data.len() >= 32)
        .map(|log| H256::from_slice(&log.data.as_ref()[..32]))
}

/// Configuration values parsed into chain types.
#[derive(Debug, Clone)]
pub struct EasSettings {
    provider: Provider<Http>,
    contract: Address,
    schema: H256,
    wallet: LocalWallet,
    chain_id: Option<u64>,
    confirmations: usize,
    timeout: Option<Duration>,
}

impl EasSettings {
    /// Parses and checks every value without touching the network.
    ///
    /// # Errors
    ///
    /// Names the first malformed value.
    #[instrument(skip(config))]
    pub fn parse(config: &AttestConfig) -> Result<Self, ConfigError> {
        let provider = Provider::<Http>::try_from(config.rpc_url().as_str())
            .map_err(|e| ConfigError::new(format!("Invalid RPC URL: {}", e)))?;
        let contract = config
            .contract_address()
            .parse::<Address>()
            .map_err(|e| ConfigError::new(format!("Invalid contract address: {}", e)))?;
        let schema = config
            .schema_uid()
            .parse::<H256>()
            .map_err(|e| ConfigError::new(format!("Invalid schema UID: {}", e)))?;
        let wallet = config
            .private_key()
            .parse::<LocalWallet>()
            .map_err(|e| ConfigError::new(format!("Invalid private key: {}", e)))?;

        Ok(Self {
            provider,
            contract,
            schema,
            wallet,
            chain_id: *config.chain_id(),
            confirmations: *config.confirmations(),
            timeout: config.timeout(),
        })
    }

    /// Address of the signing key.
    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }

    /// EAS contract address.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Schema UID.
    pub fn schema(&self) -> H256 {
        self.schema
    }
}

/// Abandons `call` after `limit`, reporting it as a failed attestation.
pub async fn with_timeout<F>(
    limit: Option<Duration>,
    call: F,
) -> Result<AttestationRecord, AttestError>
where
    F: Future<Output = Result<AttestationRecord, AttestError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            error!(?limit, "Attestation timed out");
            AttestError::new(format!("Attestation timed out after {}s", limit.as_secs()))
        })?,
        None => call.await,
    }
}

type EasClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// [`AttestationPort`] backed by an EAS contract.
#[derive(Debug, Clone)]
pub struct EasAttestor {
    client: Arc<EasClient>,
    contract: Address,
    schema: H256,
    confirmations: usize,
    timeout: Option<Duration>,
}

impl EasAttestor {
    /// Parses the configuration and binds the signer to the chain.
    ///
    /// # Errors
    ///
    /// Fails on malformed configuration, or if the chain id is not
    /// configured and the endpoint cannot report it.
    #[instrument(skip(config))]
    pub async fn connect(config: &AttestConfig) -> Result<Self, SetupError> {
        let settings = EasSettings::parse(config)?;

        let chain_id = match settings.chain_id {
            Some(chain_id) => chain_id,
            None => {
                debug!("Fetching chain id from endpoint");
                settings
                    .provider
                    .get_chainid()
                    .await
                    .map_err(|e| AttestError::new(format!("Failed to fetch chain id: {}", e)))?
                    .as_u64()
            }
        };

        let wallet = settings.wallet.with_chain_id(chain_id);
        info!(
            chain_id,
            signer = ?wallet.address(),
            contract = ?settings.contract,
            schema = ?settings.schema,
            "EAS attestor ready"
        );

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(settings.provider, wallet)),
            contract: settings.contract,
            schema: settings.schema,
            confirmations: settings.confirmations,
            timeout: settings.timeout,
        })
    }

    /// Signs, sends and confirms one attestation.
    #[instrument(skip(self))]
    async fn submit(
        &self,
        position: Position,
        player: Player,
        identity: &Identity,
    ) -> Result<AttestationRecord, AttestError> {
        info!(
            index = position.to_index(),
            %player,
            address = %identity,
            contract = ?self.contract,
            schema = ?self.schema,
            "Creating attestation for move"
        );

        let recipient = identity
            .as_str()
            .parse::<Address>()
            .map_err(|e| AttestError::new(format!("Invalid player address {}: {}", identity, e)))?;

        let payload = encode_move_payload(position, player, recipient);
        debug!(encoded = %payload, "Encoded data");

        let tx = Eip1559TransactionRequest::new()
            .to(self.contract)
            .data(attest_calldata(self.schema, recipient, &payload));

        let pending = self.client.send_transaction(tx, None).await.map_err(|e| {
            error!(error = ?e, encoded = %payload, "Attestation transaction failed");
            AttestError::new(format!("Failed to send attestation: {}", e))
        })?;
        let tx_hash = *pending;
        info!(tx = ?tx_hash, "Transaction sent");

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| {
                error!(error = ?e, tx = ?tx_hash, "Waiting for confirmation failed");
                AttestError::new(format!("Failed to confirm attestation: {}", e))
            })?
            .ok_or_else(|| AttestError::new(format!("Transaction {:?} was dropped", tx_hash)))?;

        if receipt.status == Some(U64::zero()) {
            error!(tx = ?tx_hash, receipt = ?receipt, "Attestation reverted");
            return Err(AttestError::new(format!("Transaction {:?} reverted", tx_hash)));
        }

        let uid = attested_uid(&receipt, self.contract).ok_or_else(|| {
            error!(tx = ?tx_hash, logs = ?receipt.logs, "No Attested event in receipt");
            AttestError::new(format!("Transaction {:?} emitted no attestation", tx_hash))
        })?;

        debug!(uid = ?uid, block = ?receipt.block_number, "New attestation");
        Ok(AttestationRecord::new(format!("{:?}", uid), format!("{:?}", tx_hash)))
    }
}

#[async_trait]
impl AttestationPort for EasAttestor {
    async fn attest(
        &self,
        position: Position,
        player: Player,
        identity: &Identity,
    ) -> Result<AttestationRecord, AttestError> {
        with_timeout(self.timeout, self.submit(position, player, identity)).await
    }
}
