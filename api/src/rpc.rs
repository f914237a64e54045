//! Minimal EVM JSON-RPC reader for contract views the subgraphs do not index.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    address::Address,
    chains::ChainConfig,
    config::Config,
    contracts::{self, CallRequest, CheckinContract, ReferralContract},
    error::{QueryError, ReferralLookupError},
    wallet::ReferralReader,
};

#[derive(Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
struct RpcError {
    code: i64,
    message: String,
}

/// Builds the shared HTTP client. Browsers enforce their own timeouts, so the
/// configured one only applies natively.
pub fn http_client(config: &Config) -> reqwest::Client {
    let builder = reqwest::Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(config.request_timeout);
    #[cfg(target_arch = "wasm32")]
    let _ = config;
    builder.build().unwrap_or_default()
}

pub struct JsonRpcClient {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for JsonRpcClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl JsonRpcClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        chain: &ChainConfig,
        method: &'static str,
        params: Vec<Value>,
    ) -> Result<T, QueryError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let response: RpcResponse<T> = self
            .client
            .post(chain.rpc_url())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(QueryError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or(QueryError::MissingData)
    }

    /// `eth_call` against the latest block, returning raw return data.
    pub async fn eth_call(&self, chain: &ChainConfig, call: &CallRequest) -> Result<Vec<u8>, QueryError> {
        let raw: String = self
            .request(chain, "eth_call", vec![json!(call), json!("latest")])
            .await?;
        contracts::from_hex_data(&raw)
    }

    pub async fn block_number(&self, chain: &ChainConfig) -> Result<u64, QueryError> {
        let raw: String = self.request(chain, "eth_blockNumber", vec![]).await?;
        let value = parse_quantity(&raw)?;
        u64::try_from(value).map_err(|e| QueryError::Decode(e.to_string()))
    }

    /// Native balance in wei.
    pub async fn balance(&self, chain: &ChainConfig, address: Address) -> Result<u128, QueryError> {
        let raw: String = self
            .request(chain, "eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        parse_quantity(&raw)
    }

    /// Current check-in fee in wei.
    pub async fn checkin_fee(&self, chain: &ChainConfig) -> Result<u128, QueryError> {
        let contract = CheckinContract::new(chain).ok_or(QueryError::UnknownChain(chain.chain_id()))?;
        let data = self.eth_call(chain, &contract.checkin_fee_call()).await?;
        contracts::decode_uint(&data)
    }

    /// Live streak straight from the contract, ahead of subgraph indexing.
    pub async fn streak(&self, chain: &ChainConfig, user: Address) -> Result<u32, QueryError> {
        let contract = CheckinContract::new(chain).ok_or(QueryError::UnknownChain(chain.chain_id()))?;
        let data = self.eth_call(chain, &contract.streak_call(user)).await?;
        let streak = contracts::decode_uint(&data)?;
        u32::try_from(streak).map_err(|e| QueryError::Decode(e.to_string()))
    }
}

impl ReferralReader for JsonRpcClient {
    async fn referrer_of(
        &self,
        chain: &ChainConfig,
        user: Address,
    ) -> Result<Option<Address>, ReferralLookupError> {
        let contract = ReferralContract::new(chain)
            .ok_or(ReferralLookupError::NotReferralChain(chain.chain_id()))?;

        let data = self.eth_call(chain, &contract.has_referrer_call(user)).await?;
        if !contracts::decode_bool(&data)? {
            return Ok(None);
        }
        let data = self.eth_call(chain, &contract.referrer_of_call(user)).await?;
        let referrer = contracts::decode_address(&data)?;
        Ok(Some(referrer).filter(|r| !r.is_zero()))
    }
}

/// Decodes a JSON-RPC hex quantity (`"0x1a"`).
pub fn parse_quantity(raw: &str) -> Result<u128, QueryError> {
    let body = raw
        .strip_prefix("0x")
        .ok_or_else(|| QueryError::Decode(format!("quantity without 0x prefix: {raw}")))?;
    if body.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(body, 16).map_err(|e| QueryError::Decode(e.to_string()))
}
