//! JSON-RPC client for per-chain contract probes
//!
//! One provider per configured chain, built from the registry entry.
//! A probe tries the primary endpoint once and the public fallback once;
//! there is no retry ladder - a failed probe degrades to an absent result
//! at the prober level rather than being retried.

use eyre::{eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::utils::constants::{DEFAULT_RPC_TIMEOUT_SECS, USER_AGENT as USER_AGENT_CONST};

/// RPC provider for one chain
#[derive(Clone)]
pub struct RpcProvider {
    primary_url: String,
    fallback_url: Option<String>,
    client: reqwest::Client,
    chain_id: u64,
    chain_name: String,
}

impl RpcProvider {
    pub fn new(config: &ChainConfig) -> Result<Self> {
        Ok(Self {
            primary_url: config.rpc_url.clone(),
            fallback_url: config.fallback_rpc_url.clone(),
            client: Self::build_client()?,
            chain_id: config.id,
            chain_name: config.name.clone(),
        })
    }

    /// Build HTTP client with custom headers and gzip compression
    fn build_client() -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
    }

    /// Execute a JSON-RPC call, trying the fallback endpoint if the
    /// primary one fails
    pub async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        match self.execute_call::<T>(&self.primary_url, &payload).await {
            Ok(result) => return Ok(result),
            Err(e) => {
                debug!("Primary RPC failed on {}: {}", self.chain_name, e);
            }
        }

        if let Some(ref fallback) = self.fallback_url {
            match self.execute_call::<T>(fallback, &payload).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!("⚠️ Fallback RPC also failed on {}: {}", self.chain_name, e);
                }
            }
        }

        Err(eyre!("All RPC endpoints failed for {}", self.chain_name))
    }

    /// Execute single RPC call
    async fn execute_call<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| eyre!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!("HTTP error: {}", status));
        }

        let json: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse response: {}", e))?;

        if let Some(error) = json.error {
            return Err(eyre!("RPC error: {} (code: {})", error.message, error.code));
        }

        json.result.ok_or_else(|| eyre!("No result in response"))
    }

    /// Get contract bytecode
    pub async fn get_code(&self, address: &str) -> Result<String> {
        let params = serde_json::json!([address, "latest"]);
        self.call::<String>("eth_getCode", params).await
    }

    /// Execute eth_call against a contract
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String> {
        let params = serde_json::json!([{ "to": to, "data": data }, "latest"]);
        self.call::<String>("eth_call", params).await
    }

    /// Get native balance (hex wei)
    pub async fn get_balance(&self, address: &str) -> Result<String> {
        let params = serde_json::json!([address, "latest"]);
        self.call::<String>("eth_getBalance", params).await
    }

    /// Read a raw storage slot (proxy detection)
    pub async fn get_storage_at(&self, address: &str, slot: &str) -> Result<String> {
        let params = serde_json::json!([address, slot, "latest"]);
        self.call::<String>("eth_getStorageAt", params).await
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<RpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}
