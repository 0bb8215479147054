//! Block Explorer API Client (Etherscan family)
//!
//! Fetches verified source code via `module=contract&action=getsourcecode`.
//! The `SourceCode` field comes back in one of three shapes:
//! - plain Solidity text (single-file verification),
//! - standard-JSON input wrapped in doubled braces `{{ ... }}` with a
//!   `sources` map,
//! - a bare JSON object mapping path -> { content } (older multi-file
//!   verifications).
//!
//! All three are normalized into an ordered list of [`ContractFile`]s with
//! the primary contract first.

use eyre::{eyre, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ChainConfig;
use crate::models::types::ContractFile;
use crate::utils::constants::{DEFAULT_EXPLORER_TIMEOUT_SECS, USER_AGENT};

/// Verified source for one contract address
#[derive(Debug, Clone)]
pub struct VerifiedSource {
    pub files: Vec<ContractFile>,
    pub contract_name: String,
    /// Implementation address the explorer reports when the target is a proxy
    pub proxy_implementation: Option<String>,
}

/// Raw explorer response envelope
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    status: String,
    #[allow(dead_code)]
    message: String,
    result: serde_json::Value,
}

/// One entry of the getsourcecode result array
#[derive(Debug, Deserialize)]
struct SourceCodeEntry {
    #[serde(rename = "SourceCode", default)]
    source_code: String,
    #[serde(rename = "ContractName", default)]
    contract_name: String,
    #[serde(rename = "Proxy", default)]
    proxy: String,
    #[serde(rename = "Implementation", default)]
    implementation: String,
}

/// Explorer API client for one chain
pub struct ExplorerClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    chain_name: String,
}

impl ExplorerClient {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.explorer_api_url.clone(),
            api_key: config.explorer_api_key.clone(),
            chain_name: config.name.clone(),
        }
    }

    /// Fetch verified source for an address.
    ///
    /// Returns `Ok(None)` when the contract exists but its source is not
    /// verified - the caller decides whether that is an error.
    pub async fn get_source_code(&self, address: &str) -> Result<Option<VerifiedSource>> {
        let url = format!(
            "{}?module=contract&action=getsourcecode&address={}&apikey={}",
            self.api_url, address, self.api_key
        );

        info!("🔍 Fetching verified source for {} on {}", address, self.chain_name);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_EXPLORER_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| eyre!("Explorer request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(eyre!("Explorer API error: HTTP {}", response.status()));
        }

        let envelope: ExplorerEnvelope = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse explorer response: {}", e))?;

        // status "0" with a string result is an API-level error (bad key,
        // rate limit); an empty SourceCode under status "1" just means the
        // contract is unverified.
        if envelope.status != "1" {
            if let Some(msg) = envelope.result.as_str() {
                return Err(eyre!("Explorer API rejected request: {}", msg));
            }
            return Ok(None);
        }

        let entries: Vec<SourceCodeEntry> = serde_json::from_value(envelope.result)
            .map_err(|e| eyre!("Unexpected explorer result shape: {}", e))?;

        let entry = match entries.into_iter().next() {
            Some(e) => e,
            None => return Ok(None),
        };

        if entry.source_code.trim().is_empty() {
            debug!("Source not verified for {} on {}", address, self.chain_name);
            return Ok(None);
        }

        let files = parse_source_payload(&entry.source_code, &entry.contract_name);
        let proxy_implementation = if entry.proxy == "1" && !entry.implementation.is_empty() {
            Some(entry.implementation)
        } else {
            None
        };

        info!(
            "📄 {} verified file(s) for {} ({})",
            files.len(),
            entry.contract_name,
            self.chain_name
        );

        Ok(Some(VerifiedSource {
            files,
            contract_name: entry.contract_name,
            proxy_implementation,
        }))
    }
}

/// Normalize a raw SourceCode payload into an ordered file list.
///
/// The file whose stem matches the primary contract name is moved to the
/// front so downstream naming stays stable.
fn parse_source_payload(source_code: &str, contract_name: &str) -> Vec<ContractFile> {
    let trimmed = source_code.trim();

    let sources = if let Some(inner) = trimmed.strip_prefix("{{").and_then(|s| s.strip_suffix("}}"))
    {
        // Standard-JSON input wrapped in doubled braces
        serde_json::from_str::<serde_json::Value>(&format!("{{{}}}", inner))
            .ok()
            .and_then(extract_sources_map)
    } else if trimmed.starts_with('{') {
        serde_json::from_str::<serde_json::Value>(trimmed)
            .ok()
            .and_then(extract_sources_map)
    } else {
        None
    };

    let mut files = match sources {
        Some(map) => map,
        None => {
            // Plain single-file verification
            let name = format!("{}.sol", default_name(contract_name));
            return vec![ContractFile {
                name: name.clone(),
                path: name,
                content: source_code.to_string(),
            }];
        }
    };

    // Primary contract first
    let primary = format!("{}.sol", contract_name);
    files.sort_by_key(|f| (f.name != primary, f.path.clone()));
    files
}

/// Pull the path -> content map out of either a standard-JSON input
/// (under "sources") or a bare sources object
fn extract_sources_map(value: serde_json::Value) -> Option<Vec<ContractFile>> {
    let map = match value.get("sources") {
        Some(sources) => sources.as_object()?,
        None => value.as_object()?,
    };

    let mut files = Vec::with_capacity(map.len());
    for (path, entry) in map {
        let content = entry.get("content")?.as_str()?;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        files.push(ContractFile {
            name,
            path: path.clone(),
            content: content.to_string(),
        });
    }
    if files.is_empty() {
        None
    } else {
        Some(files)
    }
}

fn default_name(contract_name: &str) -> &str {
    if contract_name.is_empty() {
        "Contract"
    } else {
        contract_name
    }
}
