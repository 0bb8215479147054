//! Core data structures for contract probing and analysis

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad contract classification from interface probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
    Unknown,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Erc20 => "ERC20",
            ContractType::Erc721 => "ERC721",
            ContractType::Erc1155 => "ERC1155",
            ContractType::Unknown => "Unknown",
        }
    }
}

/// Best-effort metadata for one (address, chain) pair.
///
/// Invariant: when `exists` is false every other field is empty -
/// construct absent entries through [`ContractBasicInfo::absent`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractBasicInfo {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Total supply in base units, decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<String>,
    /// Implementation address when the contract is a proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_proxy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    /// Native balance in wei, decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl ContractBasicInfo {
    /// Entry for a chain where the address holds no contract code.
    /// Also the degraded result when a chain probe fails outright.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Entry for a chain where contract code was found
    pub fn found(chain_id: u64) -> Self {
        Self {
            exists: true,
            chain_id: Some(chain_id),
            ..Self::default()
        }
    }
}

/// Aggregated probe result: one entry per configured chain, keyed by slug
pub type ChainContractInfo = BTreeMap<String, ContractBasicInfo>;

/// One source file of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFile {
    pub name: String,
    pub path: String,
    pub content: String,
}

/// Markdown report returned by the AI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: String,
}

/// Result of one analysis dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub report: AnalysisReport,
}
