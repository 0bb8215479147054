//! Contract Prober
//!
//! Answers "does this address hold a contract, and what kind?" across every
//! configured chain concurrently. Individual probe failures never surface as
//! errors - a chain that cannot be reached simply reports the contract as
//! absent there. Only an invalid address aborts the whole probe, before any
//! network traffic.

use alloy_primitives::Address;
use futures_util::future::join_all;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ChainRegistry;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ChainContractInfo, ContractBasicInfo, ContractType};
use crate::providers::rpc::RpcProvider;
use crate::utils::abi;
use crate::utils::constants::{
    EIP1967_BEACON_SLOT, EIP1967_IMPLEMENTATION_SLOT, INTERFACE_ID_ERC1155, INTERFACE_ID_ERC721,
    OZ_IMPLEMENTATION_SLOT, SELECTOR_DECIMALS, SELECTOR_NAME, SELECTOR_OWNER, SELECTOR_SYMBOL,
    SELECTOR_TOTAL_SUPPLY,
};

/// Normalize and validate a user-supplied address.
///
/// Accepts with or without the `0x` prefix and surrounding whitespace.
/// Mixed-case input must pass the EIP-55 checksum; all-lowercase and
/// all-uppercase hex is accepted as-is.
pub fn validate_address(input: &str) -> AppResult<Address> {
    let trimmed = input.trim();
    let with_prefix = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        trimmed.to_string()
    } else {
        format!("0x{}", trimmed)
    };

    if with_prefix.len() != 42 {
        return Err(AppError::invalid_address(trimmed));
    }

    let hex_part = &with_prefix[2..];
    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        // Mixed case must be a valid EIP-55 checksum
        Address::parse_checksummed(&with_prefix, None)
            .map_err(|_| AppError::invalid_address(trimmed))
    } else {
        Address::from_str(&with_prefix).map_err(|_| AppError::invalid_address(trimmed))
    }
}

/// Probes one address across all chains in the registry
pub struct ContractProber {
    registry: Arc<ChainRegistry>,
}

impl ContractProber {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Check the address on every configured chain concurrently.
    ///
    /// The result always contains one entry per chain, keyed by slug.
    pub async fn check_on_chains(&self, address: &str) -> AppResult<ChainContractInfo> {
        let checked = validate_address(address)?;
        let normalized = format!("{:?}", checked);

        info!(
            "🔎 Probing {} across {} chain(s)",
            normalized,
            self.registry.chains().len()
        );

        // Slugs stay outside the spawned tasks so a panicking probe still
        // produces an entry for its chain
        let (slugs, handles): (Vec<_>, Vec<_>) = self
            .registry
            .chains()
            .iter()
            .map(|chain| {
                let slug = chain.slug.clone();
                let chain = chain.clone();
                let address = normalized.clone();
                let handle = tokio::spawn(async move { probe_chain(&chain, &address).await });
                (slug, handle)
            })
            .unzip();

        let mut results = ChainContractInfo::new();
        for (slug, outcome) in slugs.into_iter().zip(join_all(handles).await) {
            let info = outcome.unwrap_or_else(|e| {
                warn!("Probe task failed on {}: {}", slug, e);
                ContractBasicInfo::absent()
            });
            results.insert(slug, info);
        }

        Ok(results)
    }
}

/// Probe one chain. Any failure collapses to an absent entry.
async fn probe_chain(chain: &crate::config::ChainConfig, address: &str) -> ContractBasicInfo {
    match probe_chain_inner(chain, address).await {
        Ok(info) => info,
        Err(e) => {
            debug!("Probe failed on {}: {}", chain.name, e);
            ContractBasicInfo::absent()
        }
    }
}

async fn probe_chain_inner(
    chain: &crate::config::ChainConfig,
    address: &str,
) -> eyre::Result<ContractBasicInfo> {
    let provider = RpcProvider::new(chain)?;

    let code = provider.get_code(address).await?;
    if code == "0x" || code.is_empty() {
        return Ok(ContractBasicInfo::absent());
    }

    let mut info = ContractBasicInfo::found(chain.id);

    // Classification: ERC-165 first (721 / 1155), then ERC-20 metadata.
    // Tokens that do not implement ERC-165 revert here, which is fine.
    let is_721 = supports_interface(&provider, address, INTERFACE_ID_ERC721).await;
    let is_1155 = supports_interface(&provider, address, INTERFACE_ID_ERC1155).await;

    if let Ok(data) = provider.eth_call(address, &abi::encode_call(SELECTOR_NAME)).await {
        info.name = abi::decode_string(&data);
    }
    if let Ok(data) = provider.eth_call(address, &abi::encode_call(SELECTOR_SYMBOL)).await {
        info.symbol = abi::decode_string(&data);
    }
    if let Ok(data) = provider.eth_call(address, &abi::encode_call(SELECTOR_DECIMALS)).await {
        info.decimals = abi::decode_uint(&data).and_then(|v| u8::try_from(v).ok());
    }
    if let Ok(data) = provider
        .eth_call(address, &abi::encode_call(SELECTOR_TOTAL_SUPPLY))
        .await
    {
        info.total_supply = abi::decode_uint(&data).map(|v| v.to_string());
    }
    if let Ok(data) = provider.eth_call(address, &abi::encode_call(SELECTOR_OWNER)).await {
        info.owner = abi::decode_address(&data).map(|a| format!("{:?}", a));
    }

    info.contract_type = Some(if is_721 {
        ContractType::Erc721
    } else if is_1155 {
        ContractType::Erc1155
    } else if info.decimals.is_some() && info.total_supply.is_some() {
        ContractType::Erc20
    } else {
        ContractType::Unknown
    });

    // Proxy detection: EIP-1967 implementation slot, then beacon slot,
    // then the legacy OpenZeppelin slot
    for slot in [
        EIP1967_IMPLEMENTATION_SLOT,
        EIP1967_BEACON_SLOT,
        OZ_IMPLEMENTATION_SLOT,
    ] {
        if let Ok(word) = provider.get_storage_at(address, slot).await {
            if let Some(impl_addr) = abi::storage_word_to_address(&word) {
                info.is_proxy = Some(true);
                info.implementation = Some(format!("{:?}", impl_addr));
                break;
            }
        }
    }
    if info.is_proxy.is_none() {
        info.is_proxy = Some(false);
    }

    if let Ok(balance) = provider.get_balance(address).await {
        info.balance = balance
            .strip_prefix("0x")
            .and_then(|h| u128::from_str_radix(h, 16).ok())
            .map(|v| v.to_string());
    }

    debug!(
        "{}: exists, type={:?}, proxy={:?}",
        chain.name, info.contract_type, info.is_proxy
    );

    Ok(info)
}

async fn supports_interface(provider: &RpcProvider, address: &str, interface_id: &str) -> bool {
    match provider
        .eth_call(address, &abi::encode_supports_interface(interface_id))
        .await
    {
        Ok(data) => abi::decode_bool(&data).unwrap_or(false),
        Err(_) => false,
    }
}
