//! Source Fetcher
//!
//! Resolves a (chain, address) pair to verified source code through the
//! chain's block explorer. Proxies are followed one hop: when the explorer
//! flags the target as a proxy, the implementation's source is what gets
//! analyzed.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ChainRegistry;
use crate::filters::dedupe_files;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::ContractFile;
use crate::prober::validate_address;
use crate::providers::explorer::ExplorerClient;

/// Verified source ready for analysis
#[derive(Debug, Clone)]
pub struct FetchedSource {
    pub files: Vec<ContractFile>,
    pub contract_name: String,
}

pub struct SourceFetcher {
    registry: Arc<ChainRegistry>,
}

impl SourceFetcher {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Fetch verified source for an address on one chain.
    ///
    /// A known `implementation` address (e.g. resolved earlier by a probe)
    /// takes priority over whatever the explorer reports and is fetched
    /// directly. `follow_proxy: false` returns the proxy shell's own
    /// source untouched.
    ///
    /// Errors: `UNSUPPORTED_CHAIN` for an unknown slug, `INVALID_ADDRESS`
    /// before any network call, `SOURCE_NOT_FOUND` when the contract (or its
    /// proxy implementation) is not verified.
    pub async fn fetch(
        &self,
        chain_slug: &str,
        address: &str,
        implementation: Option<&str>,
        follow_proxy: bool,
    ) -> AppResult<FetchedSource> {
        let chain = self
            .registry
            .by_slug(chain_slug)
            .ok_or_else(|| AppError::unsupported_chain(chain_slug))?;

        let normalized = format!("{:?}", validate_address(address)?);
        let known_impl = implementation
            .map(|a| validate_address(a).map(|v| format!("{:?}", v)))
            .transpose()?;

        let explorer = ExplorerClient::new(chain);

        // A caller-supplied implementation skips the shell lookup entirely
        let target = match (&known_impl, follow_proxy) {
            (Some(impl_addr), true) => impl_addr.clone(),
            _ => normalized.clone(),
        };

        let source = explorer
            .get_source_code(&target)
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::SourceNotFound,
                    format!("Explorer lookup failed for {}: {}", target, e),
                )
            })?
            .ok_or_else(|| AppError::source_not_found(&target, &chain.name))?;

        // One hop at most: audit what actually runs, not the forwarder
        let resolved = match &source.proxy_implementation {
            Some(impl_address) if follow_proxy && known_impl.is_none() => {
                info!(
                    "↪️  {} is a proxy, fetching implementation {}",
                    target, impl_address
                );
                explorer
                    .get_source_code(impl_address)
                    .await
                    .map_err(|e| {
                        AppError::new(
                            ErrorCode::SourceNotFound,
                            format!("Explorer lookup failed for {}: {}", impl_address, e),
                        )
                    })?
                    .ok_or_else(|| AppError::source_not_found(impl_address, &chain.name))?
            }
            _ => source,
        };

        if resolved.files.is_empty() {
            warn!("Explorer returned no files for {}", normalized);
            return Err(AppError::new(
                ErrorCode::SourceNotFound,
                format!("No source files returned for {}", normalized),
            ));
        }

        Ok(FetchedSource {
            files: dedupe_files(resolved.files),
            contract_name: resolved.contract_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

    #[tokio::test]
    async fn test_unknown_chain_rejected() {
        let fetcher = SourceFetcher::new(Arc::new(ChainRegistry::new(vec![])));
        let err = fetcher.fetch("moonchain", USDT, None, true).await.unwrap_err();
        assert_eq!(err.code_str(), "UNSUPPORTED_CHAIN");
    }

    #[tokio::test]
    async fn test_invalid_address_checked_before_network() {
        let registry = ChainRegistry::from_env();
        let fetcher = SourceFetcher::new(Arc::new(registry));
        let err = fetcher.fetch("ethereum", "0x1234", None, true).await.unwrap_err();
        assert_eq!(err.code_str(), "INVALID_ADDRESS");
    }

    #[tokio::test]
    async fn test_invalid_known_implementation_rejected() {
        let registry = ChainRegistry::from_env();
        let fetcher = SourceFetcher::new(Arc::new(registry));
        let err = fetcher
            .fetch("ethereum", USDT, Some("not-an-address"), true)
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "INVALID_ADDRESS");
    }
}
