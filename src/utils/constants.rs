//! Constants Module - Single Source of Truth
//!
//! All chain identifiers, explorer endpoints, function selectors and
//! storage slots used across the application are defined here.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "SmartAudit";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = "SmartAudit/0.1.0";

/// Default timeout for RPC requests (seconds)
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Default timeout for explorer API requests (seconds)
pub const DEFAULT_EXPLORER_TIMEOUT_SECS: u64 = 15;

/// Default timeout for AI completion requests (seconds).
/// Long reports on large multi-file contracts can take minutes.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 600;

/// Title prepended to reports that come back without a top-level heading
pub const DEFAULT_REPORT_TITLE: &str = "Smart Contract Security Analysis Report";

// ============================================
// CHAIN IDS - Single Source of Truth
// ============================================

/// Ethereum Mainnet
pub const CHAIN_ID_ETHEREUM: u64 = 1;
/// BNB Smart Chain
pub const CHAIN_ID_BSC: u64 = 56;
/// Polygon
pub const CHAIN_ID_POLYGON: u64 = 137;
/// Arbitrum One
pub const CHAIN_ID_ARBITRUM: u64 = 42161;
/// Optimism
pub const CHAIN_ID_OPTIMISM: u64 = 10;
/// Avalanche C-Chain
pub const CHAIN_ID_AVALANCHE: u64 = 43114;
/// Base
pub const CHAIN_ID_BASE: u64 = 8453;

/// All supported chain IDs
pub const SUPPORTED_CHAIN_IDS: [u64; 7] = [
    CHAIN_ID_ETHEREUM,
    CHAIN_ID_BSC,
    CHAIN_ID_POLYGON,
    CHAIN_ID_ARBITRUM,
    CHAIN_ID_OPTIMISM,
    CHAIN_ID_AVALANCHE,
    CHAIN_ID_BASE,
];

// ============================================
// CHAIN METADATA
// ============================================

/// Get the lowercase chain slug used in URLs and API responses
pub fn get_chain_slug(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "ethereum",
        CHAIN_ID_BSC => "bsc",
        CHAIN_ID_POLYGON => "polygon",
        CHAIN_ID_ARBITRUM => "arbitrum",
        CHAIN_ID_OPTIMISM => "optimism",
        CHAIN_ID_AVALANCHE => "avalanche",
        CHAIN_ID_BASE => "base",
        _ => "ethereum",
    }
}

/// Resolve a chain slug back to its numeric ID
pub fn chain_slug_to_id(slug: &str) -> Option<u64> {
    match slug.to_lowercase().as_str() {
        "ethereum" | "eth" | "mainnet" => Some(CHAIN_ID_ETHEREUM),
        "bsc" | "bnb" => Some(CHAIN_ID_BSC),
        "polygon" | "matic" => Some(CHAIN_ID_POLYGON),
        "arbitrum" => Some(CHAIN_ID_ARBITRUM),
        "optimism" => Some(CHAIN_ID_OPTIMISM),
        "avalanche" | "avax" => Some(CHAIN_ID_AVALANCHE),
        "base" => Some(CHAIN_ID_BASE),
        _ => None,
    }
}

/// Get chain display name
pub fn get_chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "Ethereum",
        CHAIN_ID_BSC => "BNB Smart Chain",
        CHAIN_ID_POLYGON => "Polygon",
        CHAIN_ID_ARBITRUM => "Arbitrum One",
        CHAIN_ID_OPTIMISM => "Optimism",
        CHAIN_ID_AVALANCHE => "Avalanche C-Chain",
        CHAIN_ID_BASE => "Base",
        _ => "Unknown",
    }
}

/// Get native token symbol
pub fn get_native_symbol(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_BSC => "BNB",
        CHAIN_ID_POLYGON => "MATIC",
        CHAIN_ID_AVALANCHE => "AVAX",
        _ => "ETH",
    }
}

// ============================================
// RPC ENDPOINTS
// ============================================

/// Get default public RPC URL for a chain
pub fn get_default_rpc_url(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some("https://eth.llamarpc.com"),
        CHAIN_ID_BSC => Some("https://bsc-dataseed.binance.org"),
        CHAIN_ID_POLYGON => Some("https://polygon-rpc.com"),
        CHAIN_ID_ARBITRUM => Some("https://arb1.arbitrum.io/rpc"),
        CHAIN_ID_OPTIMISM => Some("https://mainnet.optimism.io"),
        CHAIN_ID_AVALANCHE => Some("https://api.avax.network/ext/bc/C/rpc"),
        CHAIN_ID_BASE => Some("https://mainnet.base.org"),
        _ => None,
    }
}

/// Get secondary public RPC URL used when the primary endpoint fails
pub fn get_fallback_rpc_url(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some("https://rpc.ankr.com/eth"),
        CHAIN_ID_BSC => Some("https://rpc.ankr.com/bsc"),
        CHAIN_ID_POLYGON => Some("https://rpc.ankr.com/polygon"),
        CHAIN_ID_ARBITRUM => Some("https://rpc.ankr.com/arbitrum"),
        CHAIN_ID_OPTIMISM => Some("https://rpc.ankr.com/optimism"),
        CHAIN_ID_AVALANCHE => Some("https://rpc.ankr.com/avalanche"),
        CHAIN_ID_BASE => Some("https://rpc.ankr.com/base"),
        _ => None,
    }
}

// ============================================
// BLOCK EXPLORERS
// ============================================

/// Get explorer API URL (Etherscan-family "getsourcecode" endpoint base)
pub fn get_explorer_api_url(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "https://api.etherscan.io/api",
        CHAIN_ID_BSC => "https://api.bscscan.com/api",
        CHAIN_ID_POLYGON => "https://api.polygonscan.com/api",
        CHAIN_ID_ARBITRUM => "https://api.arbiscan.io/api",
        CHAIN_ID_OPTIMISM => "https://api-optimistic.etherscan.io/api",
        CHAIN_ID_AVALANCHE => "https://api.snowtrace.io/api",
        CHAIN_ID_BASE => "https://api.basescan.org/api",
        _ => "https://api.etherscan.io/api",
    }
}

/// Get explorer UI URL (for address/token links shown to the user)
pub fn get_explorer_ui_url(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "https://etherscan.io",
        CHAIN_ID_BSC => "https://bscscan.com",
        CHAIN_ID_POLYGON => "https://polygonscan.com",
        CHAIN_ID_ARBITRUM => "https://arbiscan.io",
        CHAIN_ID_OPTIMISM => "https://optimistic.etherscan.io",
        CHAIN_ID_AVALANCHE => "https://snowtrace.io",
        CHAIN_ID_BASE => "https://basescan.org",
        _ => "https://etherscan.io",
    }
}

// ============================================
// FUNCTION SELECTORS (first 4 bytes of keccak256)
// ============================================

/// name()
pub const SELECTOR_NAME: &str = "06fdde03";
/// symbol()
pub const SELECTOR_SYMBOL: &str = "95d89b41";
/// decimals()
pub const SELECTOR_DECIMALS: &str = "313ce567";
/// totalSupply()
pub const SELECTOR_TOTAL_SUPPLY: &str = "18160ddd";
/// owner()
pub const SELECTOR_OWNER: &str = "8da5cb5b";
/// supportsInterface(bytes4)
pub const SELECTOR_SUPPORTS_INTERFACE: &str = "01ffc9a7";

/// ERC-721 interface id for supportsInterface probes
pub const INTERFACE_ID_ERC721: &str = "80ac58cd";
/// ERC-1155 interface id for supportsInterface probes
pub const INTERFACE_ID_ERC1155: &str = "d9b67a26";

// ============================================
// PROXY STORAGE SLOTS
// ============================================

/// EIP-1967 implementation slot: keccak256("eip1967.proxy.implementation") - 1
pub const EIP1967_IMPLEMENTATION_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// EIP-1967 beacon slot: keccak256("eip1967.proxy.beacon") - 1
pub const EIP1967_BEACON_SLOT: &str =
    "0xa3f0ad74e5423aebfd80d3ef4346578335a9a72aeaee59ff6cb3582b35133d50";

/// Legacy OpenZeppelin proxy implementation slot: keccak256("org.zeppelinos.proxy.implementation")
pub const OZ_IMPLEMENTATION_SLOT: &str =
    "0x7050c9e0f4ca769c69bd3a8ef740bc37934f8e2c036e5a723fd8ee048ed3f8c3";

/// Check if chain ID is supported
#[inline]
pub fn is_chain_supported(chain_id: u64) -> bool {
    SUPPORTED_CHAIN_IDS.contains(&chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_support() {
        assert!(is_chain_supported(1));
        assert!(is_chain_supported(8453));
        assert!(!is_chain_supported(999));
    }

    #[test]
    fn test_slug_round_trip() {
        for chain_id in SUPPORTED_CHAIN_IDS {
            let slug = get_chain_slug(chain_id);
            assert_eq!(chain_slug_to_id(slug), Some(chain_id));
        }
    }

    #[test]
    fn test_slug_aliases() {
        assert_eq!(chain_slug_to_id("ETH"), Some(CHAIN_ID_ETHEREUM));
        assert_eq!(chain_slug_to_id("avax"), Some(CHAIN_ID_AVALANCHE));
        assert_eq!(chain_slug_to_id("solana"), None);
    }

    #[test]
    fn test_every_chain_has_endpoints() {
        for chain_id in SUPPORTED_CHAIN_IDS {
            assert!(get_default_rpc_url(chain_id).is_some());
            assert!(!get_explorer_api_url(chain_id).is_empty());
            assert!(!get_explorer_ui_url(chain_id).is_empty());
        }
    }
}
