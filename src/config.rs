//! Configuration module
//!
//! Two kinds of configuration live here:
//! - the chain registry, built once at process start and immutable after,
//! - the user-editable AI configuration, persisted to a single JSON file
//!   and read back at session start.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    chain_slug_to_id, get_chain_name, get_chain_slug, get_default_rpc_url,
    get_explorer_api_url, get_explorer_ui_url, get_fallback_rpc_url, get_native_symbol,
    SUPPORTED_CHAIN_IDS,
};

/// Fixed storage location for the AI configuration, overridable via env
pub const AI_CONFIG_ENV: &str = "SMART_AUDIT_CONFIG";
const AI_CONFIG_DEFAULT_PATH: &str = "ai_config.json";

// ============================================
// Chain Registry
// ============================================

/// Static per-chain configuration
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub id: u64,
    /// Lowercase slug used in URLs and probe results (e.g. "ethereum")
    pub slug: String,
    pub name: String,
    pub native_symbol: String,
    pub rpc_url: String,
    pub fallback_rpc_url: Option<String>,
    pub explorer_api_url: String,
    pub explorer_api_key: String,
    pub explorer_ui_url: String,
}

/// Registry of every configured chain. Loaded once, immutable thereafter.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
}

impl ChainRegistry {
    /// Build a registry from an explicit chain list (mainly for tests)
    pub fn new(chains: Vec<ChainConfig>) -> Self {
        Self { chains }
    }

    /// Build the default registry from constants plus environment overrides.
    ///
    /// Per chain: `<SLUG>_RPC_URL` overrides the RPC endpoint and
    /// `<SLUG>_SCAN_API_KEY` sets the explorer key, falling back to
    /// `ETHERSCAN_API_KEY` for the whole Etherscan family.
    pub fn from_env() -> Self {
        let shared_key = std::env::var("ETHERSCAN_API_KEY").unwrap_or_default();

        let chains = SUPPORTED_CHAIN_IDS
            .iter()
            .map(|&id| {
                let slug = get_chain_slug(id);
                let upper = slug.to_uppercase();
                let rpc_url = std::env::var(format!("{}_RPC_URL", upper))
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| get_default_rpc_url(id).unwrap_or_default().to_string());
                let explorer_api_key = std::env::var(format!("{}_SCAN_API_KEY", upper))
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| shared_key.clone());

                ChainConfig {
                    id,
                    slug: slug.to_string(),
                    name: get_chain_name(id).to_string(),
                    native_symbol: get_native_symbol(id).to_string(),
                    rpc_url,
                    fallback_rpc_url: get_fallback_rpc_url(id).map(String::from),
                    explorer_api_url: get_explorer_api_url(id).to_string(),
                    explorer_api_key,
                    explorer_ui_url: get_explorer_ui_url(id).to_string(),
                }
            })
            .collect();

        Self { chains }
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    /// Look up a chain by slug; common aliases (eth, bnb, matic, avax)
    /// resolve to their canonical chain
    pub fn by_slug(&self, slug: &str) -> Option<&ChainConfig> {
        let slug = slug.to_lowercase();
        self.chains
            .iter()
            .find(|c| c.slug == slug)
            .or_else(|| chain_slug_to_id(&slug).and_then(|id| self.by_id(id)))
    }

    pub fn by_id(&self, id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Explorer UI link for an address page
    pub fn explorer_address_url(&self, slug: &str, address: &str) -> Option<String> {
        self.by_slug(slug)
            .map(|c| format!("{}/address/{}", c.explorer_ui_url, address))
    }

    /// Explorer UI link for a token page
    pub fn explorer_token_url(&self, slug: &str, address: &str) -> Option<String> {
        self.by_slug(slug)
            .map(|c| format!("{}/token/{}", c.explorer_ui_url, address))
    }
}

// ============================================
// AI Configuration
// ============================================

/// Supported AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gpt,
    Claude,
    Gemini,
    Xai,
}

impl AiProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            AiProvider::Gpt => "OpenAI GPT",
            AiProvider::Claude => "Anthropic Claude",
            AiProvider::Gemini => "Google Gemini",
            AiProvider::Xai => "xAI Grok",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gpt => "gpt-4o",
            AiProvider::Claude => "claude-3-5-sonnet-latest",
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::Xai => "grok-2-latest",
        }
    }
}

/// User-editable AI configuration.
///
/// Matches the shape the UI persists: one provider + one selected model,
/// per-provider API keys, response language and the super-prompt flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub selected_model: String,
    pub gpt_key: String,
    pub claude_key: String,
    pub gemini_key: String,
    pub xai_key: String,
    pub language: String,
    pub super_prompt: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Gemini,
            selected_model: AiProvider::Gemini.default_model().to_string(),
            gpt_key: String::new(),
            claude_key: String::new(),
            gemini_key: String::new(),
            xai_key: String::new(),
            language: "english".to_string(),
            super_prompt: true,
        }
    }
}

impl AiConfig {
    /// Where the configuration is persisted
    pub fn config_path() -> PathBuf {
        std::env::var(AI_CONFIG_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(AI_CONFIG_DEFAULT_PATH))
    }

    /// Load the persisted configuration, falling back to defaults when the
    /// file is missing or unreadable (same behavior as a fresh session).
    pub fn load() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist the configuration (explicit save only)
    pub fn save(&self) -> AppResult<()> {
        let path = Self::config_path();
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        tracing::info!("💾 AI configuration saved to {}", path.display());
        Ok(())
    }

    /// API key the current provider would use, as configured
    pub fn api_key(&self) -> &str {
        match self.provider {
            AiProvider::Gpt => &self.gpt_key,
            AiProvider::Claude => &self.claude_key,
            AiProvider::Gemini => &self.gemini_key,
            AiProvider::Xai => &self.xai_key,
        }
    }

    /// Resolve the effective API key. Gemini is the default provider and
    /// may fall back to a server-side key from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        let key = self.api_key().trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
        if self.provider == AiProvider::Gemini {
            return std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty());
        }
        None
    }

    /// Model identifier sent to the provider
    pub fn model_name(&self) -> &str {
        if self.selected_model.is_empty() {
            self.provider.default_model()
        } else {
            &self.selected_model
        }
    }

    /// Validate that a request can be dispatched with this configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.resolved_api_key().is_none() {
            return Err(AppError::config_invalid(format!(
                "Missing API key for {}",
                self.provider.display_name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_chains() {
        let registry = ChainRegistry::from_env();
        assert_eq!(registry.chains().len(), SUPPORTED_CHAIN_IDS.len());
        assert!(registry.by_slug("ethereum").is_some());
        assert!(registry.by_slug("Base").is_some());
        assert!(registry.by_slug("solana").is_none());
    }

    #[test]
    fn test_explorer_urls() {
        let registry = ChainRegistry::from_env();
        let url = registry
            .explorer_address_url("ethereum", "0x0000000000000000000000000000000000dEaD")
            .unwrap();
        assert_eq!(
            url,
            "https://etherscan.io/address/0x0000000000000000000000000000000000dEaD"
        );
        assert!(registry.explorer_token_url("unknown", "0x00").is_none());
    }

    #[test]
    fn test_default_ai_config() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::Gemini);
        assert_eq!(config.language, "english");
        assert!(config.super_prompt);
    }

    #[test]
    fn test_ai_config_round_trip() {
        let mut config = AiConfig::default();
        config.provider = AiProvider::Claude;
        config.claude_key = "sk-ant-test".to_string();
        config.language = "chinese".to_string();
        let raw = serde_json::to_string(&config).unwrap();
        assert!(raw.contains(r#""provider":"claude""#));
        assert!(raw.contains(r#""claudeKey":"sk-ant-test""#));
        let back: AiConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let config = AiConfig {
            provider: AiProvider::Gpt,
            ..AiConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code_str(), "CONFIG_INVALID");
    }

    #[test]
    fn test_configured_key_resolves() {
        let config = AiConfig {
            provider: AiProvider::Xai,
            xai_key: "xai-test".to_string(),
            ..AiConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("xai-test"));
    }
}
