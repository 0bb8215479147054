//! AI Provider Client
//!
//! Sends merged contract source to one of the supported AI providers and
//! returns the markdown analysis text. Wire formats:
//! - gpt / xai: OpenAI chat-completions (xAI is OpenAI-compatible)
//! - claude: Anthropic messages API
//! - gemini: Google generateContent

use eyre::{eyre, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{AiConfig, AiProvider};
use crate::filters::merge_contract_contents;
use crate::models::types::ContractFile;
use crate::utils::constants::{DEFAULT_AI_TIMEOUT_SECS, USER_AGENT};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const XAI_API_URL: &str = "https://api.x.ai/v1/chat/completions";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const BASE_PROMPT: &str = "You are a smart contract security auditor. Analyze the \
provided Solidity source code and produce a detailed security audit report in \
markdown. Identify vulnerabilities, rate their severity (Critical, High, Medium, \
Low, Informational), and explain the impact and a recommended fix for each \
finding. Also assess centralization risks, upgradeability concerns, and any \
honeypot or rug-pull patterns.";

const SUPER_PROMPT: &str = "You are an elite smart contract security auditor with \
deep expertise in the EVM, Solidity internals, and DeFi attack patterns. Perform \
an exhaustive audit of the provided source code. For every finding give: severity \
(Critical, High, Medium, Low, Informational), affected code location, a concrete \
exploit scenario, and a recommended fix with example code. Cover reentrancy, \
access control, arithmetic, oracle manipulation, flash-loan vectors, proxy and \
storage-collision issues, centralization and owner-privilege risks, honeypot \
mechanics (transfer restrictions, hidden fees, blacklists), and gas griefing. \
Close with an executive summary table of all findings and an overall risk rating.";

/// Client for a single analysis request against the configured provider
pub struct AiClient {
    client: reqwest::Client,
}

impl Default for AiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AiClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Run one analysis request. Returns the raw markdown text from the model.
    pub async fn analyze(
        &self,
        config: &AiConfig,
        api_key: &str,
        files: &[ContractFile],
        contract_name: &str,
    ) -> Result<String> {
        let model = config.model_name();
        let system = build_system_prompt(config);
        let user = build_user_prompt(files, contract_name);

        info!(
            "🤖 Requesting analysis from {} ({}, {} file(s))",
            config.provider.display_name(),
            model,
            files.len()
        );

        let text = match config.provider {
            AiProvider::Gpt => {
                self.openai_compatible(OPENAI_API_URL, api_key, &model, &system, &user)
                    .await?
            }
            AiProvider::Xai => {
                self.openai_compatible(XAI_API_URL, api_key, &model, &system, &user)
                    .await?
            }
            AiProvider::Claude => self.anthropic(api_key, &model, &system, &user).await?,
            AiProvider::Gemini => self.gemini(api_key, &model, &system, &user).await?,
        };

        debug!("Analysis response: {} chars", text.len());
        Ok(text)
    }

    async fn openai_compatible(
        &self,
        url: &str,
        api_key: &str,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| eyre!("AI request failed: {}", e))?;

        let status = response.status();
        let value: Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse AI response: {}", e))?;

        if !status.is_success() {
            return Err(eyre!("AI provider error (HTTP {}): {}", status, api_error(&value)));
        }

        value["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| eyre!("AI response contained no content"))
    }

    async fn anthropic(
        &self,
        api_key: &str,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let body = json!({
            "model": model,
            "max_tokens": 8192,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| eyre!("AI request failed: {}", e))?;

        let status = response.status();
        let value: Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse AI response: {}", e))?;

        if !status.is_success() {
            return Err(eyre!("AI provider error (HTTP {}): {}", status, api_error(&value)));
        }

        value["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| eyre!("AI response contained no content"))
    }

    async fn gemini(&self, api_key: &str, model: &str, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_URL, model, api_key);
        let body = json!({
            "systemInstruction": {
                "parts": [{"text": system}]
            },
            "contents": [
                {"role": "user", "parts": [{"text": user}]}
            ]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| eyre!("AI request failed: {}", e))?;

        let status = response.status();
        let value: Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse AI response: {}", e))?;

        if !status.is_success() {
            return Err(eyre!("AI provider error (HTTP {}): {}", status, api_error(&value)));
        }

        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| eyre!("AI response contained no content"))
    }
}

/// System prompt: base or super template, plus a non-English language directive
pub fn build_system_prompt(config: &AiConfig) -> String {
    let mut prompt = if config.super_prompt {
        SUPER_PROMPT.to_string()
    } else {
        BASE_PROMPT.to_string()
    };

    if !config.language.eq_ignore_ascii_case("english") {
        prompt.push_str(&format!("\n\nWrite the entire report in {}.", config.language));
    }

    prompt
}

/// User prompt: contract name header plus every file delimited by its path
pub fn build_user_prompt(files: &[ContractFile], contract_name: &str) -> String {
    format!(
        "Audit the smart contract \"{}\".\n\n{}",
        contract_name,
        merge_contract_contents(files)
    )
}

fn api_error(value: &Value) -> String {
    value["error"]["message"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;

    fn file(path: &str, content: &str) -> ContractFile {
        ContractFile {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_system_prompt_super_default() {
        let config = AiConfig::default();
        let prompt = build_system_prompt(&config);
        assert!(prompt.contains("elite"));
        assert!(!prompt.contains("Write the entire report in"));
    }

    #[test]
    fn test_system_prompt_language_directive() {
        let config = AiConfig {
            super_prompt: false,
            language: "spanish".to_string(),
            ..AiConfig::default()
        };
        let prompt = build_system_prompt(&config);
        assert!(prompt.contains("Write the entire report in spanish."));
        assert!(!prompt.contains("elite"));
    }

    #[test]
    fn test_user_prompt_includes_all_files() {
        let files = vec![
            file("contracts/Token.sol", "contract Token {}"),
            file("contracts/Ownable.sol", "contract Ownable {}"),
        ];
        let prompt = build_user_prompt(&files, "Token");
        assert!(prompt.contains("\"Token\""));
        assert!(prompt.contains("// File: contracts/Token.sol"));
        assert!(prompt.contains("// File: contracts/Ownable.sol"));
        assert!(prompt.contains("contract Ownable {}"));
    }
}
