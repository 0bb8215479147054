//! Analysis Dispatcher
//!
//! Validates the AI configuration, builds the prompt from fetched source,
//! runs the provider request, and normalizes the resulting report. The
//! request races a [`CancellationToken`]; a cancelled analysis is a distinct
//! terminal state, not a provider failure.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AnalysisReport, AnalysisResult, ContractFile};
use crate::providers::ai::AiClient;
use crate::report::normalize_report;

/// Everything one analysis run needs besides the AI configuration
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub files: Vec<ContractFile>,
    pub contract_name: String,
}

#[derive(Default)]
pub struct AnalysisDispatcher {
    client: AiClient,
}

impl AnalysisDispatcher {
    pub fn new() -> Self {
        Self { client: AiClient::new() }
    }

    /// Run one analysis to completion or cancellation.
    ///
    /// Order matters: empty input and configuration problems are rejected
    /// before any network traffic, and a fired token wins the race against
    /// an in-flight provider request.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        config: &AiConfig,
        cancel: CancellationToken,
    ) -> AppResult<AnalysisResult> {
        if request.files.is_empty() {
            return Err(AppError::config_invalid("no source files to analyze"));
        }
        config.validate()?;

        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| AppError::config_invalid("no API key available for provider"))?;

        info!(
            "📊 Dispatching analysis of {} ({} file(s))",
            request.contract_name,
            request.files.len()
        );

        let analysis = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Analysis of {} cancelled", request.contract_name);
                return Err(AppError::cancelled());
            }
            result = self.client.analyze(config, &api_key, &request.files, &request.contract_name) => {
                result.map_err(|e| AppError::analysis_failed(e.to_string()))?
            }
        };

        Ok(AnalysisResult {
            report: AnalysisReport {
                analysis: normalize_report(&analysis),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiConfig, AiProvider};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            files: vec![ContractFile {
                name: "Token.sol".into(),
                path: "Token.sol".into(),
                content: "contract Token {}".into(),
            }],
            contract_name: "Token".into(),
        }
    }

    fn config_with_key() -> AiConfig {
        AiConfig {
            provider: AiProvider::Gpt,
            gpt_key: "test-key".into(),
            ..AiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_empty_files_rejected_before_validation() {
        let dispatcher = AnalysisDispatcher::new();
        let empty = AnalysisRequest {
            files: vec![],
            contract_name: "Token".into(),
        };
        // Config has no key, but the empty input must be reported first
        let err = dispatcher
            .analyze(&empty, &AiConfig::default(), CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "CONFIG_INVALID");
        assert!(err.to_string().contains("no source files"));
    }

    #[tokio::test]
    async fn test_missing_key_rejected() {
        let dispatcher = AnalysisDispatcher::new();
        let config = AiConfig {
            provider: AiProvider::Claude,
            ..AiConfig::default()
        };
        let err = dispatcher
            .analyze(&request(), &config, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "CONFIG_INVALID");
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_wins() {
        let dispatcher = AnalysisDispatcher::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        // Valid config with a key: the biased select must take the
        // cancellation branch before any request is attempted.
        let err = dispatcher
            .analyze(&request(), &config_with_key(), cancel)
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "ANALYSIS_CANCELLED");
        assert!(err.is_cancelled());
    }
}
