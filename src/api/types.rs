//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;
use crate::models::types::ContractFile;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
        }
    }
}

// ============================================
// Probe
// ============================================

#[derive(Debug, Deserialize)]
pub struct ProbeQuery {
    pub address: String,
}

// ============================================
// Source
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceQuery {
    pub chain: String,
    pub address: String,
    /// Known proxy implementation to fetch instead of the shell
    #[serde(default)]
    pub implementation: Option<String>,
    /// Set to false to get a proxy shell's own source
    #[serde(default)]
    pub follow_proxy: Option<bool>,
}

/// Success body of GET /api/source. Deliberately unwrapped: clients get
/// the files directly, not an envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    pub files: Vec<ContractFile>,
    pub contract_name: String,
}

/// Error body of GET /api/source
#[derive(Debug, Serialize)]
pub struct SourceError {
    pub error: String,
}

// ============================================
// Analysis
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Chain + address to fetch verified source for. Ignored when `files`
    /// carries an uploaded batch.
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Uploaded source batch, analyzed as-is
    #[serde(default)]
    pub files: Option<Vec<ContractFile>>,
    #[serde(default)]
    pub contract_name: Option<String>,
    /// Known proxy implementation, preferred over the explorer's report
    #[serde(default)]
    pub implementation: Option<String>,
    #[serde(default)]
    pub follow_proxy: Option<bool>,
    /// Overrides the stored selection when present
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub super_prompt: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeData {
    pub contract_name: String,
    pub model: String,
    /// Deterministic report file name for these settings
    pub file_name: String,
    pub analysis: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub chains: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_api_error_from_app_error() {
        let err = AppError::new(ErrorCode::UnsupportedChain, "Unsupported chain: moonchain");
        let api: ApiError = (&err).into();
        assert_eq!(api.code, "UNSUPPORTED_CHAIN");
        assert_eq!(api.message, "Unsupported chain: moonchain");
    }

    #[test]
    fn test_source_data_camel_case() {
        let data = SourceData {
            files: vec![],
            contract_name: "Token".to_string(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains(r#""contractName":"Token""#));
    }

    #[test]
    fn test_analyze_request_accepts_uploaded_batch() {
        let raw = r#"{"files":[{"name":"A.sol","path":"A.sol","content":"contract A {}"}],"contractName":"A","superPrompt":false}"#;
        let req: AnalyzeRequest = serde_json::from_str(raw).unwrap();
        assert!(req.chain.is_none());
        assert_eq!(req.files.as_ref().map(|f| f.len()), Some(1));
        assert_eq!(req.contract_name.as_deref(), Some("A"));
        assert_eq!(req.super_prompt, Some(false));
    }

    #[test]
    fn test_analyze_request_accepts_chain_address() {
        let raw = r#"{"chain":"base","address":"0xdac17f958d2ee523a2206206994597c13d831ec7"}"#;
        let req: AnalyzeRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.chain.as_deref(), Some("base"));
        assert!(req.files.is_none());
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let response = ApiResponse::success(42u32, 1.5);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""success":true"#));
        assert!(json.contains(r#""data":42"#));
        assert!(!json.contains("error"));
    }
}
