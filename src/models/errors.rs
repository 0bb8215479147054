//! Centralized Error Handling Module
//!
//! Every user-visible failure carries one of a small set of error codes.
//! Per-chain probe failures never reach this type - they degrade to an
//! absent entry inside the prober instead.

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Error code for logging and API responses
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Cancellation is a terminal state, not a failure - callers must
    /// not raise an error notification for it.
    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::AnalysisCancelled
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error taxonomy for the audit pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Address fails hex/length/checksum validation
    InvalidAddress,
    /// Chain slug or ID not present in the registry
    UnsupportedChain,
    /// Contract source is unverified or unavailable on the explorer
    SourceNotFound,
    /// AI provider or network failure during analysis
    AnalysisFailed,
    /// Analysis cancelled by the caller before the provider answered
    AnalysisCancelled,
    /// Invalid configuration (missing API key, empty file batch)
    ConfigInvalid,
    /// Anything else
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::UnsupportedChain => "UNSUPPORTED_CHAIN",
            Self::SourceNotFound => "SOURCE_NOT_FOUND",
            Self::AnalysisFailed => "ANALYSIS_FAILED",
            Self::AnalysisCancelled => "ANALYSIS_CANCELLED",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidAddress | Self::UnsupportedChain | Self::ConfigInvalid => 400,
            Self::SourceNotFound => 404,
            Self::AnalysisCancelled => 499,
            Self::AnalysisFailed => 502,
            Self::Unknown => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn invalid_address(address: &str) -> Self {
        Self::new(
            ErrorCode::InvalidAddress,
            format!("Invalid contract address: {}", address),
        )
    }

    pub fn unsupported_chain(chain: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedChain,
            format!("Unsupported chain: {}", chain),
        )
    }

    pub fn source_not_found(address: &str, chain: &str) -> Self {
        Self::new(
            ErrorCode::SourceNotFound,
            format!("Contract source not verified for {} on {}", address, chain),
        )
    }

    pub fn analysis_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AnalysisFailed, msg)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::AnalysisCancelled, "Analysis cancelled")
    }

    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, msg)
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "JSON error", err)
    }
}
