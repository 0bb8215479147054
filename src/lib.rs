//! SmartAudit Library
//!
//! AI-assisted smart contract audit engine:
//! - Concurrent contract probing across EVM chains (existence, token
//!   metadata, proxy detection, balances)
//! - Verified source retrieval through Etherscan-family explorers
//! - Analysis dispatch to GPT / Claude / Gemini / xAI with cancellation
//! - Deterministic report naming and markdown normalization

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod fetcher;
pub mod filters;
pub mod models;
pub mod prober;
pub mod providers;
pub mod report;
pub mod utils;

pub use config::{AiConfig, AiProvider, ChainConfig, ChainRegistry};
pub use dispatcher::{AnalysisDispatcher, AnalysisRequest};
pub use fetcher::{FetchedSource, SourceFetcher};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AnalysisReport, AnalysisResult, ChainContractInfo, ContractBasicInfo, ContractFile,
    ContractType,
};
pub use prober::{validate_address, ContractProber};
pub use providers::{AiClient, ExplorerClient, RpcProvider};
pub use report::{normalize_report, report_file_name, ReportList};
