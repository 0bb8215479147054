//! API Request Handlers

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::types::*;
use crate::config::{AiConfig, ChainRegistry};
use crate::dispatcher::{AnalysisDispatcher, AnalysisRequest};
use crate::fetcher::SourceFetcher;
use crate::models::errors::AppError;
use crate::models::types::ChainContractInfo;
use crate::prober::ContractProber;
use crate::report::{report_file_name, ReportList};

/// Shared application state
pub struct AppState {
    pub registry: Arc<ChainRegistry>,
    pub prober: ContractProber,
    pub fetcher: SourceFetcher,
    pub dispatcher: AnalysisDispatcher,
    /// Reports produced this session; a re-run with identical settings
    /// replaces the earlier entry
    pub reports: Mutex<ReportList>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            prober: ContractProber::new(registry.clone()),
            fetcher: SourceFetcher::new(registry.clone()),
            dispatcher: AnalysisDispatcher::new(),
            reports: Mutex::new(ReportList::new()),
            registry,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: crate::utils::constants::APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        chains: state.registry.chains().len(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Contract Probe
// ============================================

pub async fn probe_contract(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProbeQuery>,
) -> Result<Json<ApiResponse<ChainContractInfo>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    let results = state.prober.check_on_chains(&query.address).await.map_err(|e| {
        (
            status_of(&e),
            Json(ApiResponse::error(
                (&e).into(),
                start.elapsed().as_secs_f64() * 1000.0,
            )),
        )
    })?;

    Ok(Json(ApiResponse::success(
        results,
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}

// ============================================
// Verified Source
// ============================================

/// Plain response shape (no envelope): `{files, contractName}` on success,
/// `{error}` otherwise.
pub async fn get_source(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<SourceData>, (StatusCode, Json<SourceError>)> {
    let result = state
        .fetcher
        .fetch(
            &query.chain,
            &query.address,
            query.implementation.as_deref(),
            query.follow_proxy.unwrap_or(true),
        )
        .await;
    match result {
        Ok(source) => Ok(Json(SourceData {
            files: source.files,
            contract_name: source.contract_name,
        })),
        Err(e) => {
            info!("Source fetch failed: {}", e);
            Err((
                status_of(&e),
                Json(SourceError {
                    error: e.message.clone(),
                }),
            ))
        }
    }
}

// ============================================
// Analysis
// ============================================

pub async fn analyze_contract(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalyzeData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    let fail = |e: AppError, start: Instant| {
        (
            status_of(&e),
            Json(ApiResponse::error(
                (&e).into(),
                start.elapsed().as_secs_f64() * 1000.0,
            )),
        )
    };

    // Stored configuration, with per-request overrides applied on top
    let mut config = AiConfig::load();
    if let Some(model) = req.model {
        config.selected_model = model;
    }
    if let Some(language) = req.language {
        config.language = language;
    }
    if let Some(super_prompt) = req.super_prompt {
        config.super_prompt = super_prompt;
    }

    // Uploaded batch wins; otherwise fetch verified source by chain+address
    let request = match req.files {
        Some(files) => {
            let files = crate::filters::dedupe_files(files);
            let contract_name = req.contract_name.unwrap_or_else(|| {
                crate::filters::find_main_contract(&files)
                    .map(|f| f.name.trim_end_matches(".sol").to_string())
                    .unwrap_or_else(|| "Contract".to_string())
            });
            AnalysisRequest { files, contract_name }
        }
        None => {
            let (chain, address) = match (&req.chain, &req.address) {
                (Some(chain), Some(address)) => (chain.clone(), address.clone()),
                _ => {
                    let e = AppError::config_invalid(
                        "either files or chain+address must be provided",
                    );
                    return Err(fail(e, start));
                }
            };
            let source = state
                .fetcher
                .fetch(
                    &chain,
                    &address,
                    req.implementation.as_deref(),
                    req.follow_proxy.unwrap_or(true),
                )
                .await
                .map_err(|e| fail(e, start))?;
            AnalysisRequest {
                files: source.files,
                contract_name: source.contract_name,
            }
        }
    };

    // The request future is dropped on client disconnect; the token exists
    // so in-process callers can abort explicitly too.
    let result = state
        .dispatcher
        .analyze(&request, &config, CancellationToken::new())
        .await
        .map_err(|e| {
            // Cancellation is a terminal state, not a failure
            if e.is_cancelled() {
                info!("Analysis cancelled for {}", request.contract_name);
            } else {
                error!("Analysis failed: {}", e);
            }
            fail(e, start)
        })?;

    let model = config.model_name().to_string();
    let data = AnalyzeData {
        contract_name: request.contract_name,
        file_name: report_file_name(&model, &config.language, config.super_prompt),
        model,
        analysis: result.report.analysis,
    };

    state
        .reports
        .lock()
        .await
        .insert(data.file_name.clone(), data.analysis.clone());

    Ok(Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}
