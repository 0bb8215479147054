//! SmartAudit CLI
//!
//! Probe an address across all supported chains, fetch its verified source,
//! and optionally run an AI security audit that lands as a markdown report.
//!
//! Usage:
//!   smart-audit <address>                       - probe only
//!   smart-audit <address> --chain ethereum      - probe + fetch source
//!   smart-audit <address> --chain base --audit  - full audit
//!
//! Environment:
//!   SMART_AUDIT_CONFIG - AI settings file (default: ./ai_config.json)
//!   GEMINI_API_KEY     - server-side Gemini fallback key
//!   RUST_LOG           - log level (default: info)

use smart_audit::{
    AiConfig, AnalysisDispatcher, AnalysisRequest, ChainRegistry, ContractProber, SourceFetcher,
};

use eyre::{eyre, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let address = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .ok_or_else(|| {
            eyre!("Usage: smart-audit <address> [--chain <slug>] [--audit]")
        })?;
    let chain = args
        .iter()
        .position(|a| a == "--chain")
        .and_then(|i| args.get(i + 1))
        .cloned();
    let audit = args.iter().any(|a| a == "--audit");

    let registry = Arc::new(ChainRegistry::from_env());

    // Step 1: probe everywhere
    let prober = ContractProber::new(registry.clone());
    let results = prober.check_on_chains(&address).await?;

    println!();
    println!("Probe results for {}:", address);
    for (slug, info) in &results {
        if info.exists {
            let kind = info
                .contract_type
                .map(|t| t.as_str())
                .unwrap_or("Unknown");
            let name = info.name.as_deref().unwrap_or("-");
            println!("  ✅ {:<10} {} ({})", slug, name, kind);
            if info.is_proxy == Some(true) {
                if let Some(implementation) = &info.implementation {
                    println!("     ↪ proxy to {}", implementation);
                }
            }
            if let Some(url) = registry.explorer_address_url(slug, &address) {
                println!("     {}", url);
            }
        } else {
            println!("  ▫️ {:<10} not found", slug);
        }
    }
    println!();

    let chain_slug = match chain {
        Some(slug) => slug,
        None => return Ok(()),
    };

    // Step 2: fetch verified source
    let fetcher = SourceFetcher::new(registry.clone());
    let source = fetcher.fetch(&chain_slug, &address, None, true).await?;
    info!(
        "📄 {} - {} verified file(s)",
        source.contract_name,
        source.files.len()
    );

    if !audit {
        for file in &source.files {
            println!("  {}", file.path);
        }
        return Ok(());
    }

    // Step 3: run the audit, cancellable with Ctrl+C
    let config = AiConfig::load();
    let dispatcher = AnalysisDispatcher::new();
    let cancel = CancellationToken::new();

    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Cancellation requested");
            cancel_on_signal.cancel();
        }
    });

    let request = AnalysisRequest {
        files: source.files,
        contract_name: source.contract_name,
    };
    // A cancelled analysis exits cleanly with no report and no error
    let result = match dispatcher.analyze(&request, &config, cancel).await {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => {
            info!("Analysis cancelled, no report written");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let file_name = smart_audit::report_file_name(
        config.model_name(),
        &config.language,
        config.super_prompt,
    );
    std::fs::write(&file_name, &result.report.analysis)?;
    info!("✅ Report written to {}", file_name);

    Ok(())
}
