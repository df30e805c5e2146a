//! ARGUS — Resolution-Source Monitoring & Arbitrage Signal Engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the engine against the live Gamma listing API, and runs the
//! ingest→poll→detect→signal loop with graceful shutdown.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use argus::config::AppConfig;
use argus::engine::Engine;

const BANNER: &str = r#"
    _    ____   ____ _   _ ____
   / \  |  _ \ / ___| | | / ___|
  / _ \ | |_) | |  _| | | \___ \
 / ___ \|  _ <| |_| | |_| |___) |
/_/   \_\_| \_\\____|\___/|____/

  Arbitrage & Resolution-Source Guarded Update Scanner
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_or_default("config.toml");

    init_logging();

    println!("{BANNER}");
    info!(
        engine_name = %cfg.engine.name,
        cycle_interval_secs = cfg.engine.cycle_interval_secs,
        gamma_url = %cfg.ingest.gamma_url,
        "ARGUS starting up"
    );

    let engine = Engine::from_config(&cfg)?;

    // -- Main loop ---------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.engine.cycle_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.engine.cycle_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match engine.run_update_cycle().await {
                    Ok(_) => log_cycle_summary(&engine),
                    Err(e) => error!(error = %e, "Cycle failed — continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    let snap = engine.state().load();
    info!(
        cycles = snap.cycle,
        markets = snap.markets.len(),
        signals = snap.signals.len(),
        "ARGUS shut down cleanly."
    );

    Ok(())
}

/// Log the headline numbers of the latest snapshot, plus the top signal
/// if there is one.
fn log_cycle_summary(engine: &Engine) {
    let snap = engine.state().load();
    info!(
        cycle = snap.cycle,
        markets = snap.markets.len(),
        opportunities = snap.opportunities.len(),
        signals = snap.signals.len(),
        "Cycle summary"
    );

    if let Some(top) = snap.signals.first() {
        info!(
            market_id = %top.market_id,
            action = %top.action,
            confidence = %top.confidence,
            v1 = format!("{:.2}", top.v1),
            v2 = format!("{:.2}", top.v2),
            source = %top.source_url,
            "Top signal"
        );
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("argus=info"));

    let json_logging = std::env::var("ARGUS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
