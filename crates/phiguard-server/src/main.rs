//! PHI Guard Production Server
//!
//! This server provides:
//! - PHI scanning with risk assessment on /api/scan
//! - Lead capture and funnel statistics
//! - Payment proxying to Flutterwave and NOWPayments with verified webhooks
//! - Outreach sequence triggers
//! - Health and Prometheus metrics endpoints
//!
//! Usage:
//! ```bash
//! # With config file
//! phiguard-server --config config.yaml
//!
//! # Or with environment variables
//! FLUTTERWAVE_SECRET_KEY=your_key phiguard-server
//! ```
//!
//! Test with:
//! ```bash
//! curl http://localhost:5000/api/scan \
//!   -H "Content-Type: application/json" \
//!   -d '{"text": "Patient SSN: 123-45-6789"}'
//! ```

mod api;
mod config;
mod stats;

use api::AppState;
use clap::{Parser, Subcommand};
use config::ServerConfig;
use phiguard_observability::{health_router, HealthState, Metrics, ProviderStatus, ReadinessChecker};
use phiguard_outreach::OutreachSettings;
use phiguard_payments::{
    FlutterwaveConfig, FlutterwaveConnector, NowPaymentsConfig, NowPaymentsConnector,
};
use phiguard_scanner::{PhiScanner, ScannerConfig};
use stats::FunnelStats;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const SHIELD: &str = r#"
   ____  _   _ ___    ____                     _
  |  _ \| | | |_ _|  / ___|_   _  __ _ _ __ __| |
  | |_) | |_| || |  | |  _| | | |/ _` | '__/ _` |
  |  __/|  _  || |  | |_| | |_| | (_| | | | (_| |
  |_|   |_| |_|___|  \____|\__,_|\__,_|_|  \__,_|

  PHI scanning, risk scoring, and compliance funnel
"#;

/// PHI Guard Server - compliance scanner and funnel backend
#[derive(Parser)]
#[command(name = "phiguard-server")]
#[command(about = "PHI Guard compliance scanner and funnel server", long_about = None)]
#[command(before_help = SHIELD)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "PHIGUARD_CONFIG",
        global = true
    )]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the PHI Guard server (default if no command specified)
    Serve,
}

/// Readiness over the configured payment providers
struct ProviderReadiness {
    flutterwave: bool,
    nowpayments: bool,
}

impl ReadinessChecker for ProviderReadiness {
    fn is_ready(&self) -> bool {
        self.flutterwave || self.nowpayments
    }

    fn provider_statuses(&self) -> Vec<ProviderStatus> {
        let status = |configured: bool| {
            if configured {
                "configured".to_string()
            } else {
                "not_configured".to_string()
            }
        };
        vec![
            ProviderStatus {
                name: "flutterwave".to_string(),
                status: status(self.flutterwave),
            },
            ProviderStatus {
                name: "nowpayments".to_string(),
                status: status(self.nowpayments),
            },
        ]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) | None => {}
    }

    // Load configuration
    let mut config = if let Some(config_path) = cli.config {
        ServerConfig::from_file(&config_path)?
    } else {
        ServerConfig::default()
    };

    // Merge environment variables (they override config file)
    config.merge_env();

    // Initialize tracing with the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("{}", SHIELD);
    info!("Initializing PHI Guard server v{}", env!("CARGO_PKG_VERSION"));

    // Scanner with boundary guards from config
    let scanner = Arc::new(PhiScanner::with_config(ScannerConfig {
        max_input_bytes: Some(config.scanner.max_input_bytes),
    }));
    info!(
        "Scanner ready (max input {} bytes, timeout {}ms)",
        config.scanner.max_input_bytes, config.scanner.scan_timeout_ms
    );

    // Payment connectors
    let flutterwave = match &config.providers.flutterwave {
        Some(settings) if settings.enabled => match &settings.secret_key {
            Some(secret_key) => {
                let mut provider_config = FlutterwaveConfig::new(
                    secret_key.clone(),
                    settings.secret_hash.clone().unwrap_or_default(),
                );
                if let Some(base_url) = &settings.base_url {
                    provider_config = provider_config.with_base_url(base_url.clone());
                }
                if let Some(redirect_url) = &settings.redirect_url {
                    provider_config = provider_config.with_redirect_url(redirect_url.clone());
                }
                info!("Flutterwave provider enabled");
                if settings.secret_hash.is_none() {
                    warn!("Flutterwave secret hash missing - webhooks will be rejected");
                }
                Some(Arc::new(FlutterwaveConnector::new(provider_config)?))
            }
            None => {
                warn!("Flutterwave configured without a secret key - provider disabled");
                None
            }
        },
        _ => None,
    };

    let nowpayments = match &config.providers.nowpayments {
        Some(settings) if settings.enabled => match &settings.api_key {
            Some(api_key) => {
                let mut provider_config = NowPaymentsConfig::new(
                    api_key.clone(),
                    settings.ipn_secret.clone().unwrap_or_default(),
                );
                if let Some(base_url) = &settings.base_url {
                    provider_config = provider_config.with_base_url(base_url.clone());
                }
                if let Some(url) = &settings.ipn_callback_url {
                    provider_config = provider_config.with_ipn_callback_url(url.clone());
                }
                info!("NOWPayments provider enabled");
                Some(Arc::new(NowPaymentsConnector::new(provider_config)?))
            }
            None => {
                warn!("NOWPayments configured without an API key - provider disabled");
                None
            }
        },
        _ => None,
    };

    if flutterwave.is_none() && nowpayments.is_none() {
        warn!("No payment provider configured - payment routes will reject requests");
        warn!("    Set FLUTTERWAVE_SECRET_KEY or NOWPAYMENTS_API_KEY, or add");
        warn!("    provider sections to the configuration file");
    }

    // Observability
    let metrics = Arc::new(Metrics::new()?);
    let readiness = Arc::new(ProviderReadiness {
        flutterwave: flutterwave.is_some(),
        nowpayments: nowpayments.is_some(),
    });
    let health_state = HealthState::with_readiness_checker(metrics.clone(), readiness);

    // Funnel statistics accumulator, injected into the routes
    let stats = Arc::new(FunnelStats::new());

    let outreach = OutreachSettings {
        sender_name: config.outreach.sender_name.clone(),
        tool_link: config.outreach.tool_link.clone(),
        report_link: config.outreach.report_link.clone(),
    };

    let state = AppState {
        scanner,
        scan_timeout: Duration::from_millis(config.scanner.scan_timeout_ms),
        stats,
        metrics,
        flutterwave,
        nowpayments,
        outreach: outreach.clone(),
        nurture: Arc::new(api::SequenceLogger { settings: outreach }),
        started_at: Instant::now(),
    };

    let mut app = api::api_router(state).merge(health_router(health_state));

    if config.logging.log_requests {
        info!("Request/response logging enabled");
        app = app.layer(TraceLayer::new_for_http());
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("");
    info!("PHI Guard server listening on http://{}", addr);
    info!("   API endpoints:");
    info!("   - Scan:            POST http://{}/api/scan", addr);
    info!("   - Lead capture:    POST http://{}/api/capture-lead", addr);
    info!("   - Payments:        POST http://{}/api/process-payment", addr);
    info!("   - Dashboard:       GET  http://{}/api/dashboard", addr);
    info!("   Observability:");
    info!("   - Health check:       http://{}/healthz", addr);
    info!("   - Readiness check:    http://{}/readyz", addr);
    info!("   - Prometheus metrics: http://{}/metrics", addr);
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
