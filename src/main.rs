use clap::Parser;
use morse_beacon::core::{beacon, ConfigProvider};
use morse_beacon::utils::error::ErrorSeverity;
use morse_beacon::utils::{logger, validation::Validate};
use morse_beacon::{server, MorseEngine, MorseError, ServiceConfig, SymbolTable};
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::parse().resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting morse-beacon");
    if config.verbose {
        tracing::debug!("Service config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Service failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: ServiceConfig) -> Result<(), MorseError> {
    // The table is complete before anything can read it.
    let mut table = SymbolTable::new();
    table.load(SymbolTable::resolve_path(config.morse_table_path()));
    if table.is_empty() {
        tracing::warn!("Symbol table is empty, every token will decode to '?'");
    }
    let engine = MorseEngine::new(Arc::new(table));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poller = match beacon::start(&config, engine.clone(), shutdown_rx) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Beacon poller could not start: {}", e);
            beacon::PollerState::Idle
        }
    };

    let listener = server::bind(&config.bind_address()).await?;
    let router = server::build_router(engine);
    server::serve(listener, router, shutdown_signal()).await?;

    let _ = shutdown_tx.send(true);
    poller.join().await;
    tracing::info!("morse-beacon stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
