//! mineshare-server: REST API over the share ledger.

use anyhow::Context;
use clap::Parser;
use mineshare_ledger::api::rest::{AppState, create_router};
use mineshare_ledger::application::Ledger;
use mineshare_ledger::application::services::{
    BackOfficeService, FundAllocationService, LedgerTransferProcessor, PaymentStatusPoller,
    SellQueueService, ShareTransferService, TransferProcessor,
};
use mineshare_ledger::config::{LedgerConfig, load_env_file};
use mineshare_ledger::infrastructure::callbacks::{
    HttpClient, RemotePaymentStatusSource, RemoteTransferProcessor,
};
use mineshare_ledger::infrastructure::persistence::postgres::PostgresEventStore;
use mineshare_ledger::telemetry::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mineshare-server")]
#[command(about = "Share transfer, fund allocation and sell queue API")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = load_env_file();
    let args = Args::parse();

    let mut config =
        LedgerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    init_tracing(&config.logging).context("failed to install tracing subscriber")?;
    if env_loaded {
        info!("loaded environment from .env");
    }

    let mut ledger = Ledger::in_memory();
    if let Some(db) = &config.database {
        let store = PostgresEventStore::connect_lazy(&db.url, db.max_connections)
            .context("failed to configure event store")?;
        if db.run_migrations {
            store
                .migrate()
                .await
                .context("failed to migrate event store")?;
            info!("event store migrations applied");
        }
        ledger = ledger.with_event_store(Arc::new(store));
        info!(max_connections = db.max_connections, "using PostgreSQL event store");
    }

    let processor: Arc<dyn TransferProcessor> = match &config.transfer_callback {
        Some(callback) => {
            let client = HttpClient::new(callback.timeout_ms, callback.api_key.as_deref())
                .context("failed to build callback client")?;
            info!(url = %callback.url, "transfers processed by callback endpoint");
            Arc::new(RemoteTransferProcessor::new(client, callback.url.clone()))
        }
        None => Arc::new(LedgerTransferProcessor::new(ledger.clone())),
    };

    let payments = match &config.payment_status {
        Some(status) => {
            let client = HttpClient::new(status.timeout_ms, status.api_key.as_deref())
                .context("failed to build payment status client")?;
            let source = RemotePaymentStatusSource::new(client, &status.url)
                .context("invalid payment status url")?;
            info!(url = %status.url, "payment deposits confirmed by status endpoint");
            Some(PaymentStatusPoller::new(Arc::new(source), config.payment_polling))
        }
        None => None,
    };

    let state = AppState {
        transfers: ShareTransferService::new(ledger.clone(), config.fee_schedule()?, processor),
        allocations: FundAllocationService::new(ledger.clone()),
        sell_queue: SellQueueService::new(ledger.clone(), config.selling_rules()?),
        back_office: BackOfficeService::new(ledger, payments),
    };
    let router = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "mineshare-server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("mineshare-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
