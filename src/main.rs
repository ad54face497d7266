// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::PathBuf, process};

use tracing_subscriber::EnvFilter;

use agile_wallet_server::{
    api::router,
    config,
    state::{AppState, WalletService},
    storage::SnapshotStore,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Open the snapshot database and restore whatever state it holds.
    let data_dir =
        PathBuf::from(env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| config::DEFAULT_DATA_DIR.to_string()));
    let db_path = data_dir.join(config::SNAPSHOT_DB_FILE);
    let storage = match SnapshotStore::open(&db_path) {
        Ok(storage) => storage,
        Err(error) => {
            tracing::error!(path = %db_path.display(), %error, "failed to open snapshot database");
            process::exit(1);
        }
    };
    let service = WalletService::load_from(&storage);
    let state = AppState::new(service, storage);
    let app = router(state);

    // Parse bind address
    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(error) => {
            tracing::error!(%host, port, %error, "failed to parse bind address");
            process::exit(1);
        }
    };

    tracing::info!(%addr, "Agile Wallet server listening (docs at /docs)");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%addr, %error, "failed to bind");
            process::exit(1);
        }
    };
    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "server failed");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    let json = env::var(config::LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
