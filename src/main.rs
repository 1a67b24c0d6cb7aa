// Laudo - ECG exam review and report approval backend
// Copyright (c) 2026 Laudo Contributors
// Licensed under the MIT License

use laudo::adapters::memory::MemoryTable;
use laudo::api::{build_router, AppState};
use laudo::auth::JwtTokens;
use laudo::config::load_config;
use laudo::core::{ApprovalWorkflow, AssignmentWorkflow, LoginWorkflow, ProfileWorkflow};
use laudo::logging::init_logging;
use laudo::repositories::{ExamRepository, UserRepository};
use secrecy::ExposeSecret;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let config_path =
        std::env::var("LAUDO_CONFIG").unwrap_or_else(|_| "laudo.toml".to_string());
    let config = load_config(&config_path)?;

    let _guard = init_logging(&config.application.log_level, &config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        table = %config.storage.table_name,
        "Laudo - ECG exam review backend"
    );

    let store = Arc::new(MemoryTable::new());
    let users = UserRepository::new(store.clone());
    let exams = ExamRepository::new(store);
    let tokens = Arc::new(JwtTokens::new(
        config.auth.jwt_secret.expose_secret().as_ref(),
        config.auth.token_ttl_hours,
    ));

    let state = AppState {
        login: LoginWorkflow::new(users.clone(), tokens.clone()),
        profile: ProfileWorkflow::new(users.clone(), tokens.clone()),
        assignment: AssignmentWorkflow::new(users.clone(), exams.clone(), tokens.clone()),
        approval: ApprovalWorkflow::new(users, exams, tokens),
    };

    let addr = config.server.listen_addr();
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl+C), shutting down...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        } else {
            tracing::info!("Received SIGINT (Ctrl+C), shutting down...");
        }
    }
}
