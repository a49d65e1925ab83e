//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, HttpPaymentProvider, ObjectStorage, PaymentProvider, S3Storage};
use crate::jobs::{EmailQueue, PostgresEmailQueue};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config).await);
    tracing::info!("Database connected");

    let cache = Arc::new(Cache::connect(&config).await);

    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::connect(&config).await);
    let provider: Arc<dyn PaymentProvider> = Arc::new(HttpPaymentProvider::new(&config));
    let email_queue: Arc<dyn EmailQueue> = Arc::new(PostgresEmailQueue::connect(&config).await?);

    let app_state = AppState::from_config(db, cache, storage, provider, email_queue, config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
