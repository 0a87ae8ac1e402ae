use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use action_service::config::Config;
use action_service::handlers;
use action_service::metrics::serve_metrics;
use action_service::middleware::SessionMiddleware;
use action_service::repository::{PgSessionStore, Repositories, SessionStore};
use action_service::services::{
    ActionService, RedisViewInvalidator, S3FileStore, UploadService, ViewInvalidator,
};

const SERVICE_NAME: &str = "action-service";

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {}", SERVICE_NAME);

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: env={}, http_port={}",
        config.app.env, config.app.http_port
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database pool created");

    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let invalidator: Arc<dyn ViewInvalidator> = Arc::new(
        RedisViewInvalidator::new(
            &config.redis.url,
            SERVICE_NAME.to_string(),
            config.redis.invalidation_channel.clone(),
        )
        .await
        .context("Failed to connect to Redis")?,
    );
    info!(channel = %config.redis.invalidation_channel, "View invalidation publisher ready");

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let file_store = S3FileStore::new(
        s3_client,
        config.upload.bucket.clone(),
        config.upload.public_base_url.clone(),
    );
    let uploads = UploadService::new(Arc::new(file_store)).with_max_bytes(config.upload.max_bytes);
    info!(bucket = %config.upload.bucket, "Upload store ready");

    let actions = ActionService::new(Repositories::postgres(pg_pool.clone()), invalidator);
    let sessions: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pg_pool.clone()));
    let cookie_name = config.session.cookie_name.clone();
    let upload_body_limit = config.upload.max_bytes.saturating_mul(2);

    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);
    info!("HTTP server listening on http://{}", http_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pg_pool.clone()))
            .app_data(web::Data::new(actions.clone()))
            .app_data(web::Data::new(uploads.clone()))
            .wrap(SessionMiddleware::new(sessions.clone(), &cookie_name))
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(handlers::health))
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure(upload_body_limit))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("{} shutting down", SERVICE_NAME);
    Ok(())
}
