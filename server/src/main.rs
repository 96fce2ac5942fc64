// sweetshop/server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use sweetshop_server::config::{AppConfig, LogFormat};
use sweetshop_server::services::{auth_service, seed};
use sweetshop_server::state::AppState;
use sweetshop_server::store::{PgStockStore, PgUserStore};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
  let Some(database_url) = config.database_url.clone() else {
    tracing::warn!("DATABASE_URL not set; running on in-memory stores. Data is lost on restart.");
    return Ok(AppState::in_memory(config));
  };

  let pool = PgPoolOptions::new()
    .max_connections(10)
    .acquire_timeout(config.storage_timeout)
    .connect(&database_url)
    .await?;
  tracing::info!("Successfully connected to the database.");

  sqlx::migrate!("./migrations").run(&pool).await?;
  tracing::info!("Database migrations applied.");

  Ok(AppState::new(
    Arc::new(PgStockStore::new(pool.clone())),
    Arc::new(PgUserStore::new(pool)),
    config,
  ))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      std::process::exit(1);
    }
  };
  init_tracing(app_config.log_format);
  app_config.log_loaded();
  tracing::info!("Starting sweet shop server...");

  let server_address = app_config.server_address();
  let app_state = match build_state(app_config).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise storage.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };
  tracing::info!(ledger = ?app_state.storefront.ledger().config(), "Inventory ledger ready.");

  if let Some(bootstrap) = app_state.config.admin.clone() {
    if let Err(e) = auth_service::ensure_admin(&app_state, &bootstrap).await {
      tracing::error!(error = %e, "Failed to create the bootstrap admin account.");
    }
  }

  if app_state.config.seed_db {
    if let Err(e) = seed::seed_catalog(&app_state.storefront).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  tracing::info!("Attempting to bind server to {}...", server_address);
  let state_data = actix_data::Data::new(app_state);
  HttpServer::new(move || {
    App::new()
      .app_data(state_data.clone())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(sweetshop_server::web::configure_app)
  })
  .bind(&server_address)?
  .run()
  .await
}
