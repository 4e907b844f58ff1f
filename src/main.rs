//! # Raspisos Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database,
//! starts the broadcast service, and runs the Telegram bot alongside the
//! health endpoint.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod schedule;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::schedule::fetcher::CalendarFetcher;
use crate::services::broadcast::BroadcastService;
use crate::services::health::HealthService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raspisos_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Raspisos Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, Feed: {}, HTTP Port: {}",
        config.database_url, config.timetable_base_url, config.http_port
    );

    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    let fetcher = Arc::new(
        CalendarFetcher::new(config.timetable_base_url.clone(), config.cache_dir.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create calendar fetcher: {}", e))?,
    );

    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let handler = BotHandler::new(
        db_arc.as_ref().clone(),
        fetcher.clone(),
        config.admin_chat_id,
    );
    info!("Telegram bot initialized successfully");

    info!("Initializing broadcast service...");
    let mut broadcast_service =
        match BroadcastService::new(bot.clone(), db_arc.clone(), fetcher.clone()).await {
            Ok(service) => service,
            Err(e) => {
                tracing::error!("Failed to create broadcast service: {}", e);
                return Err(anyhow::anyhow!("Failed to create broadcast service: {}", e));
            }
        };

    if let Err(e) = broadcast_service.start().await {
        tracing::error!("Failed to start broadcast service: {}", e);
    } else {
        info!("Broadcast service started successfully");
    }

    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = broadcast_service.stop().await {
        tracing::warn!("Error stopping broadcast service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
