//! Listing Pilot server binary.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use listing_pilot::adapters::ai::{
    OpenAiClient, OpenAiConfig, PassthroughReformatter, UnconfiguredChatModel,
};
use listing_pilot::adapters::http::{api_routes, ApiHandlers};
use listing_pilot::adapters::storage::{
    connect, migrate, InMemoryChatLog, InMemoryStateStore, PostgresChatLog, PostgresStateStore,
};
use listing_pilot::application::handlers::{AskHandler, DecideHandler, FeedbackHandler};
use listing_pilot::config::{AppConfig, StorageBackend};
use listing_pilot::domain::engine::Engine;
use listing_pilot::ports::{ChatLog, ChatModel, DraftReformatter, StateStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let (store, chat_log): (Arc<dyn StateStore>, Arc<dyn ChatLog>) = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            (
                Arc::new(InMemoryStateStore::new()) as Arc<dyn StateStore>,
                Arc::new(InMemoryChatLog::new(config.storage.chat_max_turns)) as Arc<dyn ChatLog>,
            )
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .expect("validated: postgres backend requires database_url");
            let pool = connect(url).await?;
            migrate(&pool).await?;
            tracing::info!("using postgres storage");
            (
                Arc::new(PostgresStateStore::new(pool.clone())) as Arc<dyn StateStore>,
                Arc::new(PostgresChatLog::new(pool, config.storage.chat_max_turns))
                    as Arc<dyn ChatLog>,
            )
        }
    };

    let (reformatter, chat_model): (Arc<dyn DraftReformatter>, Arc<dyn ChatModel>) =
        if config.ai.enabled() {
            let api_key = config
                .ai
                .api_key
                .as_ref()
                .expect("enabled implies api_key")
                .expose_secret()
                .clone();
            let client = Arc::new(OpenAiClient::new(
                OpenAiConfig::new(api_key)
                    .with_base_url(config.ai.base_url.clone())
                    .with_model(config.ai.model.clone())
                    .with_timeout(config.ai.timeout()),
            ));
            tracing::info!(model = %config.ai.model, "language model enabled");
            (
                client.clone() as Arc<dyn DraftReformatter>,
                client as Arc<dyn ChatModel>,
            )
        } else {
            tracing::info!("no language model configured, drafts are served verbatim");
            (
                Arc::new(PassthroughReformatter::new()) as Arc<dyn DraftReformatter>,
                Arc::new(UnconfiguredChatModel::new()) as Arc<dyn ChatModel>,
            )
        };

    let handlers = ApiHandlers::new(
        Arc::new(DecideHandler::new(Engine::new(), store.clone(), reformatter)),
        Arc::new(FeedbackHandler::new(store)),
        Arc::new(AskHandler::new(chat_log, chat_model)),
    );

    let app = api_routes(handlers)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listing-pilot listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
