//! `legal-drafter` server binary.
//!
//! Loads configuration from the environment, wires the OpenRouter agent with
//! the legal research tool, and serves the REST API.

use std::sync::Arc;

use http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use legal_drafter::adapters::ai::{LegalResearchTool, OpenRouterAgent, OpenRouterConfig};
use legal_drafter::adapters::http::{api_router, DraftingHandlers};
use legal_drafter::adapters::search::DuckDuckGoSearch;
use legal_drafter::adapters::storage::InMemorySessionStore;
use legal_drafter::application::{ConversationEngine, EngineConfig};
use legal_drafter::config::{AiConfig, AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    if !config.ai.has_api_key() {
        warn!("No OpenRouter API key configured; agent calls will fail until one is set");
    }

    let agent = build_agent(&config.ai)?;
    let engine = ConversationEngine::new(
        Arc::new(agent),
        EngineConfig::default().with_agent_timeout(config.ai.turn_timeout()),
    );
    let store = Arc::new(InMemorySessionStore::new());

    let app = api_router(DraftingHandlers::new(store, engine))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, model = %config.ai.model, "Legal drafter listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_agent(ai: &AiConfig) -> Result<OpenRouterAgent, Box<dyn std::error::Error>> {
    let search = DuckDuckGoSearch::new(ai.search_base_url.clone(), ai.search_timeout())?;
    let research = LegalResearchTool::new(Arc::new(search));

    let agent_config = OpenRouterConfig::new(ai.openrouter_api_key.clone())
        .with_model(ai.model.clone())
        .with_base_url(ai.base_url.clone())
        .with_temperature(ai.temperature)
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries)
        .with_max_tool_rounds(ai.max_tool_rounds)
        .with_attribution(ai.http_referer.clone(), ai.app_title.clone());

    Ok(OpenRouterAgent::new(agent_config, Some(research))?)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
