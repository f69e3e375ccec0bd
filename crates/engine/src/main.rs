//! DMForge Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dmforge_engine::api;
use dmforge_engine::app::App;
use dmforge_engine::infrastructure::fallback::FallbackChain;
use dmforge_engine::infrastructure::gemini::{
    GeminiClient, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};
use dmforge_engine::infrastructure::openai::{
    OpenAiClient, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
use dmforge_engine::infrastructure::ports::LlmPort;
use dmforge_engine::infrastructure::srd::{SrdClient, DEFAULT_SRD_BASE_URL};

const DEFAULT_GEMINI_FALLBACK_MODEL: &str = "gemini-1.5-pro";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dmforge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DMForge Engine");

    // Load configuration
    let gemini_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .ok()
        .filter(|k| !k.trim().is_empty());
    let gemini_base_url =
        std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into());
    let gemini_model =
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into());
    let gemini_fallback_model = std::env::var("GEMINI_FALLBACK_MODEL")
        .unwrap_or_else(|_| DEFAULT_GEMINI_FALLBACK_MODEL.into());
    let openai_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let openai_base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into());
    let openai_model =
        std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
    let srd_base_url = std::env::var("SRD_BASE_URL").unwrap_or_else(|_| DEFAULT_SRD_BASE_URL.into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .unwrap_or(8000);
    let call_timeout = std::env::var("LLM_CALL_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs);

    // Build the backend priority list: Gemini primary, Gemini fallback model,
    // then OpenAI if a key is configured.
    let mut backends: Vec<Arc<dyn LlmPort>> = Vec::new();
    if let Some(key) = &gemini_key {
        backends.push(Arc::new(GeminiClient::new(
            &gemini_base_url,
            &gemini_model,
            key,
        )));
        if gemini_fallback_model != gemini_model {
            backends.push(Arc::new(GeminiClient::new(
                &gemini_base_url,
                &gemini_fallback_model,
                key,
            )));
        }
    }
    if openai_key.is_some() {
        backends.push(Arc::new(OpenAiClient::new(
            &openai_base_url,
            &openai_model,
            openai_key.as_deref(),
        )));
    }
    if backends.is_empty() {
        anyhow::bail!("no LLM backend configured: set GEMINI_API_KEY or OPENAI_API_KEY");
    }
    tracing::info!(backends = backends.len(), "LLM fallback chain configured");

    let mut chain = FallbackChain::new(backends);
    if let Some(timeout) = call_timeout {
        chain = chain.with_call_timeout(timeout);
    }

    let srd = Arc::new(SrdClient::new(&srd_base_url));

    // Create application
    let app = Arc::new(App::new(Arc::new(chain), srd));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(allowed_origins) = allowed_origins else {
        return None;
    };

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
