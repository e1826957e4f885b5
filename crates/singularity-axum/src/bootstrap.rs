//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete port implementations are chosen here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use singularity_core::{
    ChatOrchestrator, ImageCompositorPort, ModelGateway, OrchestratorSettings, SimulatedGateway,
    validate_settings,
};
use singularity_imaging::VerticalCompositor;
use singularity_openai::{OpenAiClientConfig, OpenAiGateway};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default request body limit for image uploads (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Which model gateway answers requests.
#[derive(Debug, Clone)]
pub enum GatewayConfig {
    /// Offline keyword-classifier gateway; no API key needed.
    Simulated,
    /// OpenAI-compatible chat completions API.
    OpenAi(OpenAiClientConfig),
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::OpenAi(OpenAiClientConfig::default())
    }
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to static assets served at `/`.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Body limit for the image upload route.
    pub max_upload_bytes: usize,
    pub gateway: GatewayConfig,
    pub settings: OrchestratorSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ServerConfig {
    /// Create config with default values and the OpenAI gateway.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            cors: CorsConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            gateway: GatewayConfig::default(),
            settings: OrchestratorSettings::with_defaults(),
        }
    }

    /// Set the static directory served at `/`.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayConfig) -> Self {
        self.gateway = gateway;
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The single conversation orchestrator.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Body limit applied to the image upload route.
    pub max_upload_bytes: usize,
}

impl AxumContext {
    /// Wrap an orchestrator with the default upload limit.
    pub fn new(orchestrator: ChatOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub const fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Bootstrap the server context from configuration.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    validate_settings(&config.settings).context("Invalid orchestrator settings")?;

    let gateway_kind = match config.gateway {
        GatewayConfig::Simulated => "simulated",
        GatewayConfig::OpenAi(_) => "openai",
    };
    let gateway: Arc<dyn ModelGateway> = match &config.gateway {
        GatewayConfig::Simulated => {
            tracing::warn!(
                target: "singularity.bootstrap",
                "Using simulated model gateway; replies are canned"
            );
            Arc::new(SimulatedGateway::new())
        }
        GatewayConfig::OpenAi(client_config) => Arc::new(
            OpenAiGateway::new(client_config).context("Failed to build OpenAI client")?,
        ),
    };
    let compositor: Arc<dyn ImageCompositorPort> = Arc::new(VerticalCompositor::new());

    tracing::info!(
        target: "singularity.bootstrap",
        gateway = gateway_kind,
        text_model = %config.settings.text_model,
        vision_model = %config.settings.vision_model,
        history_limit = config.settings.history_limit,
        max_upload_bytes = config.max_upload_bytes,
        "Axum bootstrap complete"
    );

    let orchestrator = ChatOrchestrator::new(gateway, compositor, config.settings.clone());
    Ok(AxumContext::new(orchestrator).with_max_upload_bytes(config.max_upload_bytes))
}

/// Start the web server on the configured port.
///
/// If `config.static_dir` is set, `/` serves the static landing page.
/// Otherwise it answers with a JSON service description.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config)?;

    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("singularity listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_openai_gateway() {
        let config = ServerConfig::with_defaults();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(matches!(config.gateway, GatewayConfig::OpenAi(_)));
        assert!(matches!(config.cors, CorsConfig::AllowAll));
    }

    #[test]
    fn bootstrap_rejects_invalid_settings() {
        let mut config = ServerConfig::with_defaults().with_gateway(GatewayConfig::Simulated);
        config.settings.temperature = 3.0;
        let err = bootstrap(&config).err().unwrap();
        assert!(err.to_string().contains("Invalid orchestrator settings"));
    }

    #[test]
    fn bootstrap_simulated_gateway() {
        let config = ServerConfig {
            max_upload_bytes: 1024,
            ..ServerConfig::with_defaults().with_gateway(GatewayConfig::Simulated)
        };
        let ctx = bootstrap(&config).unwrap();
        assert_eq!(ctx.max_upload_bytes, 1024);
        assert_eq!(ctx.orchestrator.settings().text_model, "gpt-4o");
    }

    #[test]
    fn bootstrap_openai_without_key_still_builds() {
        // The key is checked per request, so startup succeeds
        let ctx = bootstrap(&ServerConfig::with_defaults());
        assert!(ctx.is_ok());
    }
}
