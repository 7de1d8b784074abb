use serde::{Deserialize, Serialize};

/// API gateway configuration, assembled by the application from its config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address the HTTP server binds, e.g. "127.0.0.1:3000".
    pub bind_addr: String,
    /// Serve /openapi.json and the /docs page.
    #[serde(default)]
    pub enable_docs: bool,
    /// Origins allowed to call the API cross-origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            enable_docs: false,
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}
