use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::{middleware::from_fn, routing::get, Json, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::OpenApi;

mod config;
mod openapi;
pub mod request_id;
mod web;

pub use config::GatewayConfig;

/// Maximum accepted request body. The API only ever carries tiny JSON
/// payloads.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// API gateway: owns the HTTP server and wraps the mounted API surface
/// with the shared middleware stack.
pub struct ApiGateway {
    config: GatewayConfig,
}

impl ApiGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Assemble the full router around the mounted API routes.
    ///
    /// Middleware order (outermost to innermost): CatchPanic -> BodyLimit ->
    /// CORS -> Timeout -> SetRequestId -> Trace ->
    /// push_req_id_to_extensions -> PropagateRequestId -> routes.
    /// SetRequestId must wrap Trace so the span sees the generated id;
    /// PropagateRequestId sits innermost to copy the id onto the response.
    pub fn build_router(&self, api: Router) -> Result<Router> {
        let mut router = api.route("/health", get(web::health_check));

        if self.config.enable_docs {
            // Build once, serve as static JSON (no per-request serialization)
            let openapi_value = Arc::new(serde_json::to_value(openapi::ApiDoc::openapi())?);

            router = router
                .route(
                    "/openapi.json",
                    get({
                        use axum::response::IntoResponse;
                        let v = openapi_value.clone();
                        move || async move {
                            let json = Json((*v).clone());
                            ([(header::CACHE_CONTROL, "no-store")], json).into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        // Unmatched routes get the structured 404 body; a known path with
        // an unhandled verb is treated the same way
        router = router
            .fallback(web::route_not_found)
            .method_not_allowed_fallback(web::route_not_found);

        // 1. Copy x-request-id onto the response as it bubbles out
        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        // 2. Put request_id into extensions and span
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        // 3. Trace with request_id/status/latency
        router = router.layer(request_id::create_trace_layer());

        // 4. Generate x-request-id when missing; wraps the trace layer so
        // the span always carries a real id
        router = router.layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            request_id::MakeReqId,
        ));

        // 5. Timeout layer - 30 second cap per request
        router = router.layer(TimeoutLayer::new(Duration::from_secs(30)));

        // 6. CORS for the configured client origins
        router = router.layer(self.cors_layer()?);

        // 7. Body limit layer
        router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));

        // 8. Panics anywhere below become the generic 500 body
        router = router.layer(CatchPanicLayer::custom(web::handle_panic));

        Ok(router)
    }

    /// Validate the configuration without binding anything: the bind
    /// address must parse and every CORS origin must be a valid header
    /// value.
    pub fn validate(&self) -> Result<()> {
        self.config.bind_addr.parse::<SocketAddr>().map_err(|e| {
            anyhow::anyhow!("Invalid bind address '{}': {}", self.config.bind_addr, e)
        })?;
        self.cors_layer()?;
        Ok(())
    }

    /// CORS for the client origins: the four API verbs plus the headers the
    /// client sends. Authorization is accepted but never validated.
    fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
    }

    /// Bind, serve until cancelled, drain gracefully.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self.config.bind_addr.parse().map_err(|e| {
            anyhow::anyhow!("Invalid bind address '{}': {}", self.config.bind_addr, e)
        })?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        let shutdown = {
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::info!("HTTP server shutting down gracefully (cancellation)");
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
