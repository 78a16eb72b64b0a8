//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Rewrite tenant hostnames before route matching
//! - Bind server to listener with graceful shutdown

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router, ServiceExt,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::{util::MapRequestLayer, Layer, ServiceExt as _};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::ApiResponse;
use crate::http::{catalog, deploy, middleware::track_requests, rsvp, sites, wedding};
use crate::publish::Publisher;
use crate::routing::HostnameRouter;
use crate::security::{headers::apply_security_headers, limits::apply_limits};
use crate::sites::SiteStore;
use crate::templates::PageRenderer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub store: SiteStore,
    pub publisher: Arc<Publisher>,
    pub renderer: Arc<PageRenderer>,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build outbound HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the wedding-site service.
pub struct HttpServer {
    app: Router,
    hostnames: Arc<HostnameRouter>,
    config: Arc<SiteConfig>,
}

impl HttpServer {
    /// Create a new HTTP server over an explicitly constructed store.
    pub fn new(config: Arc<SiteConfig>, store: SiteStore) -> Result<Self, ServerError> {
        let publisher = Arc::new(Publisher::new(config.clone(), store.clone())?);
        let state = AppState {
            config: config.clone(),
            store,
            publisher,
            renderer: Arc::new(PageRenderer::new()),
        };

        let hostnames = Arc::new(HostnameRouter::from_config(&config.domain));
        let app = Self::build_router(&config, state);
        Ok(Self {
            app,
            hostnames,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let prefix = config.domain.tenant_route_prefix.trim_matches('/');

        let rsvp_routes = Router::new()
            .route("/api/rsvp", post(rsvp::submit_rsvp))
            .layer(CorsLayer::permissive());

        let router = Router::new()
            .route(&format!("/{prefix}/{{subdomain}}"), get(wedding::render_site))
            .route(&format!("/{prefix}/{{subdomain}}/"), get(wedding::render_site))
            .route("/api/deploy", post(deploy::deploy))
            .route(
                "/api/websites",
                get(sites::list_websites).post(sites::create_website),
            )
            .route(
                "/api/websites/{id}",
                get(sites::get_website)
                    .patch(sites::update_website)
                    .delete(sites::delete_website),
            )
            .route("/api/websites/{id}/publish", post(deploy::publish_website))
            .route("/api/websites/{id}/unpublish", post(deploy::unpublish_website))
            .route("/api/websites/{id}/photos", post(sites::add_photo))
            .route("/api/websites/{id}/rsvps", get(sites::list_rsvps))
            .route("/api/templates", get(catalog::list_templates))
            .route("/health", get(catalog::health))
            .merge(rsvp_routes)
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn(track_requests));

        let router = if config.security.enable_headers {
            apply_security_headers(router)
        } else {
            router
        };

        apply_limits(router, &config.security, &config.timeouts)
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %req.request_id(),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// Serve one request the way the listener would: rewrite, then route.
    pub async fn handle(&self, req: Request<Body>) -> Response {
        let req = self.hostnames.rewrite_request(req);
        match self.app.clone().oneshot(req).await {
            Ok(res) => res,
            Err(never) => match never {},
        }
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            primary_domain = %self.config.domain.primary_domain,
            "HTTP server starting"
        );

        let hostnames = self.hostnames.clone();
        let rewrite = MapRequestLayer::new(move |req: Request<Body>| hostnames.rewrite_request(req));
        let app = rewrite.layer(self.app);

        axum::serve(listener, ServiceExt::<Request<Body>>::into_make_service(app))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Not found")),
    )
        .into_response()
}
