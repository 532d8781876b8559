//! Axum-based HTTP server.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use ballot_election::Election;
use ballot_store::BallotStore;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{VOTER_ID_HEADER, VOTER_ROLE_HEADER};
use crate::handlers;
use crate::{ApiMetrics, RpcError};

/// Any store the server can run on.
pub trait StoreBackend: BallotStore + Send + Sync + 'static {}

impl<T: BallotStore + Send + Sync + 'static> StoreBackend for T {}

/// Shared handler state. Cloned per request; everything inside is shared.
pub struct AppState<S> {
    pub election: Election<S>,
    pub metrics: Arc<ApiMetrics>,
    pub started_at: Instant,
}

impl<S: StoreBackend> AppState<S> {
    pub fn new(election: Election<S>, metrics: Arc<ApiMetrics>) -> Self {
        Self {
            election,
            metrics,
            started_at: Instant::now(),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            election: self.election.clone(),
            metrics: Arc::clone(&self.metrics),
            started_at: self.started_at,
        }
    }
}

/// Build the API router.
///
/// With `cors_allow_any`, browsers on any origin may call the API, which
/// is what a separately hosted dashboard needs.
pub fn router<S: StoreBackend>(state: AppState<S>, cors_allow_any: bool) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health::<S>))
        .route("/metrics", get(handlers::metrics::<S>))
        .route(
            "/candidates",
            get(handlers::list_candidates::<S>).post(handlers::create_candidate::<S>),
        )
        .route(
            "/candidates/:id",
            get(handlers::get_candidate::<S>).delete(handlers::delete_candidate::<S>),
        )
        .route("/candidates/:id/vote", post(handlers::cast_vote::<S>))
        .route("/me", get(handlers::me::<S>))
        .route("/results", get(handlers::results::<S>))
        .route("/audit", get(handlers::audit::<S>))
        .with_state(state);

    if cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(VOTER_ID_HEADER),
                HeaderName::from_static(VOTER_ROLE_HEADER),
            ])
            .max_age(Duration::from_secs(60 * 60));
        app.layer(cors)
    } else {
        app
    }
}

pub struct RpcServer {
    pub bind_address: String,
    pub port: u16,
    pub cors_allow_any: bool,
}

impl RpcServer {
    pub fn new(bind_address: impl Into<String>, port: u16, cors_allow_any: bool) -> Self {
        Self {
            bind_address: bind_address.into(),
            port,
            cors_allow_any,
        }
    }

    /// Bind and serve until `shutdown` resolves, then drain in-flight
    /// requests and return.
    pub async fn start<S, F>(&self, state: AppState<S>, shutdown: F) -> Result<(), RpcError>
    where
        S: StoreBackend,
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(state, self.cors_allow_any);
        let addr = format!("{}:{}", self.bind_address, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("cannot bind {addr}: {e}")))?;
        tracing::info!(%addr, "HTTP API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        tracing::info!("HTTP API stopped");
        Ok(())
    }
}
