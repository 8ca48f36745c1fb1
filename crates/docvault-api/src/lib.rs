//! # docvault-api
//!
//! HTTP layer for docvault: the upload coordinator and comment service, the
//! axum router, and error mapping. The `docvault-api` binary wires these to
//! PostgreSQL and the configured object store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::get;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

use docvault_core::{CommentRepository, DocumentCatalog, ObjectStore, MAX_UPLOAD_BYTES};
use docvault_db::Database;

pub use config::{AppConfig, StoreBackend, FILES_ROUTE};
pub use error::ApiError;
pub use services::{CommentService, CreateDocument, DocumentService};

/// Hard cap on request bodies.
///
/// Leaves room above the upload limit for multipart framing and for slightly
/// oversized files, which are rejected by the coordinator with a precise error.
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub documents: DocumentService,
    pub comments: CommentService,
    /// Database handle for the health probe. `None` when running on
    /// in-memory collaborators.
    pub db: Option<Database>,
}

impl AppState {
    /// Build the services from their collaborators.
    pub fn new(
        catalog: Arc<dyn DocumentCatalog>,
        comments: Arc<dyn CommentRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            documents: DocumentService::new(catalog.clone(), store),
            comments: CommentService::new(catalog, comments),
            db: None,
        }
    }

    /// Build the services on top of PostgreSQL.
    pub fn with_database(db: Database, store: Arc<dyn ObjectStore>) -> Self {
        let mut state = Self::new(db.documents.clone(), db.comments.clone(), store);
        state.db = Some(db);
        state
    }
}

/// Router options that come from deployment configuration.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Allowed CORS origins. Empty allows any origin.
    pub allowed_origins: Vec<HeaderValue>,
    /// Directory served under [`FILES_ROUTE`] when the filesystem store is used.
    pub files_dir: Option<PathBuf>,
}

/// Build the application router with all middleware applied.
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/documents",
            get(handlers::documents::list_documents).post(handlers::documents::create_document),
        )
        .route(
            "/documents/:id",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .route("/documents/:id/view", get(handlers::documents::view_document))
        .route(
            "/documents/:id/download",
            get(handlers::documents::download_document),
        )
        .route(
            "/documents/:id/comments",
            get(handlers::comments::list_comments).post(handlers::comments::create_comment),
        )
        .route(
            "/documents/:id/comments/:comment_id",
            get(handlers::comments::get_comment),
        );

    if let Some(dir) = options.files_dir {
        app = app.nest_service(FILES_ROUTE, ServeDir::new(dir));
    }

    let cors = {
        let allow_origin = if options.allowed_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(options.allowed_origins)
        };
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(std::time::Duration::from_secs(3600))
    };

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    app.layer(trace)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}
