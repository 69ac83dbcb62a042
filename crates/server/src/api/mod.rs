//! API module providing HTTP endpoints for the compliance service.
//!
//! This module is organized into submodules:
//! - `documents` - Tracked documents, renewals and status overrides (/api/documents/*)
//! - `notifications` - Notification listing, acknowledgement and resolution (/api/notifications/*)
//! - `compliance` - On-demand batch runs (/api/compliance/*)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod compliance;
pub mod documents;
pub mod health;
pub mod notifications;
pub mod openapi;

pub use compliance::{COMPLIANCE_TAG, ComplianceAppState};
pub use documents::DOCUMENTS_TAG;
pub use health::MISC_TAG;
pub use notifications::NOTIFICATIONS_TAG;

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{Json, Router};
use hyper::StatusCode;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

use crate::AppResources;
use crate::compliance::{Actor, ComplianceScheduler};
use crate::error::ComplianceError;

/// Header naming the person behind a write request.
pub const ACTING_USER_HEADER: &str = "x-acting-user";

/// The acting account for a request, taken from [`ACTING_USER_HEADER`].
/// Requests without the header act as `anonymous`.
#[derive(Debug, Clone)]
pub struct ActingUser(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for ActingUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(Actor::ANONYMOUS);
        Ok(ActingUser(Actor::new(name)))
    }
}

/// Map a domain error onto a status code and `{"error": ...}` body.
pub fn error_response(e: ComplianceError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        ComplianceError::DocumentNotFound { .. } | ComplianceError::NotificationNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ComplianceError::MissingDueDate { .. }
        | ComplianceError::NotAnOverride(_)
        | ComplianceError::InvalidNotificationTransition { .. } => StatusCode::BAD_REQUEST,
        ComplianceError::Database(_) => {
            tracing::error!(
                name = "api.request.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Request failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": e.to_string() })))
}

/// Builds the router with all routes and middleware, plus the generated OpenAPI document.
pub fn build_router(
    app_resources: AppResources,
    scheduler: Arc<ComplianceScheduler>,
) -> (Router, utoipa::openapi::OpenApi) {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .merge(documents::router())
        .merge(notifications::router())
        .merge(compliance::router(ComplianceAppState { scheduler }))
        .routes(routes!(health::health))
        .layer(axum::Extension(app_resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    let router = router.merge(Redoc::with_url("/api-docs", api.clone()));
    (router, api)
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(app_resources, scheduler))]
pub async fn start_webserver(
    app_resources: AppResources,
    scheduler: Arc<ComplianceScheduler>,
) -> color_eyre::Result<()> {
    let listen_addr = app_resources.config.listen_addr.clone();
    let (router, _) = build_router(app_resources, scheduler);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(
        name = "api.server.listening",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        addr = %listen_addr,
        message = "Server running"
    );
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
