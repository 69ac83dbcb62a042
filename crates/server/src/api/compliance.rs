//! On-demand compliance batch runs.

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use hyper::StatusCode;
use serde_json::json;
use time::OffsetDateTime;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::AppResources;
use crate::api::ActingUser;
use crate::compliance::{Actor, BatchReport, ComplianceScheduler};
use crate::repository::ComplianceStore;

/// Tag for OpenAPI documentation.
pub const COMPLIANCE_TAG: &str = "Compliance API";

/// Shared state for compliance endpoints.
#[derive(Clone)]
pub struct ComplianceAppState {
    pub scheduler: Arc<ComplianceScheduler>,
}

/// Creates the compliance API router.
pub fn router(state: ComplianceAppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(run_batch))
        .with_state(state)
}

#[tracing::instrument(skip(state, resources, requested_by))]
#[utoipa::path(
    post,
    path = "/api/compliance/run",
    operation_id = "Run Compliance Batch",
    tag = COMPLIANCE_TAG,
    summary = "Run the compliance batch now",
    description = "Runs the same pass as the daily schedule, as of today's UTC date. \
                   Changes are recorded under the configured service account.",
    responses(
        (status = 200, description = "Batch finished", body = BatchReport),
        (status = 409, description = "A batch is already running", content_type = "application/json")
    ),
    security(("ActingUser" = []))
)]
async fn run_batch(
    State(state): State<ComplianceAppState>,
    Extension(resources): Extension<AppResources>,
    ActingUser(requested_by): ActingUser,
) -> impl IntoResponse {
    tracing::info!(
        name = "api.compliance.run_requested",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        requested_by = %requested_by,
        message = "Manual compliance batch requested"
    );
    let store = ComplianceStore::new(resources.db.clone());
    let actor = Actor::new(resources.config.compliance.service_account.clone());
    let report = state
        .scheduler
        .run_now(
            &store,
            resources.mailer.as_ref(),
            &resources.config,
            &actor,
            OffsetDateTime::now_utc().date(),
        )
        .await;
    match report {
        Some(report) => (StatusCode::OK, Json(json!(report))),
        None => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "compliance batch already running" })),
        ),
    }
}
