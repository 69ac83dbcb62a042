//! Tracked document endpoints.
//!
//! - `GET /api/documents` - List documents, optionally by kind and status
//! - `POST /api/documents/{kind}/{id}/renew` - Record a new due or expiry date
//! - `POST /api/documents/{kind}/{id}/status` - Set or lift a manual status override

use axum::{
    Extension, Json,
    extract::{Path, Query},
    response::IntoResponse,
};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Date, OffsetDateTime};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::AppResources;
use crate::api::{ActingUser, error_response};
use crate::compliance::TrackedDocument;
use crate::compliance::lifecycle::{override_status, renew_document};
use crate::entity::{ComplianceStatus, DocumentKind};
use crate::repository::ComplianceStore;

/// Tag for OpenAPI documentation.
pub const DOCUMENTS_TAG: &str = "Documents API";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct DocumentFilter {
    /// Only documents of this kind.
    kind: Option<DocumentKind>,
    /// Only documents currently in this status.
    status: Option<ComplianceStatus>,
}

/// A tracked document as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
struct DocumentView {
    #[serde(flatten)]
    document: TrackedDocument,
    /// Calendar days until the due date as of today, negative once lapsed.
    days_remaining: Option<i64>,
}

impl DocumentView {
    fn new(document: TrackedDocument, as_of: Date) -> Self {
        let days_remaining = document.days_remaining(as_of);
        Self {
            document,
            days_remaining,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
struct RenewRequest {
    /// New expiry or due date.
    due_date: Date,
}

#[derive(Debug, Deserialize, ToSchema)]
struct StatusRequest {
    /// A manual status (`revoked`, `suspended`, `pending`, `cancelled`, `completed`),
    /// or `null` to return to the status derived from the dates.
    status: Option<ComplianceStatus>,
}

/// Creates the documents API router.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_documents))
        .routes(routes!(renew))
        .routes(routes!(set_status))
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/api/documents",
    operation_id = "List Documents",
    tag = DOCUMENTS_TAG,
    summary = "List tracked documents",
    description = "Returns certificates, maintenance tasks, audits, findings and corrective actions \
                   with their owner, due date and current status.",
    params(DocumentFilter),
    responses(
        (status = 200, description = "Matching documents", body = [DocumentView]),
        (status = 400, description = "Unknown kind or status"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn list_documents(
    Extension(resources): Extension<AppResources>,
    Query(filter): Query<DocumentFilter>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    let today = OffsetDateTime::now_utc().date();
    match store.list_documents(filter.kind, filter.status).await {
        Ok(documents) => {
            let views: Vec<DocumentView> = documents
                .into_iter()
                .map(|d| DocumentView::new(d, today))
                .collect();
            (StatusCode::OK, Json(json!(views)))
        }
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(skip(resources, actor))]
#[utoipa::path(
    post,
    path = "/api/documents/{kind}/{id}/renew",
    operation_id = "Renew Document",
    tag = DOCUMENTS_TAG,
    summary = "Record a renewal",
    description = "Stores the new due or expiry date and recomputes the status right away.\n\n\
                   Pending notifications raised for the previous date are superseded; sent and \
                   acknowledged ones are resolved. Manual overrides are kept.",
    params(
        ("kind" = DocumentKind, Path, description = "Document kind"),
        ("id" = i32, Path, description = "Document id")
    ),
    request_body(content = RenewRequest, description = "The new date"),
    responses(
        (status = 200, description = "Renewed document", body = DocumentView),
        (status = 404, description = "No such document", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    ),
    security(("ActingUser" = []))
)]
async fn renew(
    Extension(resources): Extension<AppResources>,
    ActingUser(actor): ActingUser,
    Path((kind, id)): Path<(DocumentKind, i32)>,
    Json(payload): Json<RenewRequest>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    let today = OffsetDateTime::now_utc().date();
    let result = renew_document(
        &store,
        kind,
        id,
        payload.due_date,
        &actor,
        today,
        resources.config.compliance.expiring_soon_days,
    )
    .await;
    match result {
        Ok(document) => (StatusCode::OK, Json(json!(DocumentView::new(document, today)))),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(skip(resources, actor))]
#[utoipa::path(
    post,
    path = "/api/documents/{kind}/{id}/status",
    operation_id = "Override Document Status",
    tag = DOCUMENTS_TAG,
    summary = "Set or lift a manual status",
    description = "Manual statuses freeze automatic classification until lifted. \
                   Sending `null` lifts the override and reapplies the date rules.",
    params(
        ("kind" = DocumentKind, Path, description = "Document kind"),
        ("id" = i32, Path, description = "Document id")
    ),
    request_body(content = StatusRequest, description = "The override"),
    responses(
        (status = 200, description = "Updated document", body = DocumentView),
        (status = 400, description = "Status is derived from dates and cannot be set by hand", content_type = "application/json"),
        (status = 404, description = "No such document", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    ),
    security(("ActingUser" = []))
)]
async fn set_status(
    Extension(resources): Extension<AppResources>,
    ActingUser(actor): ActingUser,
    Path((kind, id)): Path<(DocumentKind, i32)>,
    Json(payload): Json<StatusRequest>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    let today = OffsetDateTime::now_utc().date();
    let result = override_status(
        &store,
        kind,
        id,
        payload.status,
        &actor,
        today,
        resources.config.compliance.expiring_soon_days,
    )
    .await;
    match result {
        Ok(document) => (StatusCode::OK, Json(json!(DocumentView::new(document, today)))),
        Err(e) => error_response(e),
    }
}
