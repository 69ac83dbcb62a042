//! Notification endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query},
    response::IntoResponse,
};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::AppResources;
use crate::api::{ActingUser, error_response};
use crate::compliance::lifecycle::{acknowledge_notification, resolve_notification};
use crate::entity::{DocumentKind, NotificationStatus, notification};
use crate::repository::ComplianceStore;

/// Tag for OpenAPI documentation.
pub const NOTIFICATIONS_TAG: &str = "Notifications API";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct NotificationFilter {
    status: Option<NotificationStatus>,
    kind: Option<DocumentKind>,
}

/// Creates the notifications API router.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_notifications))
        .routes(routes!(acknowledge))
        .routes(routes!(resolve))
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    get,
    path = "/api/notifications",
    operation_id = "List Notifications",
    tag = NOTIFICATIONS_TAG,
    summary = "List notifications",
    description = "Newest first. Filter by delivery status and document kind.",
    params(NotificationFilter),
    responses(
        (status = 200, description = "Matching notifications", body = [notification::Model]),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn list_notifications(
    Extension(resources): Extension<AppResources>,
    Query(filter): Query<NotificationFilter>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    match store.list_notifications(filter.status, filter.kind).await {
        Ok(rows) => (StatusCode::OK, Json(json!(rows))),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(skip(resources, actor))]
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/acknowledge",
    operation_id = "Acknowledge Notification",
    tag = NOTIFICATIONS_TAG,
    summary = "Acknowledge a notification",
    description = "Marks a pending or sent notification as seen. The notification keeps its \
                   threshold slot, so the batch will not raise the same threshold again.",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Acknowledged notification", body = notification::Model),
        (status = 400, description = "Notification is resolved or superseded", content_type = "application/json"),
        (status = 404, description = "No such notification", content_type = "application/json")
    ),
    security(("ActingUser" = []))
)]
async fn acknowledge(
    Extension(resources): Extension<AppResources>,
    ActingUser(actor): ActingUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    match acknowledge_notification(&store, id, &actor).await {
        Ok(row) => (StatusCode::OK, Json(json!(row))),
        Err(e) => error_response(e),
    }
}

#[tracing::instrument(skip(resources, actor))]
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/resolve",
    operation_id = "Resolve Notification",
    tag = NOTIFICATIONS_TAG,
    summary = "Resolve a notification",
    description = "Closes a notification for good and frees its threshold slot.",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Resolved notification", body = notification::Model),
        (status = 400, description = "Notification was superseded", content_type = "application/json"),
        (status = 404, description = "No such notification", content_type = "application/json")
    ),
    security(("ActingUser" = []))
)]
async fn resolve(
    Extension(resources): Extension<AppResources>,
    ActingUser(actor): ActingUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let store = ComplianceStore::new(resources.db.clone());
    match resolve_notification(&store, id, &actor).await {
        Ok(row) => (StatusCode::OK, Json(json!(row))),
        Err(e) => error_response(e),
    }
}
