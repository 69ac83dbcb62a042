//! OpenAPI/Utoipa configuration.

use crate::api::{
    ACTING_USER_HEADER, compliance::COMPLIANCE_TAG, documents::DOCUMENTS_TAG, health::MISC_TAG,
    notifications::NOTIFICATIONS_TAG,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

/// Documents the acting-user header used by write endpoints.
pub struct ActingUserAddon;

impl Modify for ActingUserAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "ActingUser",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    ACTING_USER_HEADER,
                    "Name recorded in the audit trail for writes. Defaults to `anonymous`.",
                ))),
            );
        }
    }
}

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    modifiers(&ActingUserAddon),
    info(
        title = "Fleet Compliance API",
        version = "1.0.0",
        description = "Expiry tracking and notifications for crew and vessel certificates, maintenance, audits and corrective actions."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = DOCUMENTS_TAG, description = "Tracked documents and their statuses"),
        (name = NOTIFICATIONS_TAG, description = "Expiry and due-date notifications"),
        (name = COMPLIANCE_TAG, description = "Compliance batch control")
    )
)]
pub struct ApiDoc;
