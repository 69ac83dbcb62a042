//! Expiry tracking and notification service for maritime fleet compliance records.
//!
//! Crew and vessel certificates, planned maintenance, audits, audit findings and corrective
//! actions all carry a due or expiry date. This crate keeps their statuses in line with
//! those dates, raises one notification per threshold crossed and emails it to the owner.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::delivery::SmtpDelivery;

pub mod api;
pub mod compliance;
pub mod config;
pub mod delivery;
pub mod entity;
pub mod error;
pub mod repository;
pub mod templates;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub mailer: Arc<SmtpDelivery>,
    pub config: Arc<AppConfig>,
}
