//! Compliance tracking for certificates, maintenance, audits, corrective actions and
//! safety management reviews.
//!
//! This module handles:
//! - Status classification from due and expiry dates
//! - Threshold-based notification planning with deduplication
//! - Rollover of recurring maintenance tasks and reviews
//! - The daily batch and its scheduler
//!
//! ## Submodules
//!
//! - `document` - The `Expirable` capability and the flattened `TrackedDocument`
//! - `classifier` - Date-driven status rules
//! - `notifications` - Threshold buckets and reconciliation with stored notifications
//! - `maintenance` - Recurrence intervals
//! - `reviews` - Risk- and interval-based review cycles
//! - `lifecycle` - Renewals, overrides, acknowledgement and resolution
//! - `batch` - One full pass over all document kinds
//! - `scheduler` - Daily timing and overlap protection

pub mod batch;
pub mod classifier;
pub mod document;
pub mod lifecycle;
pub mod maintenance;
pub mod notifications;
pub mod reviews;
pub mod scheduler;

pub use batch::{BatchReport, run_compliance_batch};
pub use classifier::{EXPIRING_SOON_DAYS, classify, recompute_status, status_for_dates};
pub use document::{Actor, Expirable, TrackedDocument};
pub use notifications::{
    LAPSED_THRESHOLD, PlannedNotification, Reconciliation, notification_bucket,
    plan_notification, reconcile,
};
pub use scheduler::{ComplianceScheduler, duration_until_next_run, spawn_daily_batch};
