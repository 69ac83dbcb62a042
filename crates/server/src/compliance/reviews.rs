//! Review cycles for ISM compliance items and safety procedures.
//!
//! Marking a review `completed` with a `last_reviewed_date` schedules the next one and makes
//! the record active again, the same way completed maintenance tasks roll over.

use time::{Date, Duration};

use crate::compliance::maintenance::add_months;
use crate::entity::{ComplianceStatus, RiskLevel, ism_compliance_item, safety_procedure};

/// Days between reviews of an ISM compliance item at the given risk.
pub fn review_interval_days(risk: RiskLevel) -> i64 {
    match risk {
        RiskLevel::High => 30,
        RiskLevel::Medium => 90,
        RiskLevel::Low => 180,
    }
}

pub fn ism_rollover_date(item: &ism_compliance_item::Model) -> Option<Date> {
    if item.status != ComplianceStatus::Completed {
        return None;
    }
    item.last_reviewed_date?
        .checked_add(Duration::days(review_interval_days(item.risk_level)))
}

pub fn procedure_rollover_date(procedure: &safety_procedure::Model) -> Option<Date> {
    if procedure.status != ComplianceStatus::Completed || procedure.review_interval_months < 1 {
        return None;
    }
    add_months(
        procedure.last_reviewed_date?,
        procedure.review_interval_months,
    )
}
