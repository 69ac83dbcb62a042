//! Rescheduling of recurring maintenance tasks.
//!
//! A task marked `completed` with a calendar interval is rolled over to its next due date
//! and becomes active again. Running-hour tasks are left for the engine-hours tracking,
//! which this service does not own.

use time::{Date, Duration, Month};

use crate::entity::{ComplianceStatus, IntervalType, maintenance_task};

/// Add calendar months, clamping the day to the end of the target month.
pub fn add_months(date: Date, months: i32) -> Option<Date> {
    let index = date.year() * 12 + (i32::from(u8::from(date.month())) - 1) + months;
    let year = index.div_euclid(12);
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}

/// Next due date for an interval counted from `from`. `None` for running-hour tasks or
/// an interval value below one.
pub fn next_due_date(interval: IntervalType, value: i32, from: Date) -> Option<Date> {
    if value < 1 {
        return None;
    }
    let value_days = i64::from(value);
    match interval {
        IntervalType::Daily | IntervalType::CustomDays => {
            from.checked_add(Duration::days(value_days))
        }
        IntervalType::Weekly => from.checked_add(Duration::weeks(value_days)),
        IntervalType::Monthly => add_months(from, value),
        IntervalType::Quarterly => add_months(from, value.checked_mul(3)?),
        IntervalType::SemiAnnual => add_months(from, value.checked_mul(6)?),
        IntervalType::Annual => add_months(from, value.checked_mul(12)?),
        IntervalType::RunningHours => None,
    }
}

/// The rescheduled due date for a task, when it is due for rollover.
pub fn rollover_date(task: &maintenance_task::Model) -> Option<Date> {
    if task.status != ComplianceStatus::Completed {
        return None;
    }
    let completed = task.last_completed_date?;
    next_due_date(task.interval_type, task.interval_value, completed)
}
