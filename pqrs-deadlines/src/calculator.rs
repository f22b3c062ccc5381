//! Business-day due-date computation
//!
//! A business day is Monday through Friday. No holiday calendar is
//! consulted; only weekends are excluded.

use crate::category::RequestCategory;
use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Days ahead of the due date at which a request counts as approaching.
pub const DEFAULT_APPROACHING_LOOKAHEAD_DAYS: u32 = 3;

/// Input to a deadline computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRequest {
    pub category: RequestCategory,
    /// When the countdown begins
    pub start_date: DateTime<Utc>,
}

impl DeadlineRequest {
    /// Start the countdown now.
    pub fn starting_now(category: RequestCategory) -> Self {
        Self {
            category,
            start_date: Utc::now(),
        }
    }
}

/// A resolved regulatory deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub category: RequestCategory,
    pub start_date: DateTime<Utc>,
    pub business_days_allotted: u32,
    pub due_date: DateTime<Utc>,
}

/// Where a request stands relative to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    OnTrack,
    /// Due within the lookahead window
    Approaching,
    Overdue,
}

/// Stateless deadline calculator
///
/// One logical instance per process, passed to callers explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineCalculator;

impl DeadlineCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a request to its concrete deadline.
    pub fn resolve(&self, request: &DeadlineRequest) -> Deadline {
        let business_days_allotted = request.category.allotted_business_days();

        Deadline {
            category: request.category,
            start_date: request.start_date,
            business_days_allotted,
            due_date: self.compute_due_date(business_days_allotted, request.start_date),
        }
    }

    /// Advance `start_date` by `business_days` weekdays.
    ///
    /// Walks forward one calendar day at a time and counts only days that
    /// are not Saturday or Sunday; `business_days = 0` returns the start
    /// date unchanged. The returned date is always a weekday for any
    /// positive count.
    pub fn compute_due_date(&self, business_days: u32, start_date: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = start_date;
        let mut counted = 0;

        while counted < business_days {
            date = date + Duration::days(1);
            let weekday = date.weekday();
            if weekday != Weekday::Sat && weekday != Weekday::Sun {
                counted += 1;
            }
        }

        date
    }

    /// Classify a request against its due date with the default
    /// 3-day approaching window.
    pub fn status(&self, due_date: DateTime<Utc>, now: DateTime<Utc>) -> DeadlineStatus {
        self.status_with_lookahead(due_date, now, DEFAULT_APPROACHING_LOOKAHEAD_DAYS)
    }

    /// Classify a request against its due date.
    ///
    /// `Overdue` once `now` has passed the due date; `Approaching` when the
    /// due date falls within `lookahead_days` calendar days of `now`.
    pub fn status_with_lookahead(
        &self,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
        lookahead_days: u32,
    ) -> DeadlineStatus {
        if due_date < now {
            return DeadlineStatus::Overdue;
        }
        if due_date <= now + Duration::days(i64::from(lookahead_days)) {
            return DeadlineStatus::Approaching;
        }
        DeadlineStatus::OnTrack
    }
}
