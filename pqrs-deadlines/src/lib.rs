//! Business-day response deadlines for regulatory PQRS requests
//!
//! Provides:
//! - The regulatory category table mapping request kinds to allotted
//!   business days
//! - Due-date computation that skips Saturdays and Sundays (no holiday
//!   calendar)
//! - Deadline status classification for overdue / approaching views
//!
//! All computations are pure; only the convenience constructors read the
//! system clock.

pub mod calculator;
pub mod category;

pub use calculator::{
    Deadline, DeadlineCalculator, DeadlineRequest, DeadlineStatus,
    DEFAULT_APPROACHING_LOOKAHEAD_DAYS,
};
pub use category::{allotted_days, RequestCategory};
