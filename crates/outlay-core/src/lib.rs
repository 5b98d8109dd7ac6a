//! Outlay Core Library
//!
//! Computational core of the Outlay expense tracker:
//! - Domain models for expense records and categories
//! - Aggregation engine producing the derived spending views (total,
//!   per-category and trailing-month breakdowns, recent/filtered lists)
//! - Transient notification manager with per-level TTLs and automatic
//!   expiry
//! - Display formatting helpers for amounts and dates
//!
//! Authentication, persistence, and chart rendering live outside this
//! crate. Callers fetch a record batch for the signed-in account, hand it
//! to [`AggregateView::compute`] (or the individual `aggregate`
//! functions), and feed the result to whatever renders it; operation
//! outcomes are surfaced to the user through the [`NotificationManager`].

pub mod aggregate;
pub mod error;
pub mod format;
pub mod models;
pub mod notify;

pub use aggregate::{
    category_totals, filter_by_category, monthly_totals, recent, total, AggregateView,
    MonthBucket, ViewOptions, DEFAULT_MONTH_WINDOW, DEFAULT_RECENT_LIMIT,
};
pub use error::{Error, Result};
pub use models::{AccountId, Category, CategoryFilter, ExpenseId, ExpenseRecord, NewExpense};
pub use notify::{
    Level, Notification, NotificationId, NotificationManager, Phase, DISMISS_ANIMATION,
};
