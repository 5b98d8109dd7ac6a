//! Derived spending views computed from a batch of expense records
//!
//! Every operation is a pure function of its explicit inputs: callers pass
//! the record batch and a reference date, there is no ambient "current
//! user" or "current batch" state, and nothing is cached between calls.
//! Malformed-in-the-small input (empty batches, out-of-range dates) always
//! degrades to zero/empty output, never an error.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{CategoryFilter, ExpenseRecord};

/// Trailing-window size for the monthly series.
pub const DEFAULT_MONTH_WINDOW: usize = 6;

/// Row count for the "recent expenses" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Sum of all amounts in the batch. Empty input sums to zero.
pub fn total(batch: &[ExpenseRecord]) -> Decimal {
    batch.iter().map(|e| e.amount).sum()
}

/// Per-category sums, keyed by the raw category label.
///
/// Only categories that appear in the batch appear in the map; callers
/// must look up by key rather than rely on iteration order. Labels outside
/// the fixed category set are deliberately not folded into "Other" here —
/// that coercion is for icon lookup only, and doing it while bucketing
/// would merge unrelated spending.
pub fn category_totals(batch: &[ExpenseRecord]) -> HashMap<String, Decimal> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for expense in batch {
        *totals
            .entry(expense.category.clone())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

/// One calendar-month bucket of the trailing monthly series.
///
/// Keyed by (year, month) so two months that happen to render the same
/// label can never collide; [`MonthBucket::label`] is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub total: Decimal,
}

impl MonthBucket {
    /// Short "Jan 2024" form used as the chart axis label.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_default()
    }
}

/// Totals per calendar month over a trailing window of `window` months
/// ending at, and including, the month containing `now`.
///
/// The series always has exactly `window` entries in chronological order,
/// zero-filled where nothing was spent. Records dated outside the window
/// are dropped from this view only; they still count toward [`total`] and
/// [`category_totals`]. Callers wanting longer history pass a larger
/// window.
pub fn monthly_totals(batch: &[ExpenseRecord], window: usize, now: NaiveDate) -> Vec<MonthBucket> {
    let current = first_of_month(now);

    // Walk backwards from the current month, then flip into chronological
    // order.
    let mut buckets: Vec<MonthBucket> = (0..window)
        .map(|offset| {
            let month_start = current - Months::new(offset as u32);
            MonthBucket {
                year: month_start.year(),
                month: month_start.month(),
                total: Decimal::ZERO,
            }
        })
        .collect();
    buckets.reverse();

    for expense in batch {
        let (year, month) = (expense.date.year(), expense.date.month());
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == year && b.month == month)
        {
            bucket.total += expense.amount;
        }
    }

    buckets
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// First `limit` records of the batch, in the batch's own order.
///
/// No sorting happens here. "Recent" is only meaningful when the caller
/// supplies the batch date-descending, which is how the store glue hands
/// it over; an unsorted batch yields an unsorted prefix.
pub fn recent(batch: &[ExpenseRecord], limit: usize) -> &[ExpenseRecord] {
    &batch[..limit.min(batch.len())]
}

/// Records whose raw category label equals the filter exactly.
/// [`CategoryFilter::All`] returns the batch unchanged.
pub fn filter_by_category<'a>(
    batch: &'a [ExpenseRecord],
    filter: &CategoryFilter,
) -> Vec<&'a ExpenseRecord> {
    match filter {
        CategoryFilter::All => batch.iter().collect(),
        CategoryFilter::Only(category) => {
            batch.iter().filter(|e| e.category == *category).collect()
        }
    }
}

/// Parameters for a full [`AggregateView`] computation.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub month_window: usize,
    pub recent_limit: usize,
    pub filter: CategoryFilter,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            month_window: DEFAULT_MONTH_WINDOW,
            recent_limit: DEFAULT_RECENT_LIMIT,
            filter: CategoryFilter::All,
        }
    }
}

/// Everything the dashboard needs from one batch, computed on demand.
///
/// `by_category` and `by_month` are consumed directly as chart series;
/// the serialized form uses the camelCase names the rendering glue
/// expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateView {
    pub total: Decimal,
    pub by_category: HashMap<String, Decimal>,
    pub by_month: Vec<MonthBucket>,
    pub recent: Vec<ExpenseRecord>,
    pub filtered: Vec<ExpenseRecord>,
}

impl AggregateView {
    /// Compute every derived view of `batch` as of `now`.
    ///
    /// Valid for exactly the snapshot it was given; refetching the batch
    /// and recomputing is the caller's job.
    pub fn compute(batch: &[ExpenseRecord], now: NaiveDate, options: &ViewOptions) -> Self {
        let view = Self {
            total: total(batch),
            by_category: category_totals(batch),
            by_month: monthly_totals(batch, options.month_window, now),
            recent: recent(batch, options.recent_limit).to_vec(),
            filtered: filter_by_category(batch, &options.filter)
                .into_iter()
                .cloned()
                .collect(),
        };
        tracing::debug!(
            records = batch.len(),
            total = %view.total,
            categories = view.by_category.len(),
            "Computed aggregate view"
        );
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, ExpenseId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn expense(id: &str, amount: Decimal, category: &str, date: (i32, u32, u32)) -> ExpenseRecord {
        ExpenseRecord {
            id: ExpenseId(id.to_string()),
            owner_id: AccountId("user-1".to_string()),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_no_drift_over_many_additions() {
        // 0.10 added 1000 times is exactly 100 with decimal arithmetic
        let batch: Vec<ExpenseRecord> = (0..1000)
            .map(|i| expense(&format!("e{}", i), dec!(0.10), "Food", (2024, 1, 1)))
            .collect();
        assert_eq!(total(&batch), dec!(100.00));
    }

    #[test]
    fn test_category_totals_keeps_unknown_labels_distinct() {
        let batch = vec![
            expense("a", dec!(10), "Food", (2024, 1, 5)),
            expense("b", dec!(7), "Subscriptions", (2024, 1, 6)),
            expense("c", dec!(3), "Other", (2024, 1, 7)),
        ];
        let totals = category_totals(&batch);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals["Subscriptions"], dec!(7));
        assert_eq!(totals["Other"], dec!(3));
    }

    #[test]
    fn test_category_totals_tolerates_nonpositive_amounts() {
        // The write path rejects these; aggregation just sums what it got
        let batch = vec![
            expense("a", dec!(10), "Food", (2024, 1, 5)),
            expense("b", dec!(-4), "Food", (2024, 1, 6)),
            expense("c", Decimal::ZERO, "Food", (2024, 1, 7)),
        ];
        assert_eq!(category_totals(&batch)["Food"], dec!(6));
        assert_eq!(total(&batch), dec!(6));
    }

    #[test]
    fn test_monthly_totals_window_and_order() {
        let now = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let batch = vec![
            expense("a", dec!(10), "Food", (2024, 1, 5)),
            expense("b", dec!(20), "Food", (2024, 2, 10)),
            expense("c", dec!(5), "Transport", (2024, 2, 15)),
            // Outside the 2-month window: dropped from this view only
            expense("d", dec!(99), "Food", (2023, 11, 30)),
        ];
        let series = monthly_totals(&batch, 2, now);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label(), "Jan 2024");
        assert_eq!(series[0].total, dec!(10));
        assert_eq!(series[1].label(), "Feb 2024");
        assert_eq!(series[1].total, dec!(25));
    }

    #[test]
    fn test_monthly_totals_distinguishes_years() {
        // A 13-month window contains two Januaries; amounts must not merge
        let now = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let batch = vec![
            expense("a", dec!(1), "Food", (2024, 1, 10)),
            expense("b", dec!(2), "Food", (2025, 1, 10)),
        ];
        let series = monthly_totals(&batch, 13, now);
        assert_eq!(series.len(), 13);
        assert_eq!(series[0], MonthBucket { year: 2024, month: 1, total: dec!(1) });
        assert_eq!(series[12], MonthBucket { year: 2025, month: 1, total: dec!(2) });
    }

    #[test]
    fn test_monthly_totals_window_crosses_year_boundary() {
        let now = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let series = monthly_totals(&[], 6, now);
        let labels: Vec<String> = series.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec!["Sep 2023", "Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"]
        );
        assert!(series.iter().all(|b| b.total == Decimal::ZERO));
    }

    #[test]
    fn test_recent_is_an_unsorted_prefix() {
        let batch = vec![
            expense("a", dec!(1), "Food", (2024, 3, 1)),
            expense("b", dec!(2), "Food", (2024, 1, 1)),
            expense("c", dec!(3), "Food", (2024, 2, 1)),
        ];
        // Input order preserved verbatim, no sorting
        let prefix = recent(&batch, 2);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix[0].id, batch[0].id);
        assert_eq!(prefix[1].id, batch[1].id);

        assert_eq!(recent(&batch, 10).len(), 3);
        assert!(recent(&[], 5).is_empty());
    }

    #[test]
    fn test_filter_all_passes_through() {
        let batch = vec![
            expense("a", dec!(1), "Food", (2024, 1, 1)),
            expense("b", dec!(2), "Transport", (2024, 1, 2)),
        ];
        let out = filter_by_category(&batch, &CategoryFilter::All);
        assert_eq!(out.len(), 2);

        let food = filter_by_category(&batch, &CategoryFilter::only("Food"));
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].id, batch[0].id);

        // Exact-string equality, no case folding
        assert!(filter_by_category(&batch, &CategoryFilter::only("food")).is_empty());
    }

    #[test]
    fn test_compute_empty_batch() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let view = AggregateView::compute(&[], now, &ViewOptions::default());
        assert_eq!(view.total, Decimal::ZERO);
        assert!(view.by_category.is_empty());
        assert_eq!(view.by_month.len(), DEFAULT_MONTH_WINDOW);
        assert!(view.by_month.iter().all(|b| b.total == Decimal::ZERO));
        assert!(view.recent.is_empty());
        assert!(view.filtered.is_empty());
    }
}
