pub mod d400_inspection_summary;
pub mod d401_maintenance_summary;
pub mod d402_ambulance_utilization;
pub mod d403_overdue_maintenance;
pub mod d404_dispatch_summary;

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use contracts::dashboards::BreakdownRow;

/// Reports look back this many days for "this month"
pub const MONTH_WINDOW_DAYS: i64 = 30;
pub const WEEK_WINDOW_DAYS: i64 = 7;

pub fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

/// Count occurrences of each code, sorted by code
pub fn breakdown<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<BreakdownRow> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for code in codes {
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| BreakdownRow {
            value: value.to_string(),
            count,
        })
        .collect()
}
