use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d400_inspection_summary::{InspectionCounts, InspectionSummary};
use contracts::domain::a005_driver_inspection::aggregate::ReadinessStatus;
use sea_orm::ConnectionTrait;

use crate::dashboards::{breakdown, days_before, MONTH_WINDOW_DAYS, WEEK_WINDOW_DAYS};
use crate::domain::a005_driver_inspection::repository as driver_repository;
use crate::domain::a006_paramedic_inspection::repository as paramedic_repository;

/// Inspection counts for today, the last week and the last month
pub async fn get_inspection_summary(
    conn: &impl ConnectionTrait,
    today: NaiveDate,
) -> Result<InspectionSummary> {
    let month_start = days_before(today, MONTH_WINDOW_DAYS);

    let driver = driver_repository::list_since(conn, month_start).await?;
    let paramedic = paramedic_repository::list_since(conn, month_start).await?;

    Ok(InspectionSummary {
        driver_inspections: count_inspections(
            driver.iter().map(|i| (i.date, i.overall_status)),
            today,
        ),
        paramedic_inspections: count_inspections(
            paramedic.iter().map(|i| (i.date, i.overall_status)),
            today,
        ),
    })
}

/// `rows` are `(date, overall_status)` of inspections within the month window
fn count_inspections(
    rows: impl Iterator<Item = (NaiveDate, ReadinessStatus)>,
    today: NaiveDate,
) -> InspectionCounts {
    let week_start = days_before(today, WEEK_WINDOW_DAYS);
    let rows: Vec<_> = rows.collect();

    InspectionCounts {
        today: rows.iter().filter(|(date, _)| *date == today).count() as u64,
        week: rows.iter().filter(|(date, _)| *date >= week_start).count() as u64,
        month: rows.len() as u64,
        status_breakdown: breakdown(
            rows.iter()
                .filter(|(date, _)| *date >= week_start)
                .map(|(_, status)| status.as_str()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_windows() {
        let rows = vec![
            (day(20), ReadinessStatus::Ready),
            (day(18), ReadinessStatus::NeedsAttention),
            (day(10), ReadinessStatus::Ready),
            (day(1), ReadinessStatus::OutOfService),
        ];
        let counts = count_inspections(rows.into_iter(), day(20));
        assert_eq!(counts.today, 1);
        assert_eq!(counts.week, 2);
        assert_eq!(counts.month, 4);
        assert_eq!(counts.status_breakdown.len(), 2);
        assert!(counts
            .status_breakdown
            .iter()
            .all(|row| row.count == 1 && row.value != "out_of_service"));
    }
}
