use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d401_maintenance_summary::MaintenanceSummary;
use contracts::domain::a007_maintenance_record::aggregate::{MaintenanceRecord, MaintenanceStatus};
use sea_orm::ConnectionTrait;

use crate::dashboards::{breakdown, days_before, MONTH_WINDOW_DAYS};
use crate::domain::a007_maintenance_record::repository;

pub async fn get_maintenance_summary(
    conn: &impl ConnectionTrait,
    today: NaiveDate,
) -> Result<MaintenanceSummary> {
    let records = repository::list_all(conn).await?;
    Ok(summarize(&records, today))
}

fn summarize(records: &[MaintenanceRecord], today: NaiveDate) -> MaintenanceSummary {
    let month_start = days_before(today, MONTH_WINDOW_DAYS);

    let completed: Vec<&MaintenanceRecord> = records
        .iter()
        .filter(|r| r.status == MaintenanceStatus::Completed)
        .filter(|r| r.completed_date.map_or(false, |d| d >= month_start))
        .collect();

    MaintenanceSummary {
        pending_maintenance: records
            .iter()
            .filter(|r| r.status == MaintenanceStatus::Scheduled)
            .count() as u64,
        completed_this_month: completed.len() as u64,
        monthly_cost: completed.iter().filter_map(|r| r.cost).sum(),
        overdue_maintenance: records.iter().filter(|r| r.is_overdue(today)).count() as u64,
        type_breakdown: breakdown(
            records
                .iter()
                .filter(|r| r.scheduled_date >= month_start)
                .map(|r| r.maintenance_type.as_str()),
        ),
    }
}
