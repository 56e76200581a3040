use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d403_overdue_maintenance::{
    AmbulanceDueForMaintenance, OverdueMaintenanceAlerts, OverdueMaintenanceRecord,
};
use sea_orm::ConnectionTrait;

use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::domain::a007_maintenance_record::repository as maintenance_repository;

/// Scheduled work past its date, and vehicles past their next service date
pub async fn get_overdue_maintenance(
    conn: &impl ConnectionTrait,
    today: NaiveDate,
) -> Result<OverdueMaintenanceAlerts> {
    let ambulances = ambulance_repository::list_all(conn).await?;
    let records = maintenance_repository::list_all(conn).await?;

    let vehicle_numbers: HashMap<&str, &str> = ambulances
        .iter()
        .map(|a| (a.id.as_str(), a.vehicle_number.as_str()))
        .collect();

    let overdue_maintenance_records = records
        .iter()
        .filter(|r| r.is_overdue(today))
        .map(|r| OverdueMaintenanceRecord {
            maintenance_id: r.id.clone(),
            ambulance_id: r.ambulance_id.clone(),
            vehicle_number: vehicle_numbers
                .get(r.ambulance_id.as_str())
                .map(|v| v.to_string())
                .unwrap_or_default(),
            maintenance_type: r.maintenance_type,
            scheduled_date: r.scheduled_date,
            days_overdue: r.days_overdue(today),
            description: r.description.clone(),
        })
        .collect();

    let mut ambulances_due_for_maintenance: Vec<AmbulanceDueForMaintenance> = ambulances
        .iter()
        .filter(|a| a.next_maintenance <= today)
        .map(|a| AmbulanceDueForMaintenance {
            ambulance_id: a.id.clone(),
            vehicle_number: a.vehicle_number.clone(),
            next_maintenance: a.next_maintenance,
            days_overdue: (today - a.next_maintenance).num_days(),
        })
        .collect();
    ambulances_due_for_maintenance.sort_by_key(|a| a.next_maintenance);

    Ok(OverdueMaintenanceAlerts {
        overdue_maintenance_records,
        ambulances_due_for_maintenance,
    })
}
