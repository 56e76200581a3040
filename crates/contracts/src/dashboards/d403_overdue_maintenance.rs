use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a007_maintenance_record::aggregate::MaintenanceType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueMaintenanceRecord {
    pub maintenance_id: String,
    pub ambulance_id: String,
    pub vehicle_number: String,
    pub maintenance_type: MaintenanceType,
    pub scheduled_date: NaiveDate,
    pub days_overdue: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbulanceDueForMaintenance {
    pub ambulance_id: String,
    pub vehicle_number: String,
    pub next_maintenance: NaiveDate,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueMaintenanceAlerts {
    pub overdue_maintenance_records: Vec<OverdueMaintenanceRecord>,
    pub ambulances_due_for_maintenance: Vec<AmbulanceDueForMaintenance>,
}
