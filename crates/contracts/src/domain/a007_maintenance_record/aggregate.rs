use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, AggregateRoot, EntityMetadata};
use crate::string_enum;

string_enum! {
    pub enum MaintenanceType {
        Routine => ("routine", "Routine Maintenance"),
        Repair => ("repair", "Repair"),
        Inspection => ("inspection", "Inspection"),
        Emergency => ("emergency", "Emergency Repair"),
    }
}

string_enum! {
    pub enum MaintenanceStatus {
        Scheduled => ("scheduled", "Scheduled"),
        InProgress => ("in_progress", "In Progress"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

/// Scheduled or performed work on a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,
    pub ambulance_id: String,
    pub maintenance_type: MaintenanceType,
    pub status: MaintenanceStatus,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub description: String,
    pub cost: Option<f64>,
    pub vendor: Option<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl MaintenanceRecord {
    pub fn new_for_insert(dto: MaintenanceRecordDto) -> Self {
        Self {
            id: new_id(),
            ambulance_id: dto.ambulance_id,
            maintenance_type: dto.maintenance_type,
            status: dto.status.unwrap_or(MaintenanceStatus::Scheduled),
            scheduled_date: dto.scheduled_date,
            completed_date: dto.completed_date,
            description: dto.description,
            cost: dto.cost,
            vendor: dto.vendor.filter(|v| !v.trim().is_empty()),
            metadata: EntityMetadata::new(),
        }
    }

    pub fn update(&mut self, dto: MaintenanceRecordDto) {
        self.ambulance_id = dto.ambulance_id;
        self.maintenance_type = dto.maintenance_type;
        if let Some(status) = dto.status {
            self.status = status;
        }
        self.scheduled_date = dto.scheduled_date;
        self.completed_date = dto.completed_date;
        self.description = dto.description;
        self.cost = dto.cost;
        self.vendor = dto.vendor.filter(|v| !v.trim().is_empty());
    }

    /// Still scheduled after its date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == MaintenanceStatus::Scheduled && self.scheduled_date < today
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        (today - self.scheduled_date).num_days()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Description cannot be empty".into());
        }
        if let Some(cost) = self.cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err("Cost cannot be negative".into());
            }
        }
        if self.status == MaintenanceStatus::Completed && self.completed_date.is_none() {
            return Err("Completed maintenance needs a completion date".into());
        }
        Ok(())
    }
}

impl AggregateRoot for MaintenanceRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a007"
    }

    fn collection_name() -> &'static str {
        "maintenance_record"
    }

    fn element_name() -> &'static str {
        "Maintenance record"
    }

    fn list_name() -> &'static str {
        "Maintenance records"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecordDto {
    pub ambulance_id: String,
    pub maintenance_type: MaintenanceType,
    #[serde(default)]
    pub status: Option<MaintenanceStatus>,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    pub description: String,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub vendor: Option<String>,
}
