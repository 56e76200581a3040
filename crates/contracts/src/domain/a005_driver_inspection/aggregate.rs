use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, AggregateRoot, EntityMetadata};
use crate::string_enum;

string_enum! {
    pub enum Shift {
        Morning => ("morning", "Morning"),
        Afternoon => ("afternoon", "Afternoon"),
        Night => ("night", "Night"),
    }
}

string_enum! {
    /// Verdict of a shift inspection
    pub enum ReadinessStatus {
        Ready => ("ready", "Ready"),
        NeedsAttention => ("needs_attention", "Needs Attention"),
        OutOfService => ("out_of_service", "Out of Service"),
    }
}

string_enum! {
    pub enum VehicleCategory {
        Engine => ("engine", "Engine"),
        Fluids => ("fluids", "Fluids"),
        Brakes => ("brakes", "Brakes"),
        Tires => ("tires", "Tires"),
        Lights => ("lights", "Lights"),
        Safety => ("safety", "Safety"),
        Electrical => ("electrical", "Electrical"),
    }
}

string_enum! {
    pub enum Condition {
        Excellent => ("excellent", "Excellent"),
        Good => ("good", "Good"),
        Fair => ("fair", "Fair"),
        Poor => ("poor", "Poor"),
        Critical => ("critical", "Critical"),
    }
}

/// One line of the driver's checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInspectionItem {
    pub name: String,
    pub category: VehicleCategory,
    pub condition: Condition,
    pub needs_attention: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Start-of-shift vehicle check filed by a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInspection {
    pub id: String,
    pub driver_id: String,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub vehicle_inspection: Vec<VehicleInspectionItem>,
    pub mileage: i32,
    /// Percent
    pub fuel_level: i32,
    pub overall_status: ReadinessStatus,
    pub additional_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl DriverInspection {
    pub fn new_for_insert(dto: DriverInspectionDto, driver_id: String) -> Self {
        let metadata = EntityMetadata::new();
        Self {
            id: new_id(),
            driver_id,
            ambulance_id: dto.ambulance_id,
            date: dto.date,
            shift: dto.shift,
            vehicle_inspection: dto.vehicle_inspection,
            mileage: dto.mileage,
            fuel_level: dto.fuel_level,
            overall_status: dto.overall_status,
            additional_notes: dto.additional_notes,
            submitted_at: metadata.created_at,
            metadata,
        }
    }

    pub fn update(&mut self, dto: DriverInspectionDto) {
        self.ambulance_id = dto.ambulance_id;
        self.date = dto.date;
        self.shift = dto.shift;
        self.vehicle_inspection = dto.vehicle_inspection;
        self.mileage = dto.mileage;
        self.fuel_level = dto.fuel_level;
        self.overall_status = dto.overall_status;
        self.additional_notes = dto.additional_notes;
    }

    /// Items flagged for follow-up
    pub fn flagged_items(&self) -> impl Iterator<Item = &VehicleInspectionItem> {
        self.vehicle_inspection
            .iter()
            .filter(|item| item.needs_attention || item.condition == Condition::Critical)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.fuel_level) {
            return Err(format!("Fuel level {} must be between 0 and 100", self.fuel_level));
        }
        if self.mileage < 0 {
            return Err("Mileage cannot be negative".into());
        }
        if self.vehicle_inspection.iter().any(|i| i.name.trim().is_empty()) {
            return Err("Every inspection item needs a name".into());
        }
        Ok(())
    }
}

impl AggregateRoot for DriverInspection {
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
        "a005"
    }

    fn collection_name() -> &'static str {
        "driver_inspection"
    }

    fn element_name() -> &'static str {
        "Driver inspection"
    }

    fn list_name() -> &'static str {
        "Driver inspections"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverInspectionDto {
    /// Only admins may file on behalf of another driver
    #[serde(default)]
    pub driver_id: Option<String>,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(default)]
    pub vehicle_inspection: Vec<VehicleInspectionItem>,
    pub mileage: i32,
    pub fuel_level: i32,
    pub overall_status: ReadinessStatus,
    #[serde(default)]
    pub additional_notes: Option<String>,
}
