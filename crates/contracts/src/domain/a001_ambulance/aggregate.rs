use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, AggregateRoot, EntityMetadata, GeoPoint};
use crate::string_enum;

string_enum! {
    /// Operational status of a vehicle.
    ///
    /// `assigned`, `en_route`, `at_scene` and `transporting` mirror the call
    /// the vehicle is attached to.
    pub enum AmbulanceStatus {
        Available => ("available", "Available"),
        Assigned => ("assigned", "Assigned"),
        EnRoute => ("en_route", "En Route"),
        AtScene => ("at_scene", "At Scene"),
        Transporting => ("transporting", "Transporting"),
        AtHospital => ("at_hospital", "At Hospital"),
        Maintenance => ("maintenance", "Maintenance"),
    }
}

impl Default for AmbulanceStatus {
    fn default() -> Self {
        AmbulanceStatus::Available
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A vehicle of the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambulance {
    pub id: String,
    pub vehicle_number: String,
    pub license_number: String,
    pub model: String,
    pub year: i32,
    pub status: AmbulanceStatus,
    pub location: Option<GeoPoint>,
    pub assigned_driver_id: Option<String>,
    pub assigned_paramedic_id: Option<String>,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub insurance_expiry: NaiveDate,
    pub equipment: Vec<String>,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Ambulance {
    /// Build a new vehicle from the create form
    pub fn new_for_insert(dto: AmbulanceDto) -> Self {
        Self {
            id: new_id(),
            vehicle_number: dto.vehicle_number.trim().to_string(),
            license_number: dto.license_number.trim().to_string(),
            model: dto.model,
            year: dto.year,
            status: dto.status.unwrap_or_default(),
            location: dto.location,
            assigned_driver_id: dto.assigned_driver_id,
            assigned_paramedic_id: dto.assigned_paramedic_id,
            last_maintenance: dto.last_maintenance,
            next_maintenance: dto.next_maintenance,
            insurance_expiry: dto.insurance_expiry,
            equipment: dto.equipment,
            metadata: EntityMetadata::new(),
        }
    }

    /// Apply the edit form. Status is left alone: it moves through dispatch
    /// or the dedicated status endpoint.
    pub fn update(&mut self, dto: AmbulanceDto) {
        self.vehicle_number = dto.vehicle_number.trim().to_string();
        self.license_number = dto.license_number.trim().to_string();
        self.model = dto.model;
        self.year = dto.year;
        self.location = dto.location;
        self.assigned_driver_id = dto.assigned_driver_id;
        self.assigned_paramedic_id = dto.assigned_paramedic_id;
        self.last_maintenance = dto.last_maintenance;
        self.next_maintenance = dto.next_maintenance;
        self.insurance_expiry = dto.insurance_expiry;
        self.equipment = dto.equipment;
    }

    pub fn is_available(&self) -> bool {
        self.status == AmbulanceStatus::Available
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.vehicle_number.is_empty() {
            return Err("Vehicle number cannot be empty".into());
        }
        if self.license_number.is_empty() {
            return Err("License number cannot be empty".into());
        }
        if self.model.trim().is_empty() {
            return Err("Model cannot be empty".into());
        }
        if !(1900..=2100).contains(&self.year) {
            return Err(format!("Year {} is out of range", self.year));
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if self.next_maintenance < self.last_maintenance {
            return Err("Next maintenance cannot precede the last one".into());
        }
        Ok(())
    }
}

impl AggregateRoot for Ambulance {
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
        "a001"
    }

    fn collection_name() -> &'static str {
        "ambulance"
    }

    fn element_name() -> &'static str {
        "Ambulance"
    }

    fn list_name() -> &'static str {
        "Ambulances"
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Create / edit form of a vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbulanceDto {
    pub vehicle_number: String,
    pub license_number: String,
    pub model: String,
    pub year: i32,
    /// Initial status, only honoured on create
    #[serde(default)]
    pub status: Option<AmbulanceStatus>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub assigned_driver_id: Option<String>,
    #[serde(default)]
    pub assigned_paramedic_id: Option<String>,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub insurance_expiry: NaiveDate,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// PATCH /ambulances/{id}/location/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdateDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// PATCH /ambulances/{id}/status/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateDto {
    pub status: AmbulanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> AmbulanceDto {
        AmbulanceDto {
            vehicle_number: " AMB-001 ".into(),
            license_number: "ABC123".into(),
            model: "Mercedes Sprinter".into(),
            year: 2022,
            status: None,
            location: Some(GeoPoint::new(40.7128, -74.0060)),
            assigned_driver_id: None,
            assigned_paramedic_id: None,
            last_maintenance: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            next_maintenance: NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            insurance_expiry: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            equipment: vec!["Defibrillator".into(), "Oxygen Tank".into()],
        }
    }

    #[test]
    fn test_new_vehicle_defaults_to_available() {
        let ambulance = Ambulance::new_for_insert(dto());
        assert_eq!(ambulance.status, AmbulanceStatus::Available);
        assert_eq!(ambulance.vehicle_number, "AMB-001");
        assert!(ambulance.validate().is_ok());
    }

    #[test]
    fn test_update_keeps_status() {
        let mut ambulance = Ambulance::new_for_insert(dto());
        ambulance.status = AmbulanceStatus::EnRoute;
        let mut edit = dto();
        edit.status = Some(AmbulanceStatus::Maintenance);
        edit.model = "Ford Transit".into();
        ambulance.update(edit);
        assert_eq!(ambulance.status, AmbulanceStatus::EnRoute);
        assert_eq!(ambulance.model, "Ford Transit");
    }

    #[test]
    fn test_validate_rejects_bad_year_and_dates() {
        let mut ambulance = Ambulance::new_for_insert(dto());
        ambulance.year = 1850;
        assert!(ambulance.validate().is_err());

        let mut ambulance = Ambulance::new_for_insert(dto());
        ambulance.next_maintenance = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(ambulance.validate().is_err());
    }
}
