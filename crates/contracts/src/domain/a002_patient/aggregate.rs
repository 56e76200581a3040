use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, AggregateRoot, Destination, EntityMetadata, Place};
use crate::string_enum;

string_enum! {
    pub enum Gender {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        Other => ("other", "Other"),
    }
}

/// Who to call about the patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relation: String,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Patient record, created at intake and read afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub phone: Option<String>,
    pub medical_condition: String,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub emergency_contact: EmergencyContact,
    pub pickup_location: Place,
    pub destination: Destination,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Patient {
    pub fn new_for_insert(dto: PatientDto) -> Self {
        Self {
            id: new_id(),
            name: dto.name.trim().to_string(),
            age: dto.age,
            gender: dto.gender,
            phone: dto.phone.filter(|p| !p.trim().is_empty()),
            medical_condition: dto.medical_condition,
            allergies: dto.allergies,
            medications: dto.medications,
            emergency_contact: dto.emergency_contact,
            pickup_location: dto.pickup_location,
            destination: dto.destination,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn update(&mut self, dto: PatientDto) {
        self.name = dto.name.trim().to_string();
        self.age = dto.age;
        self.gender = dto.gender;
        self.phone = dto.phone.filter(|p| !p.trim().is_empty());
        self.medical_condition = dto.medical_condition;
        self.allergies = dto.allergies;
        self.medications = dto.medications;
        self.emergency_contact = dto.emergency_contact;
        self.pickup_location = dto.pickup_location;
        self.destination = dto.destination;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Patient name cannot be empty".into());
        }
        if !(0..=150).contains(&self.age) {
            return Err(format!("Age {} is out of range", self.age));
        }
        if self.medical_condition.trim().is_empty() {
            return Err("Medical condition cannot be empty".into());
        }
        if self.emergency_contact.name.trim().is_empty()
            || self.emergency_contact.phone.trim().is_empty()
        {
            return Err("Emergency contact needs a name and a phone".into());
        }
        self.pickup_location.validate()?;
        self.destination.validate()?;
        Ok(())
    }
}

impl AggregateRoot for Patient {
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
        "a002"
    }

    fn collection_name() -> &'static str {
        "patient"
    }

    fn element_name() -> &'static str {
        "Patient"
    }

    fn list_name() -> &'static str {
        "Patients"
    }
}

/// Create / edit form of a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDto {
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub phone: Option<String>,
    pub medical_condition: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub emergency_contact: EmergencyContact,
    pub pickup_location: Place,
    pub destination: Destination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> PatientDto {
        PatientDto {
            name: "Robert Johnson".into(),
            age: 65,
            gender: Gender::Male,
            phone: Some("".into()),
            medical_condition: "Cardiac arrest".into(),
            allergies: vec!["Penicillin".into()],
            medications: vec!["Aspirin".into()],
            emergency_contact: EmergencyContact {
                name: "Mary Johnson".into(),
                phone: "+1555333444".into(),
                relation: "Wife".into(),
            },
            pickup_location: Place {
                lat: 40.7505,
                lng: -73.9934,
                address: "123 Main St, New York, NY 10001".into(),
            },
            destination: Destination {
                lat: 40.7794,
                lng: -73.9632,
                address: "1234 Hospital Dr, New York, NY 10021".into(),
                hospital_name: "NYC General Hospital".into(),
            },
        }
    }

    #[test]
    fn test_blank_phone_is_dropped() {
        let patient = Patient::new_for_insert(sample_dto());
        assert_eq!(patient.phone, None);
        assert!(patient.validate().is_ok());
    }

    #[test]
    fn test_validate_age_and_contact() {
        let mut patient = Patient::new_for_insert(sample_dto());
        patient.age = -1;
        assert!(patient.validate().is_err());

        let mut patient = Patient::new_for_insert(sample_dto());
        patient.emergency_contact.phone = String::new();
        assert!(patient.validate().is_err());
    }
}
