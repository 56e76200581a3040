use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, AggregateRoot, EntityMetadata};
use crate::string_enum;

string_enum! {
    pub enum TripStatus {
        Active => ("active", "Active"),
        Completed => ("completed", "Completed"),
    }
}

/// A patient transport, one per emergency call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub call_id: String,
    pub ambulance_id: String,
    pub patient_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Kilometers
    pub distance: f64,
    pub cost: f64,
    pub status: TripStatus,
    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Trip {
    pub fn new_for_insert(dto: TripDto) -> Self {
        Self {
            id: new_id(),
            call_id: dto.call_id,
            ambulance_id: dto.ambulance_id,
            patient_id: dto.patient_id,
            start_time: dto.start_time.unwrap_or_else(Utc::now),
            end_time: None,
            distance: dto.distance,
            cost: dto.cost,
            status: TripStatus::Active,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), String> {
        if self.status == TripStatus::Completed {
            return Err("Trip is already completed".into());
        }
        self.status = TripStatus::Completed;
        self.end_time = Some(at);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err("Distance cannot be negative".into());
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err("Cost cannot be negative".into());
        }
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err("Trip cannot end before it starts".into());
            }
        }
        Ok(())
    }
}

impl AggregateRoot for Trip {
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
        "a004"
    }

    fn collection_name() -> &'static str {
        "trip"
    }

    fn element_name() -> &'static str {
        "Trip"
    }

    fn list_name() -> &'static str {
        "Trips"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDto {
    pub call_id: String,
    pub ambulance_id: String,
    pub patient_id: String,
    /// Defaults to now
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    pub distance: f64,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> TripDto {
        TripDto {
            call_id: "call".into(),
            ambulance_id: "amb".into(),
            patient_id: "pat".into(),
            start_time: None,
            distance: 12.5,
            cost: 250.0,
        }
    }

    #[test]
    fn test_complete_once() {
        let mut trip = Trip::new_for_insert(dto());
        assert_eq!(trip.status, TripStatus::Active);
        trip.complete(Utc::now()).unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert!(trip.end_time.is_some());
        assert!(trip.complete(Utc::now()).is_err());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut bad = dto();
        bad.cost = -1.0;
        assert!(Trip::new_for_insert(bad).validate().is_err());

        let mut bad = dto();
        bad.distance = f64::NAN;
        assert!(Trip::new_for_insert(bad).validate().is_err());
    }
}
