use serde::{Deserialize, Serialize};

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("Latitude {} is out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("Longitude {} is out of range", self.lng));
        }
        Ok(())
    }
}

/// A coordinate with a street address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Place {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.point().validate()?;
        if self.address.trim().is_empty() {
            return Err("Address cannot be empty".into());
        }
        Ok(())
    }
}

/// Drop-off place of a patient transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub hospital_name: String,
}

impl Destination {
    pub fn validate(&self) -> Result<(), String> {
        GeoPoint::new(self.lat, self.lng).validate()?;
        if self.hospital_name.trim().is_empty() {
            return Err("Hospital name cannot be empty".into());
        }
        Ok(())
    }
}
