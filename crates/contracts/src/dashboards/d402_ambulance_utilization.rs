use serde::{Deserialize, Serialize};

use crate::domain::a001_ambulance::aggregate::AmbulanceStatus;

/// Trips of one ambulance over the last 30 days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbulanceUtilization {
    pub ambulance_id: String,
    pub vehicle_number: String,
    pub model: String,
    pub status: AmbulanceStatus,
    pub trips_count: u64,
    pub total_distance: f64,
    pub total_revenue: f64,
}
