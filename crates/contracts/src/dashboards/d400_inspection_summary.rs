use serde::{Deserialize, Serialize};

use super::BreakdownRow;

/// Inspection counts of one crew role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionCounts {
    pub today: u64,
    pub week: u64,
    pub month: u64,
    /// Per overall status, last 7 days
    pub status_breakdown: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSummary {
    pub driver_inspections: InspectionCounts,
    pub paramedic_inspections: InspectionCounts,
}
