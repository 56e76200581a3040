//! Report payloads

pub mod d400_inspection_summary;
pub mod d401_maintenance_summary;
pub mod d402_ambulance_utilization;
pub mod d403_overdue_maintenance;
pub mod d404_dispatch_summary;

use serde::{Deserialize, Serialize};

/// Optional `?today=` override shared by every report
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportParams {
    pub today: Option<chrono::NaiveDate>,
}

/// `{value, count}` row of a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub value: String,
    pub count: u64,
}
