use serde::{Deserialize, Serialize};

use super::BreakdownRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSummary {
    pub pending_maintenance: u64,
    pub completed_this_month: u64,
    pub monthly_cost: f64,
    pub overdue_maintenance: u64,
    /// Records scheduled within the last 30 days, per maintenance type
    pub type_breakdown: Vec<BreakdownRow>,
}
