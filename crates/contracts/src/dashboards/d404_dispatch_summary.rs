use serde::{Deserialize, Serialize};

use super::BreakdownRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub total_calls: u64,
    /// Every call status, zero counts included
    pub by_status: Vec<BreakdownRow>,
    pub by_priority: Vec<BreakdownRow>,
    /// Minutes, over calls that got an ambulance
    pub average_response_time: Option<f64>,
}
