use anyhow::Result;
use contracts::dashboards::d404_dispatch_summary::DispatchSummary;
use contracts::dashboards::BreakdownRow;
use contracts::domain::a003_emergency_call::aggregate::{CallPriority, EmergencyCall};
use contracts::domain::a003_emergency_call::lifecycle::CallStatus;
use sea_orm::ConnectionTrait;

use crate::domain::a003_emergency_call::repository;

pub async fn get_dispatch_summary(conn: &impl ConnectionTrait) -> Result<DispatchSummary> {
    let calls = repository::list_all(conn).await?;
    Ok(summarize(&calls))
}

fn summarize(calls: &[EmergencyCall]) -> DispatchSummary {
    // Every status and priority is listed, zeros included
    let by_status = CallStatus::all()
        .iter()
        .map(|status| BreakdownRow {
            value: status.as_str().to_string(),
            count: calls.iter().filter(|c| c.status == *status).count() as u64,
        })
        .collect();
    let by_priority = CallPriority::all()
        .iter()
        .map(|priority| BreakdownRow {
            value: priority.as_str().to_string(),
            count: calls.iter().filter(|c| c.priority == *priority).count() as u64,
        })
        .collect();

    let response_times: Vec<f64> = calls
        .iter()
        .filter_map(|c| c.response_time)
        .map(f64::from)
        .collect();
    let average_response_time = (!response_times.is_empty())
        .then(|| response_times.iter().sum::<f64>() / response_times.len() as f64);

    DispatchSummary {
        total_calls: calls.len() as u64,
        by_status,
        by_priority,
        average_response_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_lists_every_status() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_calls, 0);
        assert_eq!(summary.by_status.len(), CallStatus::all().len());
        assert!(summary.by_status.iter().all(|row| row.count == 0));
        assert_eq!(summary.by_priority.len(), 4);
        assert_eq!(summary.average_response_time, None);
    }
}
