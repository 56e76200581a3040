use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d402_ambulance_utilization::AmbulanceUtilization;
use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a004_trip::aggregate::Trip;
use sea_orm::ConnectionTrait;

use crate::dashboards::{days_before, MONTH_WINDOW_DAYS};
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::domain::a004_trip::repository as trip_repository;

/// Trips, distance and revenue per ambulance over the last month
pub async fn get_ambulance_utilization(
    conn: &impl ConnectionTrait,
    today: NaiveDate,
) -> Result<Vec<AmbulanceUtilization>> {
    let since = days_before(today, MONTH_WINDOW_DAYS)
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow::anyhow!("Invalid report date {}", today))?;

    let ambulances = ambulance_repository::list_all(conn).await?;
    let trips = trip_repository::list_started_since(conn, since).await?;
    Ok(utilization(&ambulances, &trips))
}

fn utilization(ambulances: &[Ambulance], trips: &[Trip]) -> Vec<AmbulanceUtilization> {
    let mut totals: HashMap<&str, (u64, f64, f64)> = HashMap::new();
    for trip in trips {
        let entry = totals.entry(trip.ambulance_id.as_str()).or_default();
        entry.0 += 1;
        entry.1 += trip.distance;
        entry.2 += trip.cost;
    }

    ambulances
        .iter()
        .map(|ambulance| {
            let (trips_count, total_distance, total_revenue) = totals
                .get(ambulance.id.as_str())
                .copied()
                .unwrap_or_default();
            AmbulanceUtilization {
                ambulance_id: ambulance.id.clone(),
                vehicle_number: ambulance.vehicle_number.clone(),
                model: ambulance.model.clone(),
                status: ambulance.status,
                trips_count,
                total_distance,
                total_revenue,
            }
        })
        .collect()
}
