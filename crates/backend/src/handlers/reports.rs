use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use contracts::dashboards::d400_inspection_summary::InspectionSummary;
use contracts::dashboards::d401_maintenance_summary::MaintenanceSummary;
use contracts::dashboards::d402_ambulance_utilization::AmbulanceUtilization;
use contracts::dashboards::d403_overdue_maintenance::OverdueMaintenanceAlerts;
use contracts::dashboards::d404_dispatch_summary::DispatchSummary;
use contracts::dashboards::ReportParams;

use crate::dashboards::{
    d400_inspection_summary, d401_maintenance_summary, d402_ambulance_utilization,
    d403_overdue_maintenance, d404_dispatch_summary,
};
use crate::shared::error::ServiceResult;
use crate::shared::state::AppState;

fn report_date(params: &ReportParams) -> NaiveDate {
    params.today.unwrap_or_else(|| Utc::now().date_naive())
}

/// GET /api/reports/inspection-summary/
pub async fn inspection_summary(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ServiceResult<Json<InspectionSummary>> {
    let summary =
        d400_inspection_summary::service::get_inspection_summary(&state.db, report_date(&params))
            .await?;
    Ok(Json(summary))
}

/// GET /api/reports/maintenance-summary/
pub async fn maintenance_summary(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ServiceResult<Json<MaintenanceSummary>> {
    let summary =
        d401_maintenance_summary::service::get_maintenance_summary(&state.db, report_date(&params))
            .await?;
    Ok(Json(summary))
}

/// GET /api/reports/ambulance-utilization/
pub async fn ambulance_utilization(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ServiceResult<Json<Vec<AmbulanceUtilization>>> {
    let rows = d402_ambulance_utilization::service::get_ambulance_utilization(
        &state.db,
        report_date(&params),
    )
    .await?;
    Ok(Json(rows))
}

/// GET /api/reports/overdue-maintenance/
pub async fn overdue_maintenance(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ServiceResult<Json<OverdueMaintenanceAlerts>> {
    let alerts =
        d403_overdue_maintenance::service::get_overdue_maintenance(&state.db, report_date(&params))
            .await?;
    Ok(Json(alerts))
}

/// GET /api/reports/dispatch-summary/
pub async fn dispatch_summary(State(state): State<AppState>) -> ServiceResult<Json<DispatchSummary>> {
    Ok(Json(
        d404_dispatch_summary::service::get_dispatch_summary(&state.db).await?,
    ))
}
