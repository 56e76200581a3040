use axum::{
    http::{header, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::shared::state::AppState;
use crate::system;

/// Business routes; every one of them needs a signed-in user
fn domain_routes() -> Router<AppState> {
    Router::new()
        // ========================================
        // A001 AMBULANCES
        // ========================================
        .route(
            "/api/ambulances/",
            get(handlers::a001_ambulance::list).post(handlers::a001_ambulance::create),
        )
        .route(
            "/api/ambulances/available/",
            get(handlers::a001_ambulance::list_available),
        )
        .route(
            "/api/ambulances/:id/",
            get(handlers::a001_ambulance::get_by_id)
                .put(handlers::a001_ambulance::update)
                .delete(handlers::a001_ambulance::delete),
        )
        .route(
            "/api/ambulances/:id/location/",
            patch(handlers::a001_ambulance::update_location),
        )
        .route(
            "/api/ambulances/:id/status/",
            patch(handlers::a001_ambulance::update_status),
        )
        // ========================================
        // A002 PATIENTS
        // ========================================
        .route(
            "/api/patients/",
            get(handlers::a002_patient::list).post(handlers::a002_patient::create),
        )
        .route(
            "/api/patients/:id/",
            get(handlers::a002_patient::get_by_id)
                .put(handlers::a002_patient::update)
                .delete(handlers::a002_patient::delete),
        )
        // ========================================
        // A003 EMERGENCY CALLS
        // ========================================
        .route(
            "/api/emergency-calls/",
            get(handlers::a003_emergency_call::list).post(handlers::a003_emergency_call::create),
        )
        .route(
            "/api/emergency-calls/pending/",
            get(handlers::a003_emergency_call::list_pending),
        )
        .route(
            "/api/emergency-calls/:id/",
            get(handlers::a003_emergency_call::get_by_id).put(handlers::a003_emergency_call::update),
        )
        .route(
            "/api/emergency-calls/:id/assign/",
            patch(handlers::a003_emergency_call::assign).post(handlers::a003_emergency_call::assign),
        )
        .route(
            "/api/emergency-calls/:id/status/",
            post(handlers::a003_emergency_call::update_status),
        )
        // ========================================
        // A004 TRIPS
        // ========================================
        .route(
            "/api/trips/",
            get(handlers::a004_trip::list).post(handlers::a004_trip::create),
        )
        .route("/api/trips/active/", get(handlers::a004_trip::list_active))
        .route(
            "/api/trips/:id/",
            get(handlers::a004_trip::get_by_id).delete(handlers::a004_trip::delete),
        )
        .route(
            "/api/trips/:id/complete/",
            patch(handlers::a004_trip::complete).post(handlers::a004_trip::complete),
        )
        // ========================================
        // A005 / A006 INSPECTIONS
        // ========================================
        .route(
            "/api/inspections/driver/",
            get(handlers::a005_driver_inspection::list)
                .post(handlers::a005_driver_inspection::create),
        )
        .route(
            "/api/inspections/driver/:id/",
            get(handlers::a005_driver_inspection::get_by_id)
                .put(handlers::a005_driver_inspection::update)
                .delete(handlers::a005_driver_inspection::delete),
        )
        .route(
            "/api/inspections/paramedic/",
            get(handlers::a006_paramedic_inspection::list)
                .post(handlers::a006_paramedic_inspection::create),
        )
        .route(
            "/api/inspections/paramedic/:id/",
            get(handlers::a006_paramedic_inspection::get_by_id)
                .put(handlers::a006_paramedic_inspection::update)
                .delete(handlers::a006_paramedic_inspection::delete),
        )
        // ========================================
        // A007 MAINTENANCE
        // ========================================
        .route(
            "/api/maintenance/",
            get(handlers::a007_maintenance_record::list)
                .post(handlers::a007_maintenance_record::create),
        )
        .route(
            "/api/maintenance/:id/",
            get(handlers::a007_maintenance_record::get_by_id)
                .put(handlers::a007_maintenance_record::update)
                .delete(handlers::a007_maintenance_record::delete),
        )
        // ========================================
        // REPORTS
        // ========================================
        .route(
            "/api/reports/inspection-summary/",
            get(handlers::reports::inspection_summary),
        )
        .route(
            "/api/reports/maintenance-summary/",
            get(handlers::reports::maintenance_summary),
        )
        .route(
            "/api/reports/ambulance-utilization/",
            get(handlers::reports::ambulance_utilization),
        )
        .route(
            "/api/reports/overdue-maintenance/",
            get(handlers::reports::overdue_maintenance),
        )
        .route(
            "/api/reports/dispatch-summary/",
            get(handlers::reports::dispatch_summary),
        )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// The whole application: public routes, token-protected routes, CORS and
/// request logging
pub fn configure_routes(state: AppState) -> Router {
    let protected = system::api::routes::protected_routes()
        .merge(domain_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            system::auth::middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/", get(handlers::api_root::api_root))
        .merge(system::api::routes::public_routes())
        .merge(protected)
        .layer(cors())
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .with_state(state)
}
