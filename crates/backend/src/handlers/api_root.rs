use axum::Json;
use serde_json::{json, Value};

/// GET /api/
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "name": "Ambulance Management System API",
        "version": env!("CARGO_PKG_VERSION"),
        "authentication": "Send 'Authorization: Bearer <token>' (or 'Token <token>'); obtain one from /api/auth/token/",
        "endpoints": {
            "auth": "/api/auth/",
            "profile": "/api/profile/",
            "navigation": "/api/navigation/",
            "users": "/api/users/",
            "ambulances": "/api/ambulances/",
            "patients": "/api/patients/",
            "emergency_calls": "/api/emergency-calls/",
            "trips": "/api/trips/",
            "driver_inspections": "/api/inspections/driver/",
            "paramedic_inspections": "/api/inspections/paramedic/",
            "maintenance": "/api/maintenance/",
            "reports": "/api/reports/",
        }
    }))
}
