#![allow(dead_code)]

use backend::domain::a001_ambulance::service as ambulance_service;
use backend::domain::a002_patient::service as patient_service;
use backend::domain::a003_emergency_call::service as call_service;
use backend::shared::config::Config;
use backend::shared::data::db;
use backend::system::users::service as user_service;
use chrono::NaiveDate;
use contracts::domain::a001_ambulance::aggregate::{Ambulance, AmbulanceDto, AmbulanceStatus};
use contracts::domain::a002_patient::aggregate::{EmergencyContact, Gender, Patient, PatientDto};
use contracts::domain::a003_emergency_call::aggregate::{
    CallPriority, EmergencyCall, EmergencyCallDto, RequestSource, RequesterDetails, RequesterType,
};
use contracts::domain::common::{Destination, GeoPoint, Place};
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;
use contracts::system::users::{CreateUserDto, User};
use sea_orm::DatabaseConnection;

pub async fn test_db() -> DatabaseConnection {
    db::connect(&Config::in_memory())
        .await
        .expect("in-memory database")
}

/// Database in a fresh temp file, for tests that need several pooled
/// connections
pub async fn file_db() -> DatabaseConnection {
    let mut config = Config::in_memory();
    let path = std::env::temp_dir().join(format!("ams-test-{}.db", uuid::Uuid::new_v4()));
    config.database.path = path.to_string_lossy().into_owned();
    db::connect(&config).await.expect("file database")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Claims as the auth middleware would hand them to a service
pub fn claims_for(user: &User) -> TokenClaims {
    TokenClaims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        exp: usize::MAX,
        iat: 0,
    }
}

/// User `username` with password `<username>-pass`
pub async fn user(conn: &DatabaseConnection, username: &str, role: UserRole) -> User {
    user_service::create(
        conn,
        CreateUserDto {
            username: username.into(),
            password: format!("{}-pass", username),
            email: Some(format!("{}@ams.test", username)),
            full_name: Some(username.to_uppercase()),
            role,
            phone: "+100000000".into(),
        },
        None,
    )
    .await
    .expect("create user")
}

pub fn ambulance_dto(vehicle_number: &str) -> AmbulanceDto {
    AmbulanceDto {
        vehicle_number: vehicle_number.into(),
        license_number: format!("LIC-{}", vehicle_number),
        model: "Mercedes Sprinter".into(),
        year: 2022,
        status: None,
        location: Some(GeoPoint::new(40.7128, -74.0060)),
        assigned_driver_id: None,
        assigned_paramedic_id: None,
        last_maintenance: date(2024, 7, 15),
        next_maintenance: date(2024, 10, 15),
        insurance_expiry: date(2025, 3, 20),
        equipment: vec!["Defibrillator".into(), "Stretcher".into()],
    }
}

pub async fn ambulance(conn: &DatabaseConnection, vehicle_number: &str) -> Ambulance {
    ambulance_service::create(conn, ambulance_dto(vehicle_number))
        .await
        .expect("create ambulance")
}

pub async fn ambulance_with_status(
    conn: &DatabaseConnection,
    vehicle_number: &str,
    status: AmbulanceStatus,
) -> Ambulance {
    let mut dto = ambulance_dto(vehicle_number);
    dto.status = Some(status);
    ambulance_service::create(conn, dto)
        .await
        .expect("create ambulance")
}

pub fn patient_dto(name: &str) -> PatientDto {
    PatientDto {
        name: name.into(),
        age: 65,
        gender: Gender::Male,
        phone: Some("+1555111222".into()),
        medical_condition: "Cardiac arrest".into(),
        allergies: vec!["Penicillin".into()],
        medications: vec![],
        emergency_contact: EmergencyContact {
            name: "Mary Johnson".into(),
            phone: "+1555333444".into(),
            relation: "Wife".into(),
        },
        pickup_location: Place {
            lat: 40.7505,
            lng: -73.9934,
            address: "123 Main St, New York, NY 10001".into(),
        },
        destination: Destination {
            lat: 40.7794,
            lng: -73.9632,
            address: "1234 Hospital Dr, New York, NY 10021".into(),
            hospital_name: "NYC General Hospital".into(),
        },
    }
}

pub async fn patient(conn: &DatabaseConnection, name: &str) -> Patient {
    patient_service::create(conn, patient_dto(name))
        .await
        .expect("create patient")
}

pub fn call_dto(priority: CallPriority) -> EmergencyCallDto {
    EmergencyCallDto {
        caller_name: "Jane Caller".into(),
        caller_phone: "+1555000111".into(),
        location: Place {
            lat: 40.7505,
            lng: -73.9934,
            address: "123 Main St, New York, NY 10001".into(),
        },
        priority,
        description: "Chest pain, conscious".into(),
        patient_id: None,
        request_source: RequestSource::PhoneCall,
        requester_type: RequesterType::Individual,
        requester_details: RequesterDetails::default(),
    }
}

pub async fn call(
    conn: &DatabaseConnection,
    priority: CallPriority,
    actor: &TokenClaims,
) -> EmergencyCall {
    call_service::create(conn, call_dto(priority), actor)
        .await
        .expect("create call")
}
