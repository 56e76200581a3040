use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a001_ambulance::aggregate::{AmbulanceDto, AmbulanceStatus};
use contracts::domain::a002_patient::aggregate::{EmergencyContact, Gender, PatientDto};
use contracts::domain::common::{Destination, GeoPoint, Place};
use contracts::enums::UserRole;
use contracts::system::users::{CreateUserDto, User};
use sea_orm::ConnectionTrait;

use crate::domain::a001_ambulance::{repository as ambulance_repository, service as ambulance_service};
use crate::domain::a002_patient::service as patient_service;
use crate::system::users::{repository as user_repository, service as user_service};

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Create the default administrator when the user table is empty
pub async fn ensure_admin_user_exists(conn: &impl ConnectionTrait) -> Result<()> {
    if user_repository::count_users(conn).await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");
    let admin = user_service::create(
        conn,
        CreateUserDto {
            username: DEFAULT_ADMIN_USERNAME.into(),
            password: DEFAULT_ADMIN_PASSWORD.into(),
            email: None,
            full_name: Some("Administrator".into()),
            role: UserRole::Admin,
            phone: String::new(),
        },
        None,
    )
    .await?;

    tracing::warn!("Default admin user created: {} / {}", DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD);
    tracing::warn!("User ID: {}. Change the password after first sign-in.", admin.id);
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("Invalid date {}-{}-{}", y, m, d))
}

/// Existing user with `username`, or a new one with password `<role>123`
async fn seed_user(
    conn: &impl ConnectionTrait,
    username: &str,
    full_name: &str,
    email: &str,
    phone: &str,
    role: UserRole,
) -> Result<User> {
    if let Some(user) = user_repository::get_by_username(conn, username).await? {
        return Ok(user);
    }
    let user = user_service::create(
        conn,
        CreateUserDto {
            username: username.into(),
            password: format!("{}123", role),
            email: Some(email.into()),
            full_name: Some(full_name.into()),
            role,
            phone: phone.into(),
        },
        None,
    )
    .await?;
    Ok(user)
}

/// Demo crew, fleet and patients. Runs only against an empty fleet.
pub async fn seed_sample_data(conn: &impl ConnectionTrait) -> Result<()> {
    if ambulance_repository::count(conn).await? > 0 {
        tracing::info!("Fleet is not empty, skipping sample data");
        return Ok(());
    }

    seed_user(conn, "admin", "John Admin", "admin@ams.com", "+1234567890", UserRole::Admin).await?;
    seed_user(
        conn,
        "dispatcher",
        "Sarah Dispatcher",
        "dispatcher@ams.com",
        "+1234567891",
        UserRole::Dispatcher,
    )
    .await?;
    let driver = seed_user(
        conn,
        "driver",
        "Mike Driver",
        "driver@ams.com",
        "+1234567892",
        UserRole::Driver,
    )
    .await?;
    let paramedic = seed_user(
        conn,
        "paramedic",
        "Dr. Lisa Paramedic",
        "paramedic@ams.com",
        "+1234567893",
        UserRole::Paramedic,
    )
    .await?;

    let base_equipment: Vec<String> = ["Defibrillator", "Oxygen Tank", "Stretcher", "First Aid Kit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut with_ventilator = base_equipment.clone();
    with_ventilator.push("Ventilator".into());

    let fleet = vec![
        AmbulanceDto {
            vehicle_number: "AMB-001".into(),
            license_number: "ABC123".into(),
            model: "Mercedes Sprinter".into(),
            year: 2022,
            status: Some(AmbulanceStatus::Available),
            location: Some(GeoPoint::new(40.7128, -74.0060)),
            assigned_driver_id: Some(driver.id.clone()),
            assigned_paramedic_id: Some(paramedic.id.clone()),
            last_maintenance: date(2024, 7, 15)?,
            next_maintenance: date(2024, 10, 15)?,
            insurance_expiry: date(2025, 3, 20)?,
            equipment: base_equipment.clone(),
        },
        AmbulanceDto {
            vehicle_number: "AMB-002".into(),
            license_number: "DEF456".into(),
            model: "Ford Transit".into(),
            year: 2021,
            status: Some(AmbulanceStatus::EnRoute),
            location: Some(GeoPoint::new(40.7589, -73.9851)),
            assigned_driver_id: Some(driver.id.clone()),
            assigned_paramedic_id: None,
            last_maintenance: date(2024, 6, 20)?,
            next_maintenance: date(2024, 9, 20)?,
            insurance_expiry: date(2025, 1, 15)?,
            equipment: with_ventilator,
        },
        AmbulanceDto {
            vehicle_number: "AMB-003".into(),
            license_number: "GHI789".into(),
            model: "Chevrolet Express".into(),
            year: 2020,
            status: Some(AmbulanceStatus::Maintenance),
            location: Some(GeoPoint::new(40.7282, -73.7949)),
            assigned_driver_id: None,
            assigned_paramedic_id: None,
            last_maintenance: date(2024, 8, 1)?,
            next_maintenance: date(2024, 11, 1)?,
            insurance_expiry: date(2024, 12, 30)?,
            equipment: base_equipment,
        },
    ];
    for dto in fleet {
        ambulance_service::create(conn, dto).await?;
    }

    let patients = vec![
        PatientDto {
            name: "Robert Johnson".into(),
            age: 65,
            gender: Gender::Male,
            phone: Some("+1555111222".into()),
            medical_condition: "Cardiac arrest".into(),
            allergies: vec!["Penicillin".into()],
            medications: vec!["Aspirin".into(), "Metoprolol".into()],
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
        },
        PatientDto {
            name: "Alice Brown".into(),
            age: 45,
            gender: Gender::Female,
            phone: Some("+1555555666".into()),
            medical_condition: "Post-surgery transfer".into(),
            allergies: vec![],
            medications: vec!["Ibuprofen".into()],
            emergency_contact: EmergencyContact {
                name: "Tom Brown".into(),
                phone: "+1555777888".into(),
                relation: "Husband".into(),
            },
            pickup_location: Place {
                lat: 40.7614,
                lng: -73.9776,
                address: "789 Hospital Ave, New York, NY 10019".into(),
            },
            destination: Destination {
                lat: 40.7282,
                lng: -73.7949,
                address: "456 Recovery Center, Queens, NY 11368".into(),
                hospital_name: "Queens Recovery Center".into(),
            },
        },
    ];
    for dto in patients {
        patient_service::create(conn, dto).await?;
    }

    tracing::info!("Sample data created: 4 users, 3 ambulances, 2 patients");
    Ok(())
}
