mod common;

use backend::domain::a001_ambulance::service as ambulance_service;
use backend::domain::a002_patient::service as patient_service;
use backend::domain::a003_emergency_call::dispatch;
use backend::domain::a004_trip::service as trip_service;
use backend::domain::a005_driver_inspection::repository::InspectionFilter;
use backend::domain::a005_driver_inspection::service as driver_inspection_service;
use backend::domain::a006_paramedic_inspection::service as paramedic_inspection_service;
use backend::domain::a007_maintenance_record::service as maintenance_service;
use backend::shared::error::ServiceError;
use backend::system::users::service as user_service;
use contracts::domain::a003_emergency_call::aggregate::CallPriority;
use contracts::domain::a004_trip::aggregate::TripDto;
use contracts::domain::a005_driver_inspection::aggregate::{
    Condition, DriverInspectionDto, ReadinessStatus, Shift, VehicleCategory, VehicleInspectionItem,
};
use contracts::domain::a006_paramedic_inspection::aggregate::{
    EquipmentCategory, MedicalEquipmentItem, ParamedicInspectionDto,
};
use contracts::domain::a007_maintenance_record::aggregate::{
    MaintenanceRecordDto, MaintenanceStatus, MaintenanceType,
};
use contracts::enums::UserRole;
use contracts::shared::pagination::PageParams;

use common::*;

fn driver_inspection(ambulance_id: &str, shift: Shift) -> DriverInspectionDto {
    DriverInspectionDto {
        driver_id: None,
        ambulance_id: ambulance_id.into(),
        date: date(2024, 8, 12),
        shift,
        vehicle_inspection: vec![VehicleInspectionItem {
            name: "Brake pads".into(),
            category: VehicleCategory::Brakes,
            condition: Condition::Good,
            needs_attention: false,
            notes: None,
        }],
        mileage: 45_210,
        fuel_level: 80,
        overall_status: ReadinessStatus::Ready,
        additional_notes: None,
    }
}

fn paramedic_inspection(ambulance_id: &str) -> ParamedicInspectionDto {
    ParamedicInspectionDto {
        paramedic_id: None,
        ambulance_id: ambulance_id.into(),
        date: date(2024, 8, 12),
        shift: Shift::Morning,
        medical_equipment: vec![MedicalEquipmentItem {
            name: "Defibrillator".into(),
            category: EquipmentCategory::LifeSupport,
            is_working: true,
            needs_replacement: false,
            expiry_date: None,
            notes: None,
        }],
        overall_status: ReadinessStatus::Ready,
        additional_notes: None,
    }
}

fn maintenance(ambulance_id: &str) -> MaintenanceRecordDto {
    MaintenanceRecordDto {
        ambulance_id: ambulance_id.into(),
        maintenance_type: MaintenanceType::Routine,
        status: None,
        scheduled_date: date(2024, 9, 1),
        completed_date: None,
        description: "Oil change and filter".into(),
        cost: Some(180.0),
        vendor: Some("City Garage".into()),
    }
}

// ============================================================================
// Ambulances
// ============================================================================

#[tokio::test]
async fn test_duplicate_vehicle_number_is_a_conflict() {
    let db = test_db().await;
    ambulance(&db, "AMB-001").await;

    let mut dto = ambulance_dto("AMB-001");
    dto.license_number = "OTHER".into();
    let err = ambulance_service::create(&db, dto).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_crew_must_hold_matching_role() {
    let db = test_db().await;
    let paramedic = user(&db, "lisa", UserRole::Paramedic).await;

    let mut dto = ambulance_dto("AMB-010");
    dto.assigned_driver_id = Some(paramedic.id.clone());
    let err = ambulance_service::create(&db, dto).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut dto = ambulance_dto("AMB-010");
    dto.assigned_paramedic_id = Some(paramedic.id.clone());
    let created = ambulance_service::create(&db, dto).await.unwrap();
    assert_eq!(created.assigned_paramedic_id.as_deref(), Some(paramedic.id.as_str()));
}

#[tokio::test]
async fn test_out_of_range_year_is_rejected() {
    let db = test_db().await;
    let mut dto = ambulance_dto("AMB-011");
    dto.year = 1850;

    let err = ambulance_service::create(&db, dto).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_available_list_skips_busy_units() {
    let db = test_db().await;
    let free = ambulance(&db, "AMB-001").await;
    ambulance_with_status(
        &db,
        "AMB-002",
        contracts::domain::a001_ambulance::aggregate::AmbulanceStatus::Maintenance,
    )
    .await;

    let available = ambulance_service::list_available(&db).await.unwrap();
    let ids: Vec<_> = available.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![free.id.as_str()]);
}

// ============================================================================
// Patients
// ============================================================================

#[tokio::test]
async fn test_patient_with_trip_cannot_be_deleted() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let kept = patient(&db, "Robert Johnson").await;
    let removable = patient(&db, "Alice Brown").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    trip_service::create(
        &db,
        TripDto {
            call_id: call.id.clone(),
            ambulance_id: amb.id.clone(),
            patient_id: kept.id.clone(),
            start_time: None,
            distance: 4.2,
            cost: 95.0,
        },
    )
    .await
    .unwrap();

    let err = patient_service::delete(&db, &kept.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    patient_service::delete(&db, &removable.id).await.unwrap();
    let err = patient_service::get(&db, &removable.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_patient_list_pages() {
    let db = test_db().await;
    for name in ["A", "B", "C"] {
        patient(&db, name).await;
    }

    let page = patient_service::list(
        &db,
        &PageParams {
            page: Some(2),
            page_size: Some(2),
        },
    )
    .await
    .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.results.len(), 1);
}

// ============================================================================
// Inspections
// ============================================================================

#[tokio::test]
async fn test_driver_files_under_own_id_and_sees_only_own() {
    let db = test_db().await;
    let mike = claims_for(&user(&db, "mike", UserRole::Driver).await);
    let tom = claims_for(&user(&db, "tom", UserRole::Driver).await);
    let admin = claims_for(&user(&db, "root", UserRole::Admin).await);
    let amb = ambulance(&db, "AMB-001").await;

    let mut dto = driver_inspection(&amb.id, Shift::Morning);
    dto.driver_id = Some(tom.sub.clone());
    let mine = driver_inspection_service::create(&db, dto, &mike)
        .await
        .unwrap();
    assert_eq!(mine.driver_id, mike.sub);

    let err = driver_inspection_service::get(&db, &mine.id, &tom)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    driver_inspection_service::get(&db, &mine.id, &admin)
        .await
        .unwrap();

    let filter = InspectionFilter::default();
    let params = PageParams::default();
    let toms = driver_inspection_service::list(&db, &filter, &params, &tom)
        .await
        .unwrap();
    assert_eq!(toms.count, 0);
    let all = driver_inspection_service::list(&db, &filter, &params, &admin)
        .await
        .unwrap();
    assert_eq!(all.count, 1);
}

#[tokio::test]
async fn test_same_shift_inspection_is_a_duplicate() {
    let db = test_db().await;
    let mike = claims_for(&user(&db, "mike", UserRole::Driver).await);
    let amb = ambulance(&db, "AMB-001").await;

    driver_inspection_service::create(&db, driver_inspection(&amb.id, Shift::Morning), &mike)
        .await
        .unwrap();
    let err =
        driver_inspection_service::create(&db, driver_inspection(&amb.id, Shift::Morning), &mike)
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    driver_inspection_service::create(&db, driver_inspection(&amb.id, Shift::Night), &mike)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_files_for_named_driver() {
    let db = test_db().await;
    let admin = claims_for(&user(&db, "root", UserRole::Admin).await);
    let mike = user(&db, "mike", UserRole::Driver).await;
    let lisa = user(&db, "lisa", UserRole::Paramedic).await;
    let amb = ambulance(&db, "AMB-001").await;

    let mut dto = driver_inspection(&amb.id, Shift::Afternoon);
    dto.driver_id = Some(mike.id.clone());
    let filed = driver_inspection_service::create(&db, dto, &admin)
        .await
        .unwrap();
    assert_eq!(filed.driver_id, mike.id);

    let mut dto = driver_inspection(&amb.id, Shift::Night);
    dto.driver_id = Some(lisa.id.clone());
    let err = driver_inspection_service::create(&db, dto, &admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_fuel_level_out_of_range_is_rejected() {
    let db = test_db().await;
    let mike = claims_for(&user(&db, "mike", UserRole::Driver).await);
    let amb = ambulance(&db, "AMB-001").await;
    let mut dto = driver_inspection(&amb.id, Shift::Morning);
    dto.fuel_level = 140;

    let err = driver_inspection_service::create(&db, dto, &mike)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_paramedic_inspection_rules() {
    let db = test_db().await;
    let lisa = claims_for(&user(&db, "lisa", UserRole::Paramedic).await);
    let ann = claims_for(&user(&db, "ann", UserRole::Paramedic).await);
    let amb = ambulance(&db, "AMB-001").await;

    let mut broken = paramedic_inspection(&amb.id);
    broken.medical_equipment[0].is_working = false;
    let err = paramedic_inspection_service::create(&db, broken, &lisa)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let filed = paramedic_inspection_service::create(&db, paramedic_inspection(&amb.id), &lisa)
        .await
        .unwrap();
    assert_eq!(filed.paramedic_id, lisa.sub);

    let err = paramedic_inspection_service::delete(&db, &filed.id, &ann)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    paramedic_inspection_service::delete(&db, &filed.id, &lisa)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_only_crew_of_the_right_role_files_inspections() {
    let db = test_db().await;
    let sarah = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let lisa = claims_for(&user(&db, "lisa", UserRole::Paramedic).await);
    let mike = claims_for(&user(&db, "mike", UserRole::Driver).await);
    let amb = ambulance(&db, "AMB-001").await;

    for actor in [&sarah, &lisa] {
        let err =
            driver_inspection_service::create(&db, driver_inspection(&amb.id, Shift::Morning), actor)
                .await
                .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden), "{}", actor.username);
    }
    for actor in [&sarah, &mike] {
        let err = paramedic_inspection_service::create(&db, paramedic_inspection(&amb.id), actor)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden), "{}", actor.username);
    }

    let filed =
        driver_inspection_service::create(&db, driver_inspection(&amb.id, Shift::Morning), &mike)
            .await
            .unwrap();
    let err = driver_inspection_service::update(
        &db,
        &filed.id,
        driver_inspection(&amb.id, Shift::Night),
        &sarah,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));
}

#[tokio::test]
async fn test_inspection_for_unknown_ambulance_is_not_found() {
    let db = test_db().await;
    let mike = claims_for(&user(&db, "mike", UserRole::Driver).await);

    let err = driver_inspection_service::create(&db, driver_inspection("missing", Shift::Morning), &mike)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

// ============================================================================
// Maintenance
// ============================================================================

#[tokio::test]
async fn test_maintenance_validation() {
    let db = test_db().await;
    let amb = ambulance(&db, "AMB-001").await;

    let mut dto = maintenance(&amb.id);
    dto.status = Some(MaintenanceStatus::Completed);
    let err = maintenance_service::create(&db, dto).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut dto = maintenance(&amb.id);
    dto.cost = Some(-5.0);
    let err = maintenance_service::create(&db, dto).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = maintenance_service::create(&db, maintenance("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_maintenance_completes_with_date() {
    let db = test_db().await;
    let amb = ambulance(&db, "AMB-001").await;
    let record = maintenance_service::create(&db, maintenance(&amb.id))
        .await
        .unwrap();
    assert_eq!(record.status, MaintenanceStatus::Scheduled);

    let mut dto = maintenance(&amb.id);
    dto.status = Some(MaintenanceStatus::Completed);
    dto.completed_date = Some(date(2024, 9, 2));
    let updated = maintenance_service::update(&db, &record.id, dto)
        .await
        .unwrap();
    assert_eq!(updated.status, MaintenanceStatus::Completed);
    assert_eq!(updated.completed_date, Some(date(2024, 9, 2)));

    maintenance_service::delete(&db, &record.id).await.unwrap();
    let err = maintenance_service::delete(&db, &record.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_user_cannot_delete_self() {
    let db = test_db().await;
    let admin = user(&db, "root", UserRole::Admin).await;
    let other = user(&db, "sarah", UserRole::Dispatcher).await;

    let err = user_service::delete(&db, &admin.id, &admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    user_service::delete(&db, &other.id, &admin.id).await.unwrap();
    let dispatchers = user_service::list(&db, Some(UserRole::Dispatcher))
        .await
        .unwrap();
    assert!(dispatchers.is_empty());
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let db = test_db().await;
    user(&db, "sarah", UserRole::Dispatcher).await;

    let err = user_service::create(
        &db,
        contracts::system::users::CreateUserDto {
            username: "sarah".into(),
            password: "another-pass".into(),
            email: None,
            full_name: None,
            role: UserRole::Driver,
            phone: String::new(),
        },
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}
