mod common;

use backend::domain::a001_ambulance::repository as ambulance_repository;
use backend::domain::a001_ambulance::service as ambulance_service;
use backend::domain::a003_emergency_call::{dispatch, service as call_service};
use backend::domain::a004_trip::service as trip_service;
use backend::shared::error::ServiceError;
use contracts::domain::a001_ambulance::aggregate::{
    AmbulanceStatus, LocationUpdateDto, StatusUpdateDto,
};
use contracts::domain::a003_emergency_call::aggregate::CallPriority;
use contracts::domain::a003_emergency_call::lifecycle::{CallStatus, ReleasePolicy};
use contracts::domain::a004_trip::aggregate::{TripDto, TripStatus};
use contracts::enums::UserRole;

use common::*;

#[tokio::test]
async fn test_assign_moves_call_and_ambulance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    assert_eq!(call.status, CallStatus::Pending);

    let assigned = dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();

    assert_eq!(assigned.status, CallStatus::Assigned);
    assert_eq!(assigned.assigned_ambulance_id.as_deref(), Some(amb.id.as_str()));
    assert_eq!(assigned.dispatcher_id.as_deref(), Some(dispatcher.sub.as_str()));
    assert!(assigned.response_time.is_some());

    let stored = call_service::get(&db, &call.id).await.unwrap();
    assert_eq!(stored.status, CallStatus::Assigned);
    let amb = ambulance_service::get(&db, &amb.id).await.unwrap();
    assert_eq!(amb.status, AmbulanceStatus::Assigned);
}

#[tokio::test]
async fn test_assign_rejects_busy_ambulance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let first = call(&db, CallPriority::Critical, &dispatcher).await;
    let second = call(&db, CallPriority::Low, &dispatcher).await;

    dispatch::assign(&db, &first.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    let err = dispatch::assign(&db, &second.id, &amb.id, &dispatcher)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);
    let second = call_service::get(&db, &second.id).await.unwrap();
    assert_eq!(second.status, CallStatus::Pending);
    assert!(second.assigned_ambulance_id.is_none());
}

#[tokio::test]
async fn test_assign_rejects_ambulance_in_maintenance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance_with_status(&db, "AMB-003", AmbulanceStatus::Maintenance).await;
    let call = call(&db, CallPriority::Medium, &dispatcher).await;

    let err = dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.status().as_u16(), 409);
}

#[tokio::test]
async fn test_assign_twice_is_an_invalid_transition() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let first = ambulance(&db, "AMB-001").await;
    let spare = ambulance(&db, "AMB-002").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;

    dispatch::assign(&db, &call.id, &first.id, &dispatcher)
        .await
        .unwrap();
    let err = dispatch::assign(&db, &call.id, &spare.id, &dispatcher)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidTransition(_)));
    let spare = ambulance_service::get(&db, &spare.id).await.unwrap();
    assert_eq!(spare.status, AmbulanceStatus::Available);
}

#[tokio::test]
async fn test_assign_unknown_ids_are_not_found() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;

    let err = dispatch::assign(&db, "missing", &amb.id, &dispatcher)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = dispatch::assign(&db, &call.id, "missing", &dispatcher)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_full_lifecycle_mirrors_ambulance_and_releases_it() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::Critical, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();

    let steps = [
        (CallStatus::EnRoute, AmbulanceStatus::EnRoute),
        (CallStatus::AtScene, AmbulanceStatus::AtScene),
        (CallStatus::Transporting, AmbulanceStatus::Transporting),
        (CallStatus::Completed, AmbulanceStatus::Available),
    ];
    for (target, expected) in steps {
        let updated = dispatch::update_status(&db, &call.id, target, ReleasePolicy::Automatic)
            .await
            .unwrap();
        assert_eq!(updated.status, target);
        let amb = ambulance_service::get(&db, &amb.id).await.unwrap();
        assert_eq!(amb.status, expected, "after {}", target);
    }
}

#[tokio::test]
async fn test_pending_call_cannot_jump_to_completed() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let call = call(&db, CallPriority::Low, &dispatcher).await;

    let err = dispatch::update_status(
        &db,
        &call.id,
        CallStatus::Completed,
        ReleasePolicy::Automatic,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidTransition(_)));
    let call = call_service::get(&db, &call.id).await.unwrap();
    assert_eq!(call.status, CallStatus::Pending);
}

#[tokio::test]
async fn test_status_endpoint_refuses_assigned_and_pending_targets() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let call = call(&db, CallPriority::Low, &dispatcher).await;

    for target in [CallStatus::Assigned, CallStatus::Pending] {
        let err = dispatch::update_status(&db, &call.id, target, ReleasePolicy::Automatic)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{}", target);
    }
}

#[tokio::test]
async fn test_cancel_pending_call_touches_no_ambulance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let call = call(&db, CallPriority::Low, &dispatcher).await;

    let cancelled = dispatch::update_status(
        &db,
        &call.id,
        CallStatus::Cancelled,
        ReleasePolicy::Automatic,
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, CallStatus::Cancelled);

    // Terminal: nothing moves it any more
    let err = dispatch::update_status(&db, &call.id, CallStatus::EnRoute, ReleasePolicy::Automatic)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_manual_release_keeps_ambulance_status() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    dispatch::update_status(&db, &call.id, CallStatus::EnRoute, ReleasePolicy::Manual)
        .await
        .unwrap();

    dispatch::update_status(&db, &call.id, CallStatus::Cancelled, ReleasePolicy::Manual)
        .await
        .unwrap();

    let amb = ambulance_service::get(&db, &amb.id).await.unwrap();
    assert_eq!(amb.status, AmbulanceStatus::EnRoute);
}

#[tokio::test]
async fn test_pending_list_is_ordered_by_priority_then_age() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let low = call(&db, CallPriority::Low, &dispatcher).await;
    let critical = call(&db, CallPriority::Critical, &dispatcher).await;
    let high_first = call(&db, CallPriority::High, &dispatcher).await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    let high_second = call(&db, CallPriority::High, &dispatcher).await;

    let pending = call_service::list_pending(&db).await.unwrap();
    let ids: Vec<_> = pending.iter().map(|c| c.id.as_str()).collect();

    assert_eq!(
        ids,
        vec![
            critical.id.as_str(),
            high_first.id.as_str(),
            high_second.id.as_str(),
            low.id.as_str()
        ]
    );
}

#[tokio::test]
async fn test_completing_trip_completes_call_and_frees_ambulance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let patient = patient(&db, "Robert Johnson").await;
    let call = call(&db, CallPriority::Critical, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    for target in [CallStatus::EnRoute, CallStatus::AtScene, CallStatus::Transporting] {
        dispatch::update_status(&db, &call.id, target, ReleasePolicy::Automatic)
            .await
            .unwrap();
    }

    let trip = trip_service::create(
        &db,
        TripDto {
            call_id: call.id.clone(),
            ambulance_id: amb.id.clone(),
            patient_id: patient.id.clone(),
            start_time: None,
            distance: 12.5,
            cost: 250.0,
        },
    )
    .await
    .unwrap();
    assert_eq!(trip.status, TripStatus::Active);
    let with_patient = call_service::get(&db, &call.id).await.unwrap();
    assert_eq!(with_patient.patient_id.as_deref(), Some(patient.id.as_str()));

    let done = trip_service::complete_trip(&db, &trip.id, ReleasePolicy::Automatic)
        .await
        .unwrap();
    assert_eq!(done.status, TripStatus::Completed);
    assert!(done.end_time.is_some());

    let call = call_service::get(&db, &call.id).await.unwrap();
    assert_eq!(call.status, CallStatus::Completed);
    let amb = ambulance_service::get(&db, &amb.id).await.unwrap();
    assert_eq!(amb.status, AmbulanceStatus::Available);

    let err = trip_service::complete_trip(&db, &trip.id, ReleasePolicy::Automatic)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_trip_needs_an_assigned_call() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let patient = patient(&db, "Alice Brown").await;
    let call = call(&db, CallPriority::Medium, &dispatcher).await;
    let dto = TripDto {
        call_id: call.id.clone(),
        ambulance_id: amb.id.clone(),
        patient_id: patient.id.clone(),
        start_time: None,
        distance: 3.0,
        cost: 80.0,
    };

    let err = trip_service::create(&db, dto.clone()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    trip_service::create(&db, dto.clone()).await.unwrap();
    let err = trip_service::create(&db, dto).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_trip_refuses_a_closed_call() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let patient = patient(&db, "Alice Brown").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    dispatch::update_status(&db, &call.id, CallStatus::Cancelled, ReleasePolicy::Automatic)
        .await
        .unwrap();

    let err = trip_service::create(
        &db,
        TripDto {
            call_id: call.id.clone(),
            ambulance_id: amb.id.clone(),
            patient_id: patient.id.clone(),
            start_time: None,
            distance: 4.0,
            cost: 90.0,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);
    assert_eq!(err.status().as_u16(), 409);
    assert!(trip_service::list_active(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_trip_must_use_the_dispatched_ambulance() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let dispatched = ambulance(&db, "AMB-001").await;
    let other = ambulance(&db, "AMB-002").await;
    let patient = patient(&db, "Alice Brown").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    dispatch::assign(&db, &call.id, &dispatched.id, &dispatcher)
        .await
        .unwrap();

    let err = trip_service::create(
        &db,
        TripDto {
            call_id: call.id.clone(),
            ambulance_id: other.id.clone(),
            patient_id: patient.id.clone(),
            start_time: None,
            distance: 4.0,
            cost: 90.0,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)), "got {:?}", err);
    assert!(trip_service::list_active(&db).await.unwrap().is_empty());
    let call = call_service::get(&db, &call.id).await.unwrap();
    assert!(call.patient_id.is_none());
}

#[tokio::test]
async fn test_dispatched_ambulance_cannot_be_moved_or_deleted_by_hand() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::Critical, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();

    let err = ambulance_service::set_status(
        &db,
        &amb.id,
        StatusUpdateDto {
            status: AmbulanceStatus::Maintenance,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);

    let err = ambulance_service::delete(&db, &amb.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {:?}", err);

    let amb = ambulance_service::get(&db, &amb.id).await.unwrap();
    assert_eq!(amb.status, AmbulanceStatus::Assigned);
}

#[tokio::test]
async fn test_manual_release_is_allowed_once_the_call_ends() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::High, &dispatcher).await;
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();
    dispatch::update_status(&db, &call.id, CallStatus::Cancelled, ReleasePolicy::Manual)
        .await
        .unwrap();
    let held = ambulance_service::get(&db, &amb.id).await.unwrap();
    assert_eq!(held.status, AmbulanceStatus::Assigned);

    let released = ambulance_service::set_status(
        &db,
        &amb.id,
        StatusUpdateDto {
            status: AmbulanceStatus::Available,
        },
    )
    .await
    .unwrap();

    assert_eq!(released.status, AmbulanceStatus::Available);
    let available = ambulance_service::list_available(&db).await.unwrap();
    assert_eq!(available.len(), 1);
}

#[tokio::test]
async fn test_edits_leave_dispatch_columns_alone() {
    let db = test_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let call = call(&db, CallPriority::Low, &dispatcher).await;
    // Edits are built from rows read before the assignment
    let stale_ambulance = ambulance_dto("AMB-001");
    let mut stale_call = call_dto(CallPriority::Low);
    stale_call.description = "Patient now unconscious".into();
    dispatch::assign(&db, &call.id, &amb.id, &dispatcher)
        .await
        .unwrap();

    let moved = ambulance_service::update_location(
        &db,
        &amb.id,
        LocationUpdateDto {
            latitude: 40.75,
            longitude: -73.99,
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.status, AmbulanceStatus::Assigned);
    assert_eq!(moved.location.map(|p| p.lat), Some(40.75));

    let edited = ambulance_service::update(&db, &amb.id, stale_ambulance)
        .await
        .unwrap();
    assert_eq!(edited.status, AmbulanceStatus::Assigned);

    let edited = call_service::update(&db, &call.id, stale_call).await.unwrap();
    assert_eq!(edited.description, "Patient now unconscious");
    assert_eq!(edited.status, CallStatus::Assigned);
    assert_eq!(edited.assigned_ambulance_id.as_deref(), Some(amb.id.as_str()));
}

#[tokio::test]
async fn test_claim_available_succeeds_only_once() {
    let db = test_db().await;
    let amb = ambulance(&db, "AMB-001").await;

    assert!(ambulance_repository::claim_available(&db, &amb.id).await.unwrap());
    assert!(!ambulance_repository::claim_available(&db, &amb.id).await.unwrap());
    assert!(!ambulance_repository::claim_available(&db, "missing").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_racing_assignments_attach_the_ambulance_once() {
    let db = file_db().await;
    let dispatcher = claims_for(&user(&db, "sarah", UserRole::Dispatcher).await);
    let amb = ambulance(&db, "AMB-001").await;
    let first = call(&db, CallPriority::Critical, &dispatcher).await;
    let second = call(&db, CallPriority::Critical, &dispatcher).await;

    let (a, b) = tokio::join!(
        dispatch::assign(&db, &first.id, &amb.id, &dispatcher),
        dispatch::assign(&db, &second.id, &amb.id, &dispatcher),
    );

    let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1, "first: {:?}, second: {:?}", a.err(), b.err());
    let mut attached = 0;
    for id in [&first.id, &second.id] {
        let stored = call_service::get(&db, id).await.unwrap();
        if stored.status == CallStatus::Assigned {
            assert_eq!(stored.assigned_ambulance_id.as_deref(), Some(amb.id.as_str()));
            attached += 1;
        } else {
            assert_eq!(stored.status, CallStatus::Pending);
            assert!(stored.assigned_ambulance_id.is_none());
        }
    }
    assert_eq!(attached, 1);
}
