use chrono::Utc;
use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a002_patient::aggregate::Patient;
use contracts::domain::a003_emergency_call::aggregate::EmergencyCall;
use contracts::domain::a003_emergency_call::lifecycle::{CallAction, ReleasePolicy};
use contracts::domain::a004_trip::aggregate::{Trip, TripDto, TripStatus};
use contracts::domain::common::AggregateRoot;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository::{self, TripFilter};
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::domain::a002_patient::repository as patient_repository;
use crate::domain::a003_emergency_call::dispatch;
use crate::domain::a003_emergency_call::repository as call_repository;
use crate::shared::error::{ServiceError, ServiceResult};

/// Open the transport for a dispatched call
pub async fn create(db: &DatabaseConnection, dto: TripDto) -> ServiceResult<Trip> {
    let txn = db.begin().await?;

    let call = call_repository::get_by_id(&txn, &dto.call_id)
        .await?
        .ok_or(ServiceError::NotFound(EmergencyCall::element_name()))?;
    if repository::get_by_call_id(&txn, &call.id).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "Call {} already has a trip",
            call.id
        )));
    }
    let Some(assigned_ambulance_id) = call.assigned_ambulance_id.as_deref() else {
        return Err(ServiceError::validation(
            "The call has no ambulance assigned yet",
        ));
    };
    if !call.status.is_active() {
        return Err(ServiceError::conflict(format!(
            "Call {} is {} and cannot start a trip",
            call.id, call.status
        )));
    }
    if ambulance_repository::get_by_id(&txn, &dto.ambulance_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(Ambulance::element_name()));
    }
    if dto.ambulance_id != assigned_ambulance_id {
        return Err(ServiceError::validation(format!(
            "Ambulance {} is not the one dispatched to call {}",
            dto.ambulance_id, call.id
        )));
    }
    if patient_repository::get_by_id(&txn, &dto.patient_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(Patient::element_name()));
    }

    let mut aggregate = Trip::new_for_insert(dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();
    repository::insert(&txn, &aggregate).await?;

    if call.patient_id.is_none() {
        call_repository::set_patient_if_missing(&txn, &call.id, &aggregate.patient_id).await?;
    }

    txn.commit().await?;
    tracing::info!("Trip {} started for call {}", aggregate.id, aggregate.call_id);
    Ok(aggregate)
}

/// Close an active trip, completing its call and releasing the ambulance
pub async fn complete_trip(
    db: &DatabaseConnection,
    id: &str,
    policy: ReleasePolicy,
) -> ServiceResult<Trip> {
    let txn = db.begin().await?;

    let mut trip = get(&txn, id).await?;
    if trip.status != TripStatus::Active {
        return Err(ServiceError::conflict("Trip is already completed"));
    }
    trip.complete(Utc::now()).map_err(ServiceError::Conflict)?;
    trip.before_write();
    repository::update(&txn, &trip).await?;

    let mut call = call_repository::get_by_id(&txn, &trip.call_id)
        .await?
        .ok_or(ServiceError::NotFound(EmergencyCall::element_name()))?;
    // A call closed before its trip has nothing left to move
    if !call.status.is_terminal() {
        dispatch::apply_action(&txn, &mut call, CallAction::Complete, policy).await?;
    }

    txn.commit().await?;
    tracing::info!("Trip {} completed", trip.id);
    Ok(trip)
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<Trip> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(Trip::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &TripFilter,
    params: &PageParams,
) -> ServiceResult<Page<Trip>> {
    Ok(repository::list(conn, filter, params).await?)
}

pub async fn list_active(conn: &impl ConnectionTrait) -> ServiceResult<Vec<Trip>> {
    Ok(repository::list_active(conn).await?)
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<()> {
    if !repository::delete(conn, id).await? {
        return Err(ServiceError::NotFound(Trip::element_name()));
    }
    Ok(())
}
