use contracts::domain::a003_emergency_call::aggregate::{EmergencyCall, EmergencyCallDto};
use contracts::domain::common::AggregateRoot;
use contracts::enums::UserRole;
use contracts::shared::pagination::{Page, PageParams};
use contracts::system::auth::TokenClaims;
use sea_orm::ConnectionTrait;

use super::repository::{self, CallFilter};
use crate::domain::a002_patient::repository as patient_repository;
use crate::shared::error::{ServiceError, ServiceResult};

async fn ensure_patient_exists(conn: &impl ConnectionTrait, patient_id: Option<&str>) -> ServiceResult<()> {
    if let Some(patient_id) = patient_id {
        if patient_repository::get_by_id(conn, patient_id).await?.is_none() {
            return Err(ServiceError::validation(format!(
                "Patient {} does not exist",
                patient_id
            )));
        }
    }
    Ok(())
}

/// Intake of a new call. It starts `pending` without an ambulance; a
/// dispatcher creating it becomes its dispatcher.
pub async fn create(
    conn: &impl ConnectionTrait,
    dto: EmergencyCallDto,
    actor: &TokenClaims,
) -> ServiceResult<EmergencyCall> {
    let dispatcher_id = (actor.role == UserRole::Dispatcher).then(|| actor.sub.clone());
    let mut aggregate = EmergencyCall::new_for_insert(dto, dispatcher_id);
    aggregate.validate().map_err(ServiceError::Validation)?;
    ensure_patient_exists(conn, aggregate.patient_id.as_deref()).await?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;

    tracing::info!(
        "New {} call {} from {}",
        aggregate.priority,
        aggregate.id,
        aggregate.caller_name
    );
    Ok(aggregate)
}

/// Edit descriptive fields; status and ambulance only move through dispatch
pub async fn update(
    conn: &impl ConnectionTrait,
    id: &str,
    dto: EmergencyCallDto,
) -> ServiceResult<EmergencyCall> {
    let mut aggregate = get(conn, id).await?;
    aggregate.update(dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    ensure_patient_exists(conn, aggregate.patient_id.as_deref()).await?;

    aggregate.before_write();
    repository::update_details(conn, &aggregate).await?;
    get(conn, id).await
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<EmergencyCall> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(EmergencyCall::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &CallFilter,
    params: &PageParams,
) -> ServiceResult<Page<EmergencyCall>> {
    Ok(repository::list(conn, filter, params).await?)
}

pub async fn list_pending(conn: &impl ConnectionTrait) -> ServiceResult<Vec<EmergencyCall>> {
    Ok(repository::list_pending(conn).await?)
}
