use contracts::domain::a002_patient::aggregate::{Patient, PatientDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::ConnectionTrait;

use super::repository;
use crate::domain::a004_trip::repository as trip_repository;
use crate::shared::error::{ServiceError, ServiceResult};

pub async fn create(conn: &impl ConnectionTrait, dto: PatientDto) -> ServiceResult<Patient> {
    let mut aggregate = Patient::new_for_insert(dto);
    aggregate.validate().map_err(ServiceError::Validation)?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;
    Ok(aggregate)
}

pub async fn update(conn: &impl ConnectionTrait, id: &str, dto: PatientDto) -> ServiceResult<Patient> {
    let mut aggregate = get(conn, id).await?;
    aggregate.update(dto);
    aggregate.validate().map_err(ServiceError::Validation)?;

    aggregate.before_write();
    repository::update(conn, &aggregate).await?;
    Ok(aggregate)
}

/// Patients with trips on record are kept
pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<()> {
    let aggregate = get(conn, id).await?;
    let trips = trip_repository::count_for_patient(conn, id).await?;
    if trips > 0 {
        return Err(ServiceError::conflict(format!(
            "Patient {} has {} trip(s) on record",
            aggregate.name, trips
        )));
    }
    repository::delete(conn, id).await?;
    Ok(())
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<Patient> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(Patient::element_name()))
}

pub async fn list(conn: &impl ConnectionTrait, params: &PageParams) -> ServiceResult<Page<Patient>> {
    Ok(repository::list(conn, params).await?)
}
