use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a007_maintenance_record::aggregate::{MaintenanceRecord, MaintenanceRecordDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::ConnectionTrait;

use super::repository::{self, MaintenanceFilter};
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::shared::error::{ServiceError, ServiceResult};

async fn check_before_write(
    conn: &impl ConnectionTrait,
    aggregate: &MaintenanceRecord,
) -> ServiceResult<()> {
    aggregate.validate().map_err(ServiceError::Validation)?;
    if ambulance_repository::get_by_id(conn, &aggregate.ambulance_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(Ambulance::element_name()));
    }
    Ok(())
}

pub async fn create(
    conn: &impl ConnectionTrait,
    dto: MaintenanceRecordDto,
) -> ServiceResult<MaintenanceRecord> {
    let mut aggregate = MaintenanceRecord::new_for_insert(dto);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;
    tracing::info!(
        "{} scheduled for ambulance {} on {}",
        aggregate.maintenance_type,
        aggregate.ambulance_id,
        aggregate.scheduled_date
    );
    Ok(aggregate)
}

pub async fn update(
    conn: &impl ConnectionTrait,
    id: &str,
    dto: MaintenanceRecordDto,
) -> ServiceResult<MaintenanceRecord> {
    let mut aggregate = get(conn, id).await?;
    aggregate.update(dto);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::update(conn, &aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<()> {
    if !repository::delete(conn, id).await? {
        return Err(ServiceError::NotFound(MaintenanceRecord::element_name()));
    }
    Ok(())
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<MaintenanceRecord> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(MaintenanceRecord::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &MaintenanceFilter,
    params: &PageParams,
) -> ServiceResult<Page<MaintenanceRecord>> {
    Ok(repository::list(conn, filter, params).await?)
}
