use contracts::domain::a001_ambulance::aggregate::{
    Ambulance, AmbulanceDto, LocationUpdateDto, StatusUpdateDto,
};
use contracts::domain::common::{AggregateRoot, GeoPoint};
use contracts::enums::UserRole;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository::{self, AmbulanceFilter};
use crate::domain::a003_emergency_call::repository as call_repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::users::service as user_service;

async fn check_before_write(conn: &impl ConnectionTrait, aggregate: &Ambulance) -> ServiceResult<()> {
    aggregate.validate().map_err(ServiceError::Validation)?;

    if let Some(other) = repository::find_duplicate(conn, aggregate).await? {
        let field = if other.vehicle_number == aggregate.vehicle_number {
            format!("vehicle number '{}'", aggregate.vehicle_number)
        } else {
            format!("license number '{}'", aggregate.license_number)
        };
        return Err(ServiceError::conflict(format!(
            "Another ambulance already uses {}",
            field
        )));
    }

    user_service::ensure_role(conn, aggregate.assigned_driver_id.as_deref(), UserRole::Driver)
        .await?;
    user_service::ensure_role(
        conn,
        aggregate.assigned_paramedic_id.as_deref(),
        UserRole::Paramedic,
    )
    .await?;
    Ok(())
}

/// Refuse to touch an ambulance while a call holds on to it
async fn ensure_not_dispatched(conn: &impl ConnectionTrait, ambulance: &Ambulance) -> ServiceResult<()> {
    if let Some(call) = call_repository::find_active_for_ambulance(conn, &ambulance.id).await? {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} is dispatched to call {} ({})",
            ambulance.vehicle_number, call.id, call.status
        )));
    }
    Ok(())
}

pub async fn create(conn: &impl ConnectionTrait, dto: AmbulanceDto) -> ServiceResult<Ambulance> {
    let mut aggregate = Ambulance::new_for_insert(dto);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;

    tracing::info!(
        "Created ambulance {} ({})",
        aggregate.vehicle_number,
        aggregate.id
    );
    Ok(aggregate)
}

/// Full edit. Status is kept: it changes through dispatch or the status endpoint.
pub async fn update(conn: &impl ConnectionTrait, id: &str, dto: AmbulanceDto) -> ServiceResult<Ambulance> {
    let mut aggregate = get(conn, id).await?;
    aggregate.update(dto);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::update_details(conn, &aggregate).await?;
    get(conn, id).await
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let aggregate = get(&txn, id).await?;
    ensure_not_dispatched(&txn, &aggregate).await?;

    if !repository::delete_with_status(&txn, id, aggregate.status).await? {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} changed status while being deleted",
            aggregate.vehicle_number
        )));
    }
    txn.commit().await?;
    tracing::info!("Deleted ambulance {}", aggregate.vehicle_number);
    Ok(())
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<Ambulance> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(Ambulance::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &AmbulanceFilter,
    params: &PageParams,
) -> ServiceResult<Page<Ambulance>> {
    Ok(repository::list(conn, filter, params).await?)
}

pub async fn list_available(conn: &impl ConnectionTrait) -> ServiceResult<Vec<Ambulance>> {
    Ok(repository::list_available(conn).await?)
}

pub async fn update_location(
    conn: &impl ConnectionTrait,
    id: &str,
    dto: LocationUpdateDto,
) -> ServiceResult<Ambulance> {
    let point = GeoPoint {
        lat: dto.latitude,
        lng: dto.longitude,
    };
    point.validate().map_err(ServiceError::Validation)?;

    if !repository::set_location(conn, id, point).await? {
        return Err(ServiceError::NotFound(Ambulance::element_name()));
    }
    get(conn, id).await
}

/// Manual status change, e.g. sending a vehicle to maintenance or releasing
/// it after a call under the manual release policy
pub async fn set_status(
    db: &DatabaseConnection,
    id: &str,
    dto: StatusUpdateDto,
) -> ServiceResult<Ambulance> {
    let txn = db.begin().await?;
    let aggregate = get(&txn, id).await?;
    if aggregate.status == dto.status {
        return Ok(aggregate);
    }
    ensure_not_dispatched(&txn, &aggregate).await?;

    if !repository::set_status_from(&txn, id, aggregate.status, dto.status).await? {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} changed status in the meantime",
            aggregate.vehicle_number
        )));
    }
    let updated = get(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        "Ambulance {} status {} -> {}",
        updated.vehicle_number,
        aggregate.status,
        updated.status
    );
    Ok(updated)
}
