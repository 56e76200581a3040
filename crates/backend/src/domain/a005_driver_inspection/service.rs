use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a005_driver_inspection::aggregate::{DriverInspection, DriverInspectionDto};
use contracts::domain::common::AggregateRoot;
use contracts::enums::UserRole;
use contracts::shared::pagination::{Page, PageParams};
use contracts::system::auth::TokenClaims;
use sea_orm::ConnectionTrait;

use super::repository::{self, InspectionFilter};
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::users::service as user_service;

/// Drivers only ever see their own inspections
fn owner_scope(actor: &TokenClaims) -> Option<&str> {
    (actor.role == UserRole::Driver).then_some(actor.sub.as_str())
}

/// Only drivers and admins file or edit these inspections
fn ensure_can_file(actor: &TokenClaims) -> ServiceResult<()> {
    if actor.is_admin() || actor.role == UserRole::Driver {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Who the inspection is filed under: admins may name a driver, everyone
/// else files under their own id
async fn resolve_driver(
    conn: &impl ConnectionTrait,
    requested: Option<String>,
    actor: &TokenClaims,
) -> ServiceResult<Option<String>> {
    match requested {
        Some(driver_id) if actor.is_admin() && driver_id != actor.sub => {
            user_service::ensure_role(conn, Some(&driver_id), UserRole::Driver).await?;
            Ok(Some(driver_id))
        }
        _ if actor.is_admin() => Ok(None),
        _ => Ok(Some(actor.sub.clone())),
    }
}

async fn check_before_write(
    conn: &impl ConnectionTrait,
    aggregate: &DriverInspection,
) -> ServiceResult<()> {
    aggregate.validate().map_err(ServiceError::Validation)?;

    if ambulance_repository::get_by_id(conn, &aggregate.ambulance_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound(Ambulance::element_name()));
    }
    if repository::find_duplicate(conn, aggregate).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "An inspection for this ambulance on {} ({} shift) already exists",
            aggregate.date, aggregate.shift
        )));
    }
    Ok(())
}

pub async fn create(
    conn: &impl ConnectionTrait,
    mut dto: DriverInspectionDto,
    actor: &TokenClaims,
) -> ServiceResult<DriverInspection> {
    ensure_can_file(actor)?;
    let driver_id = resolve_driver(conn, dto.driver_id.take(), actor)
        .await?
        .unwrap_or_else(|| actor.sub.clone());
    let mut aggregate = DriverInspection::new_for_insert(dto, driver_id);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;

    let flagged = aggregate.flagged_items().count();
    if flagged > 0 {
        tracing::warn!(
            "Driver inspection {} flags {} item(s) on ambulance {}",
            aggregate.id,
            flagged,
            aggregate.ambulance_id
        );
    }
    Ok(aggregate)
}

pub async fn update(
    conn: &impl ConnectionTrait,
    id: &str,
    mut dto: DriverInspectionDto,
    actor: &TokenClaims,
) -> ServiceResult<DriverInspection> {
    ensure_can_file(actor)?;
    let mut aggregate = get(conn, id, actor).await?;
    let reassigned = match dto.driver_id.take() {
        Some(driver_id) if actor.is_admin() => {
            resolve_driver(conn, Some(driver_id), actor).await?
        }
        _ => None,
    };
    aggregate.update(dto);
    if let Some(driver_id) = reassigned {
        aggregate.driver_id = driver_id;
    }
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::update(conn, &aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str, actor: &TokenClaims) -> ServiceResult<()> {
    let aggregate = get(conn, id, actor).await?;
    repository::delete(conn, &aggregate.id).await?;
    Ok(())
}

/// Another driver's inspection reads as missing
pub async fn get(
    conn: &impl ConnectionTrait,
    id: &str,
    actor: &TokenClaims,
) -> ServiceResult<DriverInspection> {
    repository::get_by_id(conn, id)
        .await?
        .filter(|inspection| owner_scope(actor).map_or(true, |own| inspection.driver_id == own))
        .ok_or(ServiceError::NotFound(DriverInspection::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &InspectionFilter,
    params: &PageParams,
    actor: &TokenClaims,
) -> ServiceResult<Page<DriverInspection>> {
    Ok(repository::list(conn, filter, owner_scope(actor), params).await?)
}
