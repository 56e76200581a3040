use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a006_paramedic_inspection::aggregate::{
    ParamedicInspection, ParamedicInspectionDto,
};
use contracts::domain::common::AggregateRoot;
use contracts::enums::UserRole;
use contracts::shared::pagination::{Page, PageParams};
use contracts::system::auth::TokenClaims;
use sea_orm::ConnectionTrait;

use super::repository;
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::domain::a005_driver_inspection::repository::InspectionFilter;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::users::service as user_service;

/// Paramedics only ever see their own inspections
fn owner_scope(actor: &TokenClaims) -> Option<&str> {
    (actor.role == UserRole::Paramedic).then_some(actor.sub.as_str())
}

/// Only paramedics and admins file or edit these inspections
fn ensure_can_file(actor: &TokenClaims) -> ServiceResult<()> {
    if actor.is_admin() || actor.role == UserRole::Paramedic {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Who the inspection is filed under: admins may name a paramedic, everyone
/// else files under their own id
async fn resolve_paramedic(
    conn: &impl ConnectionTrait,
    requested: Option<String>,
    actor: &TokenClaims,
) -> ServiceResult<Option<String>> {
    match requested {
        Some(paramedic_id) if actor.is_admin() && paramedic_id != actor.sub => {
            user_service::ensure_role(conn, Some(&paramedic_id), UserRole::Paramedic).await?;
            Ok(Some(paramedic_id))
        }
        _ if actor.is_admin() => Ok(None),
        _ => Ok(Some(actor.sub.clone())),
    }
}

async fn check_before_write(
    conn: &impl ConnectionTrait,
    aggregate: &ParamedicInspection,
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
    mut dto: ParamedicInspectionDto,
    actor: &TokenClaims,
) -> ServiceResult<ParamedicInspection> {
    ensure_can_file(actor)?;
    let paramedic_id = resolve_paramedic(conn, dto.paramedic_id.take(), actor)
        .await?
        .unwrap_or_else(|| actor.sub.clone());
    let mut aggregate = ParamedicInspection::new_for_insert(dto, paramedic_id);
    check_before_write(conn, &aggregate).await?;

    aggregate.before_write();
    repository::insert(conn, &aggregate).await?;

    let today = aggregate.date;
    let faulty = aggregate
        .medical_equipment
        .iter()
        .filter(|item| !item.is_working || item.needs_replacement || item.is_expired(today))
        .count();
    if faulty > 0 {
        tracing::warn!(
            "Paramedic inspection {} reports {} faulty or expired item(s) on ambulance {}",
            aggregate.id,
            faulty,
            aggregate.ambulance_id
        );
    }
    Ok(aggregate)
}

pub async fn update(
    conn: &impl ConnectionTrait,
    id: &str,
    mut dto: ParamedicInspectionDto,
    actor: &TokenClaims,
) -> ServiceResult<ParamedicInspection> {
    ensure_can_file(actor)?;
    let mut aggregate = get(conn, id, actor).await?;
    let reassigned = match dto.paramedic_id.take() {
        Some(paramedic_id) if actor.is_admin() => {
            resolve_paramedic(conn, Some(paramedic_id), actor).await?
        }
        _ => None,
    };
    aggregate.update(dto);
    if let Some(paramedic_id) = reassigned {
        aggregate.paramedic_id = paramedic_id;
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

/// Another paramedic's inspection reads as missing
pub async fn get(
    conn: &impl ConnectionTrait,
    id: &str,
    actor: &TokenClaims,
) -> ServiceResult<ParamedicInspection> {
    repository::get_by_id(conn, id)
        .await?
        .filter(|inspection| owner_scope(actor).map_or(true, |own| inspection.paramedic_id == own))
        .ok_or(ServiceError::NotFound(ParamedicInspection::element_name()))
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &InspectionFilter,
    params: &PageParams,
    actor: &TokenClaims,
) -> ServiceResult<Page<ParamedicInspection>> {
    Ok(repository::list(conn, filter, owner_scope(actor), params).await?)
}
