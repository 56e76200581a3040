//! Dispatch operations on an emergency call.
//!
//! Each operation runs in one database transaction that covers both the call
//! and its ambulance. Only the transaction handle is used inside: the
//! in-memory pool has a single connection.

use chrono::Utc;
use contracts::domain::a001_ambulance::aggregate::Ambulance;
use contracts::domain::a003_emergency_call::aggregate::EmergencyCall;
use contracts::domain::a003_emergency_call::lifecycle::{CallAction, CallStatus, ReleasePolicy};
use contracts::domain::common::AggregateRoot;
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::a001_ambulance::repository as ambulance_repository;
use crate::shared::error::{ServiceError, ServiceResult};

/// Attach an available ambulance to a pending call
pub async fn assign(
    db: &DatabaseConnection,
    call_id: &str,
    ambulance_id: &str,
    actor: &TokenClaims,
) -> ServiceResult<EmergencyCall> {
    let txn = db.begin().await?;

    let mut call = repository::get_by_id(&txn, call_id)
        .await?
        .ok_or(ServiceError::NotFound(EmergencyCall::element_name()))?;
    let ambulance = ambulance_repository::get_by_id(&txn, ambulance_id)
        .await?
        .ok_or(ServiceError::NotFound(Ambulance::element_name()))?;

    let dispatcher_id = (actor.role == UserRole::Dispatcher).then(|| actor.sub.clone());
    if let Err(e) = call.assign(&ambulance.id, dispatcher_id, Utc::now()) {
        tracing::warn!("Rejected assignment of call {}: {}", call.id, e);
        return Err(e.into());
    }

    if !ambulance.is_available() {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} is not available (status: {})",
            ambulance.vehicle_number, ambulance.status
        )));
    }
    if let Some(other) = repository::find_active_for_ambulance(&txn, &ambulance.id).await? {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} is already dispatched to call {}",
            ambulance.vehicle_number, other.id
        )));
    }
    if !ambulance_repository::claim_available(&txn, &ambulance.id).await? {
        return Err(ServiceError::conflict(format!(
            "Ambulance {} was taken by another dispatcher",
            ambulance.vehicle_number
        )));
    }

    call.before_write();
    repository::update(&txn, &call).await?;
    txn.commit().await?;

    tracing::info!(
        "Call {} assigned to ambulance {} (response time {} min)",
        call.id,
        ambulance.vehicle_number,
        call.response_time.unwrap_or_default()
    );
    Ok(call)
}

/// Move a call to `target` and mirror the change onto its ambulance
pub async fn update_status(
    db: &DatabaseConnection,
    call_id: &str,
    target: CallStatus,
    policy: ReleasePolicy,
) -> ServiceResult<EmergencyCall> {
    let action = match target {
        CallStatus::Assigned => {
            return Err(ServiceError::validation(
                "Use the assign endpoint to attach an ambulance",
            ))
        }
        other => CallAction::toward(other).ok_or_else(|| {
            ServiceError::validation(format!("'{}' is not a valid target status", other))
        })?,
    };

    let txn = db.begin().await?;
    let mut call = repository::get_by_id(&txn, call_id)
        .await?
        .ok_or(ServiceError::NotFound(EmergencyCall::element_name()))?;

    apply_action(&txn, &mut call, action, policy).await?;
    txn.commit().await?;
    Ok(call)
}

/// Run `action` on a loaded call and its ambulance inside the caller's
/// transaction. Shared with trip completion.
pub(crate) async fn apply_action(
    conn: &impl ConnectionTrait,
    call: &mut EmergencyCall,
    action: CallAction,
    policy: ReleasePolicy,
) -> ServiceResult<()> {
    let previous = call.status;
    let next = match call.advance(action) {
        Ok(next) => next,
        Err(e) => {
            tracing::warn!("Rejected status change of call {}: {}", call.id, e);
            return Err(e.into());
        }
    };

    call.before_write();
    repository::update(conn, call).await?;

    if let (Some(ambulance_id), Some(status)) = (
        call.assigned_ambulance_id.as_deref(),
        policy.ambulance_status_for(next),
    ) {
        ambulance_repository::set_status(conn, ambulance_id, status).await?;
    }

    tracing::info!("Call {} status {} -> {}", call.id, previous, next);
    Ok(())
}
