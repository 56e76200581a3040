use chrono::{DateTime, Utc};
use contracts::domain::a003_emergency_call::aggregate::{
    CallPriority, EmergencyCall, RequesterDetails,
};
use contracts::domain::a003_emergency_call::lifecycle::CallStatus;
use contracts::domain::common::{EntityMetadata, Place};
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, NotSet, QueryOrder, Set};

use crate::shared::data::json_column::parse_code;
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_emergency_call")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub caller_name: String,
    pub caller_phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub priority: String,
    pub status: String,
    pub description: String,
    pub assigned_ambulance_id: Option<String>,
    pub dispatcher_id: Option<String>,
    pub patient_id: Option<String>,
    pub request_source: String,
    pub requester_type: String,
    pub organization_name: Option<String>,
    pub department_name: Option<String>,
    pub contact_person: Option<String>,
    pub reference_number: Option<String>,
    pub response_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for EmergencyCall {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(EmergencyCall {
            id: m.id,
            caller_name: m.caller_name,
            caller_phone: m.caller_phone,
            location: Place {
                lat: m.latitude,
                lng: m.longitude,
                address: m.address,
            },
            priority: parse_code(&m.priority, "priority")?,
            status: parse_code(&m.status, "status")?,
            description: m.description,
            assigned_ambulance_id: m.assigned_ambulance_id,
            dispatcher_id: m.dispatcher_id,
            patient_id: m.patient_id,
            request_source: parse_code(&m.request_source, "request_source")?,
            requester_type: parse_code(&m.requester_type, "requester_type")?,
            requester_details: RequesterDetails {
                organization_name: m.organization_name,
                department_name: m.department_name,
                contact_person: m.contact_person,
                reference_number: m.reference_number,
            },
            response_time: m.response_time,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &EmergencyCall) -> ActiveModel {
    let details = &aggregate.requester_details;
    ActiveModel {
        id: Set(aggregate.id.clone()),
        caller_name: Set(aggregate.caller_name.clone()),
        caller_phone: Set(aggregate.caller_phone.clone()),
        latitude: Set(aggregate.location.lat),
        longitude: Set(aggregate.location.lng),
        address: Set(aggregate.location.address.clone()),
        priority: Set(aggregate.priority.as_str().to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        description: Set(aggregate.description.clone()),
        assigned_ambulance_id: Set(aggregate.assigned_ambulance_id.clone()),
        dispatcher_id: Set(aggregate.dispatcher_id.clone()),
        patient_id: Set(aggregate.patient_id.clone()),
        request_source: Set(aggregate.request_source.as_str().to_string()),
        requester_type: Set(aggregate.requester_type.as_str().to_string()),
        organization_name: Set(details.organization_name.clone()),
        department_name: Set(details.department_name.clone()),
        contact_person: Set(details.contact_person.clone()),
        reference_number: Set(details.reference_number.clone()),
        response_time: Set(aggregate.response_time),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    }
}

/// `?status=&priority=` filters of the list endpoint
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CallFilter {
    pub status: Option<CallStatus>,
    pub priority: Option<CallPriority>,
}

/// Statuses in which a call holds on to its ambulance
fn active_status_codes() -> Vec<&'static str> {
    CallStatus::all()
        .iter()
        .filter(|s| s.is_active())
        .map(|s| s.as_str())
        .collect()
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &CallFilter,
    params: &PageParams,
) -> anyhow::Result<Page<EmergencyCall>> {
    let mut query = Entity::find().order_by_desc(Column::CreatedAt);
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(Column::Priority.eq(priority.as_str()));
    }
    fetch_page(conn, query, params).await
}

pub async fn list_all(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<EmergencyCall>> {
    fetch_all(conn, Entity::find().order_by_desc(Column::CreatedAt)).await
}

/// Pending calls, most urgent first, oldest first within a priority
pub async fn list_pending(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<EmergencyCall>> {
    let query = Entity::find()
        .filter(Column::Status.eq(CallStatus::Pending.as_str()))
        .order_by_asc(Column::CreatedAt);
    let mut calls: Vec<EmergencyCall> = fetch_all(conn, query).await?;
    calls.sort_by_key(|call| call.priority.rank());
    Ok(calls)
}

pub async fn get_by_id(
    conn: &impl ConnectionTrait,
    id: &str,
) -> anyhow::Result<Option<EmergencyCall>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(EmergencyCall::try_from)
        .transpose()
}

/// The non-terminal call an ambulance is attached to, if any
pub async fn find_active_for_ambulance(
    conn: &impl ConnectionTrait,
    ambulance_id: &str,
) -> anyhow::Result<Option<EmergencyCall>> {
    Entity::find()
        .filter(Column::AssignedAmbulanceId.eq(ambulance_id))
        .filter(Column::Status.is_in(active_status_codes()))
        .one(conn)
        .await?
        .map(EmergencyCall::try_from)
        .transpose()
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &EmergencyCall) -> anyhow::Result<()> {
    to_active(aggregate).insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &EmergencyCall) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}

/// Write the descriptive columns only. Status, ambulance, dispatcher and
/// response time belong to dispatch.
pub async fn update_details(
    conn: &impl ConnectionTrait,
    aggregate: &EmergencyCall,
) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.status = NotSet;
    active.assigned_ambulance_id = NotSet;
    active.dispatcher_id = NotSet;
    active.response_time = NotSet;
    active.update(conn).await?;
    Ok(())
}

/// Link a patient to a call that has none yet
pub async fn set_patient_if_missing(
    conn: &impl ConnectionTrait,
    id: &str,
    patient_id: &str,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::PatientId, Expr::value(patient_id))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id))
        .filter(Column::PatientId.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
