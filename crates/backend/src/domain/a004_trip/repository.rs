use chrono::{DateTime, Utc};
use contracts::domain::a004_trip::aggregate::{Trip, TripStatus};
use contracts::domain::common::EntityMetadata;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

use crate::shared::data::json_column::parse_code;
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_trip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub call_id: String,
    pub ambulance_id: String,
    pub patient_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub distance: f64,
    pub cost: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Trip {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(Trip {
            id: m.id,
            call_id: m.call_id,
            ambulance_id: m.ambulance_id,
            patient_id: m.patient_id,
            start_time: m.start_time,
            end_time: m.end_time,
            distance: m.distance,
            cost: m.cost,
            status: parse_code(&m.status, "status")?,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &Trip) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.clone()),
        call_id: Set(aggregate.call_id.clone()),
        ambulance_id: Set(aggregate.ambulance_id.clone()),
        patient_id: Set(aggregate.patient_id.clone()),
        start_time: Set(aggregate.start_time),
        end_time: Set(aggregate.end_time),
        distance: Set(aggregate.distance),
        cost: Set(aggregate.cost),
        status: Set(aggregate.status.as_str().to_string()),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    }
}

/// `?status=&ambulance_id=` filters of the list endpoint
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub ambulance_id: Option<String>,
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &TripFilter,
    params: &PageParams,
) -> anyhow::Result<Page<Trip>> {
    let mut query = Entity::find().order_by_desc(Column::CreatedAt);
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(ambulance_id) = &filter.ambulance_id {
        query = query.filter(Column::AmbulanceId.eq(ambulance_id.as_str()));
    }
    fetch_page(conn, query, params).await
}

pub async fn list_active(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<Trip>> {
    let query = Entity::find()
        .filter(Column::Status.eq(TripStatus::Active.as_str()))
        .order_by_desc(Column::StartTime);
    fetch_all(conn, query).await
}

/// Trips that started at or after `since`
pub async fn list_started_since(
    conn: &impl ConnectionTrait,
    since: DateTime<Utc>,
) -> anyhow::Result<Vec<Trip>> {
    let query = Entity::find()
        .filter(Column::StartTime.gte(since))
        .order_by_asc(Column::StartTime);
    fetch_all(conn, query).await
}

pub async fn get_by_id(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<Option<Trip>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(Trip::try_from)
        .transpose()
}

pub async fn get_by_call_id(conn: &impl ConnectionTrait, call_id: &str) -> anyhow::Result<Option<Trip>> {
    Entity::find()
        .filter(Column::CallId.eq(call_id))
        .one(conn)
        .await?
        .map(Trip::try_from)
        .transpose()
}

pub async fn count_for_patient(conn: &impl ConnectionTrait, patient_id: &str) -> anyhow::Result<u64> {
    Ok(Entity::find()
        .filter(Column::PatientId.eq(patient_id))
        .count(conn)
        .await?)
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &Trip) -> anyhow::Result<()> {
    to_active(aggregate).insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &Trip) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
