use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a007_maintenance_record::aggregate::{
    MaintenanceRecord, MaintenanceStatus, MaintenanceType,
};
use contracts::domain::common::EntityMetadata;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

use crate::shared::data::json_column::parse_code;
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a007_maintenance_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub ambulance_id: String,
    pub maintenance_type: String,
    pub status: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub description: String,
    pub cost: Option<f64>,
    pub vendor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MaintenanceRecord {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(MaintenanceRecord {
            id: m.id,
            ambulance_id: m.ambulance_id,
            maintenance_type: parse_code(&m.maintenance_type, "maintenance_type")?,
            status: parse_code(&m.status, "status")?,
            scheduled_date: m.scheduled_date,
            completed_date: m.completed_date,
            description: m.description,
            cost: m.cost,
            vendor: m.vendor,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &MaintenanceRecord) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.clone()),
        ambulance_id: Set(aggregate.ambulance_id.clone()),
        maintenance_type: Set(aggregate.maintenance_type.as_str().to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        scheduled_date: Set(aggregate.scheduled_date),
        completed_date: Set(aggregate.completed_date),
        description: Set(aggregate.description.clone()),
        cost: Set(aggregate.cost),
        vendor: Set(aggregate.vendor.clone()),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    }
}

/// Query filters of the list endpoint; dates bound `scheduled_date`
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MaintenanceFilter {
    pub ambulance_id: Option<String>,
    pub maintenance_type: Option<MaintenanceType>,
    pub status: Option<MaintenanceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &MaintenanceFilter,
    params: &PageParams,
) -> anyhow::Result<Page<MaintenanceRecord>> {
    let mut query = Entity::find().order_by_desc(Column::ScheduledDate);
    if let Some(ambulance_id) = &filter.ambulance_id {
        query = query.filter(Column::AmbulanceId.eq(ambulance_id.as_str()));
    }
    if let Some(maintenance_type) = filter.maintenance_type {
        query = query.filter(Column::MaintenanceType.eq(maintenance_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(date_from) = filter.date_from {
        query = query.filter(Column::ScheduledDate.gte(date_from));
    }
    if let Some(date_to) = filter.date_to {
        query = query.filter(Column::ScheduledDate.lte(date_to));
    }
    fetch_page(conn, query, params).await
}

pub async fn list_all(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<MaintenanceRecord>> {
    fetch_all(conn, Entity::find().order_by_asc(Column::ScheduledDate)).await
}

pub async fn get_by_id(
    conn: &impl ConnectionTrait,
    id: &str,
) -> anyhow::Result<Option<MaintenanceRecord>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(MaintenanceRecord::try_from)
        .transpose()
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &MaintenanceRecord) -> anyhow::Result<()> {
    to_active(aggregate).insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &MaintenanceRecord) -> anyhow::Result<()> {
    to_active(aggregate).update(conn).await?;
    Ok(())
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
