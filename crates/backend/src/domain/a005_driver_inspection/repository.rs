use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a005_driver_inspection::aggregate::{DriverInspection, ReadinessStatus};
use contracts::domain::common::EntityMetadata;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

use crate::shared::data::json_column::{from_json, parse_code, to_json};
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_driver_inspection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub driver_id: String,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: String,
    /// JSON array of checklist items
    pub vehicle_inspection: String,
    pub mileage: i32,
    pub fuel_level: i32,
    pub overall_status: String,
    pub additional_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DriverInspection {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(DriverInspection {
            id: m.id,
            driver_id: m.driver_id,
            ambulance_id: m.ambulance_id,
            date: m.date,
            shift: parse_code(&m.shift, "shift")?,
            vehicle_inspection: from_json(&m.vehicle_inspection, "vehicle_inspection")?,
            mileage: m.mileage,
            fuel_level: m.fuel_level,
            overall_status: parse_code(&m.overall_status, "overall_status")?,
            additional_notes: m.additional_notes,
            submitted_at: m.submitted_at,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &DriverInspection) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.clone()),
        driver_id: Set(aggregate.driver_id.clone()),
        ambulance_id: Set(aggregate.ambulance_id.clone()),
        date: Set(aggregate.date),
        shift: Set(aggregate.shift.as_str().to_string()),
        vehicle_inspection: Set(to_json(&aggregate.vehicle_inspection)?),
        mileage: Set(aggregate.mileage),
        fuel_level: Set(aggregate.fuel_level),
        overall_status: Set(aggregate.overall_status.as_str().to_string()),
        additional_notes: Set(aggregate.additional_notes.clone()),
        submitted_at: Set(aggregate.submitted_at),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    })
}

/// Query filters of the list endpoint
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct InspectionFilter {
    pub ambulance_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ReadinessStatus>,
}

/// List inspections; `driver_id` restricts to one driver's own records
pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &InspectionFilter,
    driver_id: Option<&str>,
    params: &PageParams,
) -> anyhow::Result<Page<DriverInspection>> {
    let mut query = Entity::find().order_by_desc(Column::SubmittedAt);
    if let Some(driver_id) = driver_id {
        query = query.filter(Column::DriverId.eq(driver_id));
    }
    if let Some(ambulance_id) = &filter.ambulance_id {
        query = query.filter(Column::AmbulanceId.eq(ambulance_id.as_str()));
    }
    if let Some(date_from) = filter.date_from {
        query = query.filter(Column::Date.gte(date_from));
    }
    if let Some(date_to) = filter.date_to {
        query = query.filter(Column::Date.lte(date_to));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::OverallStatus.eq(status.as_str()));
    }
    fetch_page(conn, query, params).await
}

/// Inspections dated on or after `from`
pub async fn list_since(
    conn: &impl ConnectionTrait,
    from: NaiveDate,
) -> anyhow::Result<Vec<DriverInspection>> {
    let query = Entity::find()
        .filter(Column::Date.gte(from))
        .order_by_asc(Column::Date);
    fetch_all(conn, query).await
}

pub async fn get_by_id(
    conn: &impl ConnectionTrait,
    id: &str,
) -> anyhow::Result<Option<DriverInspection>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(DriverInspection::try_from)
        .transpose()
}

/// Another inspection for the same driver, ambulance, date and shift
pub async fn find_duplicate(
    conn: &impl ConnectionTrait,
    aggregate: &DriverInspection,
) -> anyhow::Result<Option<DriverInspection>> {
    Entity::find()
        .filter(Column::DriverId.eq(aggregate.driver_id.as_str()))
        .filter(Column::AmbulanceId.eq(aggregate.ambulance_id.as_str()))
        .filter(Column::Date.eq(aggregate.date))
        .filter(Column::Shift.eq(aggregate.shift.as_str()))
        .filter(Column::Id.ne(aggregate.id.as_str()))
        .one(conn)
        .await?
        .map(DriverInspection::try_from)
        .transpose()
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &DriverInspection) -> anyhow::Result<()> {
    to_active(aggregate)?.insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &DriverInspection) -> anyhow::Result<()> {
    to_active(aggregate)?.update(conn).await?;
    Ok(())
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
