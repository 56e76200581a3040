use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a006_paramedic_inspection::aggregate::ParamedicInspection;
use contracts::domain::common::EntityMetadata;
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

use crate::domain::a005_driver_inspection::repository::InspectionFilter;
use crate::shared::data::json_column::{from_json, parse_code, to_json};
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a006_paramedic_inspection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub paramedic_id: String,
    pub ambulance_id: String,
    pub date: NaiveDate,
    pub shift: String,
    /// JSON array of equipment items
    pub medical_equipment: String,
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

impl TryFrom<Model> for ParamedicInspection {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(ParamedicInspection {
            id: m.id,
            paramedic_id: m.paramedic_id,
            ambulance_id: m.ambulance_id,
            date: m.date,
            shift: parse_code(&m.shift, "shift")?,
            medical_equipment: from_json(&m.medical_equipment, "medical_equipment")?,
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

fn to_active(aggregate: &ParamedicInspection) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.clone()),
        paramedic_id: Set(aggregate.paramedic_id.clone()),
        ambulance_id: Set(aggregate.ambulance_id.clone()),
        date: Set(aggregate.date),
        shift: Set(aggregate.shift.as_str().to_string()),
        medical_equipment: Set(to_json(&aggregate.medical_equipment)?),
        overall_status: Set(aggregate.overall_status.as_str().to_string()),
        additional_notes: Set(aggregate.additional_notes.clone()),
        submitted_at: Set(aggregate.submitted_at),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    })
}

/// List inspections; `paramedic_id` restricts to one paramedic's own records
pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &InspectionFilter,
    paramedic_id: Option<&str>,
    params: &PageParams,
) -> anyhow::Result<Page<ParamedicInspection>> {
    let mut query = Entity::find().order_by_desc(Column::SubmittedAt);
    if let Some(paramedic_id) = paramedic_id {
        query = query.filter(Column::ParamedicId.eq(paramedic_id));
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

pub async fn list_since(
    conn: &impl ConnectionTrait,
    from: NaiveDate,
) -> anyhow::Result<Vec<ParamedicInspection>> {
    let query = Entity::find()
        .filter(Column::Date.gte(from))
        .order_by_asc(Column::Date);
    fetch_all(conn, query).await
}

pub async fn get_by_id(
    conn: &impl ConnectionTrait,
    id: &str,
) -> anyhow::Result<Option<ParamedicInspection>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(ParamedicInspection::try_from)
        .transpose()
}

pub async fn find_duplicate(
    conn: &impl ConnectionTrait,
    aggregate: &ParamedicInspection,
) -> anyhow::Result<Option<ParamedicInspection>> {
    Entity::find()
        .filter(Column::ParamedicId.eq(aggregate.paramedic_id.as_str()))
        .filter(Column::AmbulanceId.eq(aggregate.ambulance_id.as_str()))
        .filter(Column::Date.eq(aggregate.date))
        .filter(Column::Shift.eq(aggregate.shift.as_str()))
        .filter(Column::Id.ne(aggregate.id.as_str()))
        .one(conn)
        .await?
        .map(ParamedicInspection::try_from)
        .transpose()
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &ParamedicInspection) -> anyhow::Result<()> {
    to_active(aggregate)?.insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &ParamedicInspection) -> anyhow::Result<()> {
    to_active(aggregate)?.update(conn).await?;
    Ok(())
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
