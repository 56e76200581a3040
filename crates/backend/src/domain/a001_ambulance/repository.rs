use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a001_ambulance::aggregate::{Ambulance, AmbulanceStatus};
use contracts::domain::common::{EntityMetadata, GeoPoint};
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, ConnectionTrait, NotSet, QueryOrder, Set};

use crate::shared::data::json_column::{from_json, parse_code, to_json};
use crate::shared::data::page::{fetch_all, fetch_page};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_ambulance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_number: String,
    pub license_number: String,
    #[sea_orm(column_name = "model")]
    pub model_name: String,
    pub year: i32,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub assigned_driver_id: Option<String>,
    pub assigned_paramedic_id: Option<String>,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
    pub insurance_expiry: NaiveDate,
    /// JSON array of equipment names
    pub equipment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Ambulance {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        let location = match (m.latitude, m.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        Ok(Ambulance {
            id: m.id,
            vehicle_number: m.vehicle_number,
            license_number: m.license_number,
            model: m.model_name,
            year: m.year,
            status: parse_code(&m.status, "status")?,
            location,
            assigned_driver_id: m.assigned_driver_id,
            assigned_paramedic_id: m.assigned_paramedic_id,
            last_maintenance: m.last_maintenance,
            next_maintenance: m.next_maintenance,
            insurance_expiry: m.insurance_expiry,
            equipment: from_json(&m.equipment, "equipment")?,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &Ambulance) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.clone()),
        vehicle_number: Set(aggregate.vehicle_number.clone()),
        license_number: Set(aggregate.license_number.clone()),
        model_name: Set(aggregate.model.clone()),
        year: Set(aggregate.year),
        status: Set(aggregate.status.as_str().to_string()),
        latitude: Set(aggregate.location.map(|p| p.lat)),
        longitude: Set(aggregate.location.map(|p| p.lng)),
        assigned_driver_id: Set(aggregate.assigned_driver_id.clone()),
        assigned_paramedic_id: Set(aggregate.assigned_paramedic_id.clone()),
        last_maintenance: Set(aggregate.last_maintenance),
        next_maintenance: Set(aggregate.next_maintenance),
        insurance_expiry: Set(aggregate.insurance_expiry),
        equipment: Set(to_json(&aggregate.equipment)?),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    })
}

/// Optional `?status=` filter of the list endpoint
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AmbulanceFilter {
    pub status: Option<AmbulanceStatus>,
}

pub async fn list(
    conn: &impl ConnectionTrait,
    filter: &AmbulanceFilter,
    params: &PageParams,
) -> anyhow::Result<Page<Ambulance>> {
    let mut query = Entity::find().order_by_asc(Column::VehicleNumber);
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    fetch_page(conn, query, params).await
}

pub async fn list_all(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<Ambulance>> {
    fetch_all(conn, Entity::find().order_by_asc(Column::VehicleNumber)).await
}

pub async fn list_available(conn: &impl ConnectionTrait) -> anyhow::Result<Vec<Ambulance>> {
    let query = Entity::find()
        .filter(Column::Status.eq(AmbulanceStatus::Available.as_str()))
        .order_by_asc(Column::VehicleNumber);
    fetch_all(conn, query).await
}

pub async fn get_by_id(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<Option<Ambulance>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(Ambulance::try_from)
        .transpose()
}

/// Another ambulance already using this vehicle or license number
pub async fn find_duplicate(
    conn: &impl ConnectionTrait,
    aggregate: &Ambulance,
) -> anyhow::Result<Option<Ambulance>> {
    let query = Entity::find()
        .filter(
            Condition::any()
                .add(Column::VehicleNumber.eq(aggregate.vehicle_number.as_str()))
                .add(Column::LicenseNumber.eq(aggregate.license_number.as_str())),
        )
        .filter(Column::Id.ne(aggregate.id.as_str()));
    query.one(conn).await?.map(Ambulance::try_from).transpose()
}

pub async fn count(conn: &impl ConnectionTrait) -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn).await?)
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &Ambulance) -> anyhow::Result<()> {
    to_active(aggregate)?.insert(conn).await?;
    Ok(())
}

/// Write the editable columns. `status` is left to dispatch and
/// `set_status_from`.
pub async fn update_details(conn: &impl ConnectionTrait, aggregate: &Ambulance) -> anyhow::Result<()> {
    let mut active = to_active(aggregate)?;
    active.status = NotSet;
    active.update(conn).await?;
    Ok(())
}

pub async fn set_location(
    conn: &impl ConnectionTrait,
    id: &str,
    point: GeoPoint,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Latitude, Expr::value(point.lat))
        .col_expr(Column::Longitude, Expr::value(point.lng))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Delete the row only while it still has `status`
pub async fn delete_with_status(
    conn: &impl ConnectionTrait,
    id: &str,
    status: AmbulanceStatus,
) -> anyhow::Result<bool> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(status.as_str()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Move an ambulance from `from` to `to`.
///
/// Returns false when the row no longer has status `from`, which is how a
/// writer finds out that a concurrent dispatch got there first.
pub async fn set_status_from(
    conn: &impl ConnectionTrait,
    id: &str,
    from: AmbulanceStatus,
    to: AmbulanceStatus,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(from.as_str()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Move an ambulance from `available` to `assigned`; false when it was
/// taken in the meantime
pub async fn claim_available(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    set_status_from(conn, id, AmbulanceStatus::Available, AmbulanceStatus::Assigned).await
}

pub async fn set_status(
    conn: &impl ConnectionTrait,
    id: &str,
    status: AmbulanceStatus,
) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1))
        .filter(Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
