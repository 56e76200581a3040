use chrono::{DateTime, Utc};
use contracts::domain::a002_patient::aggregate::{EmergencyContact, Patient};
use contracts::domain::common::{Destination, EntityMetadata, Place};
use contracts::shared::pagination::{Page, PageParams};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};

use crate::shared::data::json_column::{from_json, parse_code, to_json};
use crate::shared::data::page::fetch_page;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_patient")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub phone: Option<String>,
    pub medical_condition: String,
    pub allergies: String,
    pub medications: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub pickup_address: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub destination_address: String,
    pub hospital_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Patient {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> anyhow::Result<Self> {
        Ok(Patient {
            id: m.id,
            name: m.name,
            age: m.age,
            gender: parse_code(&m.gender, "gender")?,
            phone: m.phone,
            medical_condition: m.medical_condition,
            allergies: from_json(&m.allergies, "allergies")?,
            medications: from_json(&m.medications, "medications")?,
            emergency_contact: EmergencyContact {
                name: m.emergency_contact_name,
                phone: m.emergency_contact_phone,
                relation: m.emergency_contact_relation,
            },
            pickup_location: Place {
                lat: m.pickup_latitude,
                lng: m.pickup_longitude,
                address: m.pickup_address,
            },
            destination: Destination {
                lat: m.destination_latitude,
                lng: m.destination_longitude,
                address: m.destination_address,
                hospital_name: m.hospital_name,
            },
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn to_active(aggregate: &Patient) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.id.clone()),
        name: Set(aggregate.name.clone()),
        age: Set(aggregate.age),
        gender: Set(aggregate.gender.as_str().to_string()),
        phone: Set(aggregate.phone.clone()),
        medical_condition: Set(aggregate.medical_condition.clone()),
        allergies: Set(to_json(&aggregate.allergies)?),
        medications: Set(to_json(&aggregate.medications)?),
        emergency_contact_name: Set(aggregate.emergency_contact.name.clone()),
        emergency_contact_phone: Set(aggregate.emergency_contact.phone.clone()),
        emergency_contact_relation: Set(aggregate.emergency_contact.relation.clone()),
        pickup_latitude: Set(aggregate.pickup_location.lat),
        pickup_longitude: Set(aggregate.pickup_location.lng),
        pickup_address: Set(aggregate.pickup_location.address.clone()),
        destination_latitude: Set(aggregate.destination.lat),
        destination_longitude: Set(aggregate.destination.lng),
        destination_address: Set(aggregate.destination.address.clone()),
        hospital_name: Set(aggregate.destination.hospital_name.clone()),
        created_at: Set(aggregate.metadata.created_at),
        updated_at: Set(aggregate.metadata.updated_at),
        version: Set(aggregate.metadata.version),
    })
}

pub async fn list(conn: &impl ConnectionTrait, params: &PageParams) -> anyhow::Result<Page<Patient>> {
    fetch_page(conn, Entity::find().order_by_desc(Column::CreatedAt), params).await
}

pub async fn get_by_id(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<Option<Patient>> {
    Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .map(Patient::try_from)
        .transpose()
}

pub async fn count(conn: &impl ConnectionTrait) -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn).await?)
}

pub async fn insert(conn: &impl ConnectionTrait, aggregate: &Patient) -> anyhow::Result<()> {
    to_active(aggregate)?.insert(conn).await?;
    Ok(())
}

pub async fn update(conn: &impl ConnectionTrait, aggregate: &Patient) -> anyhow::Result<()> {
    to_active(aggregate)?.update(conn).await?;
    Ok(())
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
