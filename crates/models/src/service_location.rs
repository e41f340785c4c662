//! Service addresses belonging to a customer.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub label: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(crate::customer::Entity)
                .from(Column::CustomerId)
                .to(crate::customer::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewServiceLocation {
    pub label: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub fn validate(input: &NewServiceLocation) -> Result<(), ModelError> {
    if input.address_line1.trim().is_empty() {
        return Err(ModelError::Validation("address_line1 required".into()));
    }
    if input.city.trim().is_empty() || input.province.trim().is_empty() {
        return Err(ModelError::Validation("city and province required".into()));
    }
    if input.country.len() != 2 {
        return Err(ModelError::Validation("country must be a 2-letter code".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    customer_id: Uuid,
    input: NewServiceLocation,
) -> Result<Model, ModelError> {
    validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        label: Set(input.label),
        address_line1: Set(input.address_line1),
        address_line2: Set(input.address_line2),
        city: Set(input.city),
        province: Set(input.province),
        postal_code: Set(input.postal_code),
        country: Set(input.country),
        latitude: Set(input.latitude),
        longitude: Set(input.longitude),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn list_for_customer(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .all(db)
        .await
        .map_err(ModelError::from_db)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_must_be_two_letters() {
        let loc = NewServiceLocation {
            address_line1: "123 Main St".into(),
            city: "Toronto".into(),
            province: "ON".into(),
            postal_code: "M5V 2T6".into(),
            country: "CAN".into(),
            ..Default::default()
        };
        assert!(validate(&loc).is_err());
    }
}
