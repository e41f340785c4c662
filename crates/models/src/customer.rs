//! Customer accounts (the billing party for work orders).

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub billing_address_line1: Option<String>,
    pub billing_address_line2: Option<String>,
    pub billing_city: Option<String>,
    pub billing_province: Option<String>,
    pub billing_postal_code: Option<String>,
    pub billing_country: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceLocation,
    WorkOrder,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceLocation => Entity::has_many(crate::service_location::Entity).into(),
            Relation::WorkOrder => Entity::has_many(crate::work_order::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Writable customer fields, shared by create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub billing_address_line1: Option<String>,
    pub billing_address_line2: Option<String>,
    pub billing_city: Option<String>,
    pub billing_province: Option<String>,
    pub billing_postal_code: Option<String>,
    pub billing_country: Option<String>,
}

pub fn validate(input: &NewCustomer) -> Result<(), ModelError> {
    if input.name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if let Some(email) = &input.email {
        crate::user::validate_email(email)?;
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewCustomer) -> Result<Model, ModelError> {
    validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        billing_address_line1: Set(input.billing_address_line1),
        billing_address_line2: Set(input.billing_address_line2),
        billing_city: Set(input.billing_city),
        billing_province: Set(input.billing_province),
        billing_postal_code: Set(input.billing_postal_code),
        billing_country: Set(input.billing_country),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: NewCustomer,
) -> Result<Model, ModelError> {
    validate(&input)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::Validation("customer not found".into()))?
        .into();
    am.name = Set(input.name);
    am.email = Set(input.email);
    am.phone = Set(input.phone);
    am.billing_address_line1 = Set(input.billing_address_line1);
    am.billing_address_line2 = Set(input.billing_address_line2);
    am.billing_city = Set(input.billing_city);
    am.billing_province = Set(input.billing_province);
    am.billing_postal_code = Set(input.billing_postal_code);
    am.billing_country = Set(input.billing_country);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(ModelError::from_db)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(())
}
