//! Billable line items under a work order. Prices are stored in cents.

use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_order_line_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    WorkOrder,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::WorkOrder => Entity::belongs_to(crate::work_order::Entity)
                .from(Column::WorkOrderId)
                .to(crate::work_order::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::work_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    work_order_id: Uuid,
    description: &str,
    quantity: i32,
    unit_price_cents: i64,
) -> Result<Model, ModelError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ModelError::Validation("description required".into()));
    }
    if quantity <= 0 {
        return Err(ModelError::Validation("quantity must be positive".into()));
    }
    if unit_price_cents < 0 {
        return Err(ModelError::Validation("unit_price_cents must not be negative".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        work_order_id: Set(work_order_id),
        description: Set(description.to_owned()),
        quantity: Set(quantity),
        unit_price_cents: Set(unit_price_cents),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn list_for_work_order(
    db: &DatabaseConnection,
    work_order_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::WorkOrderId.eq(work_order_id))
        .order_by_asc(Column::Description)
        .all(db)
        .await
        .map_err(ModelError::from_db)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(())
}
