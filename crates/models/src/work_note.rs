//! Free-form notes left on a work order by staff.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    WorkOrder,
    Author,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::WorkOrder => Entity::belongs_to(crate::work_order::Entity)
                .from(Column::WorkOrderId)
                .to(crate::work_order::Column::Id)
                .into(),
            Relation::Author => Entity::belongs_to(crate::user::Entity)
                .from(Column::AuthorUserId)
                .to(crate::user::Column::Id)
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
    author_user_id: Uuid,
    body: &str,
) -> Result<Model, ModelError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ModelError::Validation("note body required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        work_order_id: Set(work_order_id),
        author_user_id: Set(author_user_id),
        body: Set(body.to_owned()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn list_for_work_order(
    db: &DatabaseConnection,
    work_order_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .filter(Column::WorkOrderId.eq(work_order_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(ModelError::from_db)
}
