//! Work orders: the unit of field work, attached to a customer and one of
//! their service locations, optionally assigned to a technician.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "NORMAL")]
    Normal,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub service_location_id: Uuid,
    pub assigned_technician_id: Option<Uuid>,
    pub summary: String,
    pub description: Option<String>,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    pub scheduled_start: Option<DateTimeWithTimeZone>,
    pub scheduled_end: Option<DateTimeWithTimeZone>,
    pub actual_start: Option<DateTimeWithTimeZone>,
    pub actual_end: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    ServiceLocation,
    Technician,
    WorkNote,
    LineItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(crate::customer::Entity)
                .from(Column::CustomerId)
                .to(crate::customer::Column::Id)
                .into(),
            Relation::ServiceLocation => Entity::belongs_to(crate::service_location::Entity)
                .from(Column::ServiceLocationId)
                .to(crate::service_location::Column::Id)
                .into(),
            Relation::Technician => Entity::belongs_to(crate::technician::Entity)
                .from(Column::AssignedTechnicianId)
                .to(crate::technician::Column::Id)
                .into(),
            Relation::WorkNote => Entity::has_many(crate::work_note::Entity).into(),
            Relation::LineItem => Entity::has_many(crate::work_order_line_item::Entity).into(),
        }
    }
}

impl Related<crate::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Default for WorkOrderStatus {
    fn default() -> Self {
        WorkOrderStatus::Draft
    }
}

impl Default for WorkOrderPriority {
    fn default() -> Self {
        WorkOrderPriority::Normal
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkOrder {
    pub customer_id: Uuid,
    pub service_location_id: Uuid,
    pub assigned_technician_id: Option<Uuid>,
    pub summary: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub priority: WorkOrderPriority,
    pub scheduled_start: Option<DateTimeWithTimeZone>,
    pub scheduled_end: Option<DateTimeWithTimeZone>,
}

pub fn validate(input: &NewWorkOrder) -> Result<(), ModelError> {
    if input.summary.trim().is_empty() {
        return Err(ModelError::Validation("summary required".into()));
    }
    if let (Some(start), Some(end)) = (input.scheduled_start, input.scheduled_end) {
        if end <= start {
            return Err(ModelError::Validation("scheduled_end must be after scheduled_start".into()));
        }
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewWorkOrder) -> Result<Model, ModelError> {
    validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(input.customer_id),
        service_location_id: Set(input.service_location_id),
        assigned_technician_id: Set(input.assigned_technician_id),
        summary: Set(input.summary),
        description: Set(input.description),
        status: Set(input.status),
        priority: Set(input.priority),
        scheduled_start: Set(input.scheduled_start),
        scheduled_end: Set(input.scheduled_end),
        actual_start: Set(None),
        actual_end: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

/// Patch-style update; only fields the caller supplies are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkOrderChanges {
    pub summary: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<WorkOrderPriority>,
    pub scheduled_start: Option<Option<DateTimeWithTimeZone>>,
    pub scheduled_end: Option<Option<DateTimeWithTimeZone>>,
    pub actual_start: Option<Option<DateTimeWithTimeZone>>,
    pub actual_end: Option<Option<DateTimeWithTimeZone>>,
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    changes: WorkOrderChanges,
) -> Result<Option<Model>, ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)? else {
        return Ok(None);
    };
    let mut am: ActiveModel = existing.into();
    if let Some(summary) = changes.summary {
        if summary.trim().is_empty() {
            return Err(ModelError::Validation("summary required".into()));
        }
        am.summary = Set(summary);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if let Some(status) = changes.status {
        am.status = Set(status);
    }
    if let Some(priority) = changes.priority {
        am.priority = Set(priority);
    }
    if let Some(v) = changes.scheduled_start {
        am.scheduled_start = Set(v);
    }
    if let Some(v) = changes.scheduled_end {
        am.scheduled_end = Set(v);
    }
    if let Some(v) = changes.actual_start {
        am.actual_start = Set(v);
    }
    if let Some(v) = changes.actual_end {
        am.actual_end = Set(v);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map(Some).map_err(ModelError::from_db)
}

pub async fn assign_technician(
    db: &DatabaseConnection,
    id: Uuid,
    technician_id: Option<Uuid>,
) -> Result<Option<Model>, ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)? else {
        return Ok(None);
    };
    let mut am: ActiveModel = existing.into();
    am.assigned_technician_id = Set(technician_id);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map(Some).map_err(ModelError::from_db)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderFilter {
    pub customer_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub status: Option<WorkOrderStatus>,
}

pub async fn list(
    db: &DatabaseConnection,
    filter: WorkOrderFilter,
) -> Result<Vec<Model>, ModelError> {
    let mut query = Entity::find();
    if let Some(customer_id) = filter.customer_id {
        query = query.filter(Column::CustomerId.eq(customer_id));
    }
    if let Some(technician_id) = filter.technician_id {
        query = query.filter(Column::AssignedTechnicianId.eq(technician_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status));
    }
    query
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(ModelError::from_db)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base() -> NewWorkOrder {
        NewWorkOrder {
            customer_id: Uuid::new_v4(),
            service_location_id: Uuid::new_v4(),
            assigned_technician_id: None,
            summary: "Seasonal HVAC inspection".into(),
            description: None,
            status: WorkOrderStatus::Draft,
            priority: WorkOrderPriority::Normal,
            scheduled_start: None,
            scheduled_end: None,
        }
    }

    #[test]
    fn empty_summary_rejected() {
        let mut wo = base();
        wo.summary = "  ".into();
        assert!(validate(&wo).is_err());
    }

    #[test]
    fn inverted_schedule_rejected() {
        let mut wo = base();
        let now = Utc::now();
        wo.scheduled_start = Some(now.into());
        wo.scheduled_end = Some((now - Duration::hours(1)).into());
        assert!(validate(&wo).is_err());
    }
}
