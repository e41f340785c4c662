//! Append-only login audit rows. Never updated, only inserted and queried;
//! the lockout decision is derived from a windowed count.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AttemptOutcome {
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failure")]
    Failure,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "login_attempt")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub outcome: AttemptOutcome,
    pub client_addr: Option<String>,
    pub attempted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn record(
    db: &DatabaseConnection,
    email: &str,
    outcome: AttemptOutcome,
    client_addr: Option<&str>,
) -> Result<(), ModelError> {
    let am = ActiveModel {
        id: NotSet,
        email: Set(crate::user::normalize_email(email)),
        outcome: Set(outcome),
        client_addr: Set(client_addr.map(|s| s.to_string())),
        attempted_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from_db)?;
    Ok(())
}

/// Count failures for the identity since `since` (the trailing lockout
/// window).
pub async fn count_failures_since(
    db: &DatabaseConnection,
    email: &str,
    since: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    use sea_orm::PaginatorTrait;
    Entity::find()
        .filter(Column::Email.eq(crate::user::normalize_email(email)))
        .filter(Column::Outcome.eq(AttemptOutcome::Failure))
        .filter(Column::AttemptedAt.gte(since))
        .count(db)
        .await
        .map_err(ModelError::from_db)
}
