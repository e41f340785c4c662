//! Password-reset tokens. Same single-use contract as verification tokens
//! but in a separate table, so a token issued for one purpose can never be
//! presented for the other.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::TokenConsumeOutcome;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTimeWithTimeZone,
    pub consumed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(crate::user::Entity)
                .from(Column::UserId)
                .to(crate::user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(
    db: &DatabaseConnection,
    user_id: Uuid,
    token_hash: &str,
    expires_at: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token_hash: Set(token_hash.to_string()),
        expires_at: Set(expires_at),
        consumed_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

/// Invalidate all outstanding reset tokens for the user (at most one live
/// reset link at any time).
pub async fn invalidate_outstanding(
    db: &DatabaseConnection,
    user_id: Uuid,
    now: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::ConsumedAt, Expr::value(Some(now)))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ConsumedAt.is_null())
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(res.rows_affected)
}

/// Atomic single-use consume; see `verification_token::consume`.
pub async fn consume(
    db: &DatabaseConnection,
    token_hash: &str,
    now: DateTimeWithTimeZone,
) -> Result<TokenConsumeOutcome<Model>, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::ConsumedAt, Expr::value(Some(now)))
        .filter(Column::TokenHash.eq(token_hash))
        .filter(Column::ConsumedAt.is_null())
        .filter(Column::ExpiresAt.gt(now))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;

    let row = Entity::find()
        .filter(Column::TokenHash.eq(token_hash))
        .one(db)
        .await
        .map_err(ModelError::from_db)?;

    if res.rows_affected == 1 {
        return row
            .map(TokenConsumeOutcome::Consumed)
            .ok_or_else(|| ModelError::Db("consumed token row vanished".into()));
    }
    Ok(match row {
        None => TokenConsumeOutcome::NotFound,
        Some(t) if t.consumed_at.is_some() => TokenConsumeOutcome::AlreadyUsed,
        Some(_) => TokenConsumeOutcome::Expired,
    })
}
