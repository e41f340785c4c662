//! Refresh-token sessions. `status` is a three-state machine
//! (active to rotated, active to revoked, rotated or active to revoked) advanced
//! only by conditional updates; a row never occupies two live states.

use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SessionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "rotated")]
    Rotated,
    #[sea_orm(string_value = "revoked")]
    Revoked,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Rotation lineage: every descendant of one login shares this id.
    pub family_id: Uuid,
    pub refresh_token_hash: String,
    pub status: SessionStatus,
    pub issued_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
    pub revoked_at: Option<DateTimeWithTimeZone>,
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

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Result of asking the store to rotate a presented refresh token.
#[derive(Debug)]
pub enum RotateOutcome {
    /// The CAS won; the returned row is the now-rotated-out session.
    Rotated(Model),
    NotFound,
    /// Token belongs to an already-rotated session: possible theft.
    Reused(Model),
    Revoked,
    Expired(Model),
}

pub async fn insert(
    db: &DatabaseConnection,
    id: Uuid,
    user_id: Uuid,
    family_id: Uuid,
    refresh_token_hash: &str,
    issued_at: DateTimeWithTimeZone,
    expires_at: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        family_id: Set(family_id),
        refresh_token_hash: Set(refresh_token_hash.to_string()),
        status: Set(SessionStatus::Active),
        issued_at: Set(issued_at),
        expires_at: Set(expires_at),
        revoked_at: Set(None),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

/// Conditionally advance `active` to `rotated` for the session holding this
/// token hash. Exactly one of any number of concurrent callers wins; the
/// rest observe the row and classify.
pub async fn rotate(
    db: &DatabaseConnection,
    token_hash: &str,
    now: DateTimeWithTimeZone,
) -> Result<RotateOutcome, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(SessionStatus::Rotated))
        .filter(Column::RefreshTokenHash.eq(token_hash))
        .filter(Column::Status.eq(SessionStatus::Active))
        .filter(Column::ExpiresAt.gt(now))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;

    let row = Entity::find()
        .filter(Column::RefreshTokenHash.eq(token_hash))
        .one(db)
        .await
        .map_err(ModelError::from_db)?;

    if res.rows_affected == 1 {
        return row
            .map(RotateOutcome::Rotated)
            .ok_or_else(|| ModelError::Db("rotated session row vanished".into()));
    }
    Ok(match row {
        None => RotateOutcome::NotFound,
        Some(s) => match s.status {
            SessionStatus::Rotated => RotateOutcome::Reused(s),
            SessionStatus::Revoked => RotateOutcome::Revoked,
            SessionStatus::Active => RotateOutcome::Expired(s),
        },
    })
}

/// Terminally revoke every non-revoked session in a lineage.
pub async fn revoke_family(
    db: &DatabaseConnection,
    family_id: Uuid,
    now: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(SessionStatus::Revoked))
        .col_expr(Column::RevokedAt, Expr::value(Some(now)))
        .filter(Column::FamilyId.eq(family_id))
        .filter(Column::Status.ne(SessionStatus::Revoked))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(res.rows_affected)
}

pub async fn revoke_by_id(
    db: &DatabaseConnection,
    id: Uuid,
    now: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(SessionStatus::Revoked))
        .col_expr(Column::RevokedAt, Expr::value(Some(now)))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.ne(SessionStatus::Revoked))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(res.rows_affected)
}

/// Revoke every session for a user (logout-all, password reset).
pub async fn revoke_all_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    now: DateTimeWithTimeZone,
) -> Result<u64, ModelError> {
    use sea_orm::sea_query::Expr;
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(SessionStatus::Revoked))
        .col_expr(Column::RevokedAt, Expr::value(Some(now)))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Status.ne(SessionStatus::Revoked))
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(res.rows_affected)
}

pub async fn find_by_token_hash(
    db: &DatabaseConnection,
    token_hash: &str,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::RefreshTokenHash.eq(token_hash))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}
