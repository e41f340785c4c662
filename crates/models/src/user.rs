//! Account identity record. Email is stored lowercased and unique at the
//! store; the password hash is a PHC string and never empty once created.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "USER")]
    User,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub email_verified_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Technician,
    Session,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Technician => Entity::has_one(crate::technician::Entity).into(),
            Relation::Session => Entity::has_many(crate::session::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lowercase + trim; the canonical form for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let e = email.trim();
    let Some((local, domain)) = e.split_once('@') else {
        return Err(ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || e.contains(char::is_whitespace)
    {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Insert a new, unverified user. The unique index on `email` decides
/// concurrent registrations; a violation surfaces as `Conflict`.
pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<Model, ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(email)),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        email_verified_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

/// Replace the stored password hash (password reset).
pub async fn set_password_hash(
    db: &DatabaseConnection,
    id: Uuid,
    password_hash: &str,
) -> Result<(), ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::Validation("user not found".into()))?
        .into();
    am.password_hash = Set(password_hash.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(ModelError::from_db)?;
    Ok(())
}

/// Stamp `email_verified_at` if not already set. Idempotent.
pub async fn mark_email_verified(
    db: &DatabaseConnection,
    id: Uuid,
    at: DateTimeWithTimeZone,
) -> Result<(), ModelError> {
    use sea_orm::sea_query::Expr;
    Entity::update_many()
        .col_expr(Column::EmailVerifiedAt, Expr::value(Some(at)))
        .col_expr(Column::UpdatedAt, Expr::value(at))
        .filter(Column::Id.eq(id))
        .filter(Column::EmailVerifiedAt.is_null())
        .exec(db)
        .await
        .map_err(ModelError::from_db)?;
    Ok(())
}

/// Insert-or-update keyed by email; used by the seeder.
pub async fn upsert_by_email(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
    role: Role,
    verify_email: bool,
) -> Result<Model, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    if let Some(existing) = find_by_email(db, email).await? {
        let mut am: ActiveModel = existing.into();
        am.password_hash = Set(password_hash.to_string());
        am.role = Set(role);
        if verify_email {
            am.email_verified_at = Set(Some(now));
        }
        am.updated_at = Set(now);
        am.update(db).await.map_err(ModelError::from_db)
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(normalize_email(email)),
            password_hash: Set(password_hash.to_string()),
            role: Set(role),
            email_verified_at: Set(if verify_email { Some(now) } else { None }),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(db).await.map_err(ModelError::from_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_lowercases_and_trims() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn email_validation_rejects_garbage() {
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@missing-local.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@example.com").is_ok());
    }
}
