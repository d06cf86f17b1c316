//! Users table and roles.
//!
//! Every authenticated user can read the ledgers; only `admin` users can
//! change them or trigger a profit distribution.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    #[default]
    ReadOnly,
}

impl Role {
    /// Canonical role string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ReadOnly => "readonly",
        }
    }

    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Role::Admin),
            "readonly" => Ok(Role::ReadOnly),
            other => Err(EngineError::InvalidRole(format!("unknown role: {other}"))),
        }
    }
}

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            role: Role::try_from(model.role.as_str())?,
            username: model.username,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_user(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: ActiveValue::Set(username.to_string()),
            password: ActiveValue::Set(password.to_string()),
            role: ActiveValue::Set(role.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_string() {
        assert_eq!(Role::try_from(Role::Admin.as_str()), Ok(Role::Admin));
        assert_eq!(Role::try_from(Role::ReadOnly.as_str()), Ok(Role::ReadOnly));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(
            Role::try_from("owner"),
            Err(EngineError::InvalidRole("unknown role: owner".to_string()))
        );
    }

    #[test]
    fn only_admin_can_write() {
        assert!(Role::Admin.can_write());
        assert!(!Role::ReadOnly.can_write());
    }
}
