use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, Role, User, users, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    async fn find_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<Option<User>> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Require `user_id` to exist and hold the `admin` role.
    pub(super) async fn require_admin(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<User> {
        let user = self
            .find_user(db, user_id)
            .await?
            .ok_or_else(|| EngineError::Forbidden(format!("unknown user {user_id}")))?;
        if !user.role.can_write() {
            return Err(EngineError::Forbidden("admin access required".to_string()));
        }
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Returns `None` when the user does not exist or the password does not
    /// match; the two cases are not distinguished.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        if username.is_empty() || password.is_empty() {
            return Ok(None);
        }
        with_tx!(self, |db_tx| {
            let user = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .filter(users::Column::Password.eq(password))
                .one(&db_tx)
                .await?;
            user.map(User::try_from).transpose()
        })
    }

    /// Look up a user by name.
    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.find_user(&db_tx, username)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("user {username}")))
        })
    }

    /// Create a user. Used to bootstrap the first admin from the CLI.
    pub async fn new_user(&self, username: &str, password: &str, role: Role) -> ResultEngine<User> {
        let username = normalize_required_name(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            if self.find_user(&db_tx, &username).await?.is_some() {
                return Err(EngineError::ExistingKey(username.clone()));
            }
            users::ActiveModel::new_user(&username, password, role)
                .insert(&db_tx)
                .await?;
            tracing::info!(username = %username, role = role.as_str(), "user created");
            Ok(User {
                username: username.clone(),
                role,
            })
        })
    }
}
