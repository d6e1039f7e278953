use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, users,
    util::{normalize_required, password_digest},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a new user.
    pub async fn register_user(
        &self,
        username: &str,
        name: &str,
        password: &str,
    ) -> ResultEngine<User> {
        let username = normalize_required(username, "username")?;
        if username.chars().any(char::is_whitespace) {
            return Err(EngineError::InvalidInput(
                "username must not contain spaces".to_string(),
            ));
        }
        let name = normalize_required(name, "name")?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                name: ActiveValue::Set(name),
                password_hash: ActiveValue::Set(password_digest(&username, password)),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Ok(User::from(model))
        })
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if user.password_hash != password_digest(username, password) {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(User::from(user))
    }

    pub async fn user(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, username).await?;
            Ok(User::from(user))
        })
    }
}
