use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, GroupRole, ResultEngine, drinks, events, group_members, groups, users,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {username}")))
    }

    pub(super) async fn require_group(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    pub(super) async fn group_role(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        username: &str,
    ) -> ResultEngine<Option<GroupRole>> {
        let membership = group_members::Entity::find_by_id((group_id, username.to_string()))
            .one(db)
            .await?;
        membership
            .map(|m| GroupRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Load a group the user belongs to.
    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        username: &str,
    ) -> ResultEngine<(groups::Model, GroupRole)> {
        let group = self.require_group(db, group_id).await?;
        let role = self
            .group_role(db, group_id, username)
            .await?
            .ok_or_else(|| EngineError::Forbidden("not a group member".to_string()))?;
        Ok((group, role))
    }

    pub(super) async fn require_admin(
        &self,
        db: &DatabaseTransaction,
        group_id: Uuid,
        username: &str,
    ) -> ResultEngine<groups::Model> {
        let (group, role) = self.require_member(db, group_id, username).await?;
        if role != GroupRole::Admin {
            return Err(EngineError::Forbidden("group admin required".to_string()));
        }
        Ok(group)
    }

    /// Load an event whose group the user belongs to.
    pub(super) async fn require_event_member(
        &self,
        db: &DatabaseTransaction,
        event_id: Uuid,
        username: &str,
    ) -> ResultEngine<(events::Model, GroupRole)> {
        let event = events::Entity::find_by_id(event_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))?;
        let (_, role) = self.require_member(db, event.group_id, username).await?;
        Ok((event, role))
    }

    /// Load a drink whose group the user belongs to.
    pub(super) async fn require_drink_member(
        &self,
        db: &DatabaseTransaction,
        drink_id: Uuid,
        username: &str,
    ) -> ResultEngine<drinks::Model> {
        let drink = drinks::Entity::find_by_id(drink_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("drink not exists".to_string()))?;
        self.require_member(db, drink.group_id, username).await?;
        Ok(drink)
    }

    /// Display names for a set of usernames.
    pub(super) async fn display_names(
        &self,
        db: &DatabaseTransaction,
        usernames: impl IntoIterator<Item = String>,
    ) -> ResultEngine<HashMap<String, String>> {
        let usernames: Vec<String> = usernames.into_iter().collect();
        if usernames.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Username.is_in(usernames))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|u| (u.username, u.name)).collect())
    }
}
