use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Group, GroupMember, GroupRole, ResultEngine, group_members, groups,
    util::{name_key, normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

/// Partial update of a group. `None` leaves a field unchanged; an empty
/// description clears it.
#[derive(Clone, Debug, Default)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Engine {
    /// Create a group owned by `user_id`, who becomes its first admin.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = normalize_required(name, "group name")?;
        let name_norm = name_key(&name);
        let description = normalize_optional(description);

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            // Names are unique per owner so "my groups" lists stay unambiguous.
            let exists = groups::Entity::find()
                .filter(groups::Column::Owner.eq(user_id))
                .filter(groups::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let now = Utc::now();
            let group = groups::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                description: ActiveValue::Set(description),
                owner: ActiveValue::Set(user_id.to_string()),
                created_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            group_members::ActiveModel {
                group_id: ActiveValue::Set(group.id),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(GroupRole::Admin.as_str().to_string()),
                joined_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            Ok(Group::from(group))
        })
    }

    /// Groups the user belongs to, newest first.
    pub async fn groups_for_user(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let group_ids: Vec<Uuid> = group_members::Entity::find()
                .filter(group_members::Column::UserId.eq(user_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| m.group_id)
                .collect();
            if group_ids.is_empty() {
                return Ok(Vec::new());
            }

            let rows = groups::Entity::find()
                .filter(groups::Column::Id.is_in(group_ids))
                .order_by_desc(groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(Group::from).collect())
        })
    }

    pub async fn group(&self, group_id: Uuid, user_id: &str) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let (group, _) = self.require_member(&db_tx, group_id, user_id).await?;
            Ok(Group::from(group))
        })
    }

    /// Rename or re-describe a group (admin only).
    pub async fn update_group(
        &self,
        group_id: Uuid,
        update: GroupUpdate,
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = update
            .name
            .as_deref()
            .map(|n| normalize_required(n, "group name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let group = self.require_admin(&db_tx, group_id, user_id).await?;
            let owner = group.owner.clone();
            let mut active: groups::ActiveModel = group.into();

            if let Some(name) = name {
                let name_norm = name_key(&name);
                let clash = groups::Entity::find()
                    .filter(groups::Column::Owner.eq(owner))
                    .filter(groups::Column::NameNorm.eq(name_norm.clone()))
                    .filter(groups::Column::Id.ne(group_id))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if clash {
                    return Err(EngineError::ExistingKey(name));
                }
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(description) = update.description {
                active.description = ActiveValue::Set(normalize_optional(Some(&description)));
            }

            let updated = active.update(&db_tx).await?;
            Ok(Group::from(updated))
        })
    }

    /// Add a user to a group (admin only). Adding an existing member is a
    /// no-op. Returns the member list.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<GroupMember>> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, group_id, user_id).await?;
            self.require_user(&db_tx, username).await?;

            if self.group_role(&db_tx, group_id, username).await?.is_none() {
                group_members::ActiveModel {
                    group_id: ActiveValue::Set(group_id),
                    user_id: ActiveValue::Set(username.to_string()),
                    role: ActiveValue::Set(GroupRole::Member.as_str().to_string()),
                    joined_at: ActiveValue::Set(Utc::now()),
                }
                .insert(&db_tx)
                .await?;
            }

            self.members_in(&db_tx, group_id).await
        })
    }

    /// Remove a member. Admins can remove anyone, members only themselves.
    /// The last admin of a group cannot be removed.
    pub async fn remove_member(
        &self,
        group_id: Uuid,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (_, role) = self.require_member(&db_tx, group_id, user_id).await?;
            if role != GroupRole::Admin && username != user_id {
                return Err(EngineError::Forbidden(
                    "only admins can remove other members".to_string(),
                ));
            }

            let target = self
                .group_role(&db_tx, group_id, username)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("member {username}")))?;
            if target == GroupRole::Admin {
                let admins = group_members::Entity::find()
                    .filter(group_members::Column::GroupId.eq(group_id))
                    .filter(group_members::Column::Role.eq(GroupRole::Admin.as_str()))
                    .count(&db_tx)
                    .await?;
                if admins <= 1 {
                    return Err(EngineError::InvalidInput(
                        "cannot remove the last group admin".to_string(),
                    ));
                }
            }

            group_members::Entity::delete_by_id((group_id, username.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Members of a group in join order.
    pub async fn group_members(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<GroupMember>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            self.members_in(&db_tx, group_id).await
        })
    }

    pub(super) async fn members_in(
        &self,
        db: &sea_orm::DatabaseTransaction,
        group_id: Uuid,
    ) -> ResultEngine<Vec<GroupMember>> {
        let rows = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id))
            .order_by_asc(group_members::Column::JoinedAt)
            .all(db)
            .await?;
        let names = self
            .display_names(db, rows.iter().map(|m| m.user_id.clone()))
            .await?;

        rows.into_iter()
            .map(|m| {
                Ok(GroupMember {
                    name: names.get(&m.user_id).cloned().unwrap_or_default(),
                    role: GroupRole::try_from(m.role.as_str())?,
                    username: m.user_id,
                    joined_at: m.joined_at,
                })
            })
            .collect()
    }
}
