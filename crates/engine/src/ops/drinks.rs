use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Comment, Drink, EngineError, NewDrink, ResultEngine, drink_comments, drinks, events, scoring,
    util::{normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

fn into_drinks(rows: Vec<drinks::Model>) -> ResultEngine<Vec<Drink>> {
    rows.into_iter().map(Drink::try_from).collect()
}

impl Engine {
    /// Log a drink for `user_id` in one of their groups.
    ///
    /// Points are computed from type and volume; the photo URL points at
    /// object storage and is kept as an opaque string.
    pub async fn add_drink(&self, new: NewDrink, user_id: &str) -> ResultEngine<Drink> {
        let points = scoring::score(new.drink_type, new.volume_ml)?;
        let name = normalize_required(&new.name, "drink name")?;
        let brand = normalize_required(&new.brand, "brand")?;
        let photo_url = normalize_required(&new.photo_url, "photo")?;
        let location = normalize_optional(new.location.as_deref());

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, new.group_id, user_id).await?;

            if let Some(event_id) = new.event_id {
                let event = events::Entity::find_by_id(event_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))?;
                if event.group_id != new.group_id {
                    return Err(EngineError::InvalidInput(
                        "event belongs to another group".to_string(),
                    ));
                }
            }

            let model = drinks::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id.to_string()),
                group_id: ActiveValue::Set(new.group_id),
                event_id: ActiveValue::Set(new.event_id),
                name: ActiveValue::Set(name),
                drink_type: ActiveValue::Set(new.drink_type.as_str().to_string()),
                brand: ActiveValue::Set(brand),
                volume_ml: ActiveValue::Set(new.volume_ml),
                location: ActiveValue::Set(location),
                photo_url: ActiveValue::Set(photo_url),
                points: ActiveValue::Set(points),
                occurred_at: ActiveValue::Set(new.occurred_at),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Drink::try_from(model)
        })
    }

    /// Drinks logged by the user across all groups, newest first.
    pub async fn drinks_for_user(&self, user_id: &str) -> ResultEngine<Vec<Drink>> {
        let rows = drinks::Entity::find()
            .filter(drinks::Column::UserId.eq(user_id))
            .order_by_desc(drinks::Column::OccurredAt)
            .all(&self.database)
            .await?;
        into_drinks(rows)
    }

    pub async fn drinks_for_group(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Drink>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let rows = drinks::Entity::find()
                .filter(drinks::Column::GroupId.eq(group_id))
                .order_by_desc(drinks::Column::OccurredAt)
                .all(&db_tx)
                .await?;
            into_drinks(rows)
        })
    }

    pub async fn drinks_for_event(
        &self,
        event_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Drink>> {
        with_tx!(self, |db_tx| {
            self.require_event_member(&db_tx, event_id, user_id).await?;
            let rows = drinks::Entity::find()
                .filter(drinks::Column::EventId.eq(event_id))
                .order_by_desc(drinks::Column::OccurredAt)
                .all(&db_tx)
                .await?;
            into_drinks(rows)
        })
    }

    /// Append a comment to a drink. Returns the whole thread, oldest first.
    pub async fn add_drink_comment(
        &self,
        drink_id: Uuid,
        text: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Comment>> {
        let text = normalize_required(text, "comment")?;
        with_tx!(self, |db_tx| {
            self.require_drink_member(&db_tx, drink_id, user_id).await?;
            drink_comments::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                drink_id: ActiveValue::Set(drink_id),
                user_id: ActiveValue::Set(user_id.to_string()),
                text: ActiveValue::Set(text),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            self.drink_thread(&db_tx, drink_id).await
        })
    }

    pub async fn drink_comments(
        &self,
        drink_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Comment>> {
        with_tx!(self, |db_tx| {
            self.require_drink_member(&db_tx, drink_id, user_id).await?;
            self.drink_thread(&db_tx, drink_id).await
        })
    }

    async fn drink_thread(
        &self,
        db: &sea_orm::DatabaseTransaction,
        drink_id: Uuid,
    ) -> ResultEngine<Vec<Comment>> {
        let rows = drink_comments::Entity::find()
            .filter(drink_comments::Column::DrinkId.eq(drink_id))
            .order_by_asc(drink_comments::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
