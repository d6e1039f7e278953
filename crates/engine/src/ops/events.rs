use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Attendance, Attendee, Comment, EngineError, Event, EventDetail, EventUpdate, EventWindow,
    GroupRole, NewEvent, ResultEngine, event_attendees, event_comments, events,
    util::{normalize_optional, normalize_required},
};

use super::{Engine, with_tx};

impl Engine {
    /// Schedule an event in a group the user belongs to.
    pub async fn create_event(&self, new: NewEvent, user_id: &str) -> ResultEngine<Event> {
        let window = EventWindow::new(new.start, new.end)?;
        let name = normalize_required(&new.name, "event name")?;
        let location = normalize_required(&new.location, "location")?;
        let description = normalize_optional(new.description.as_deref());

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, new.group_id, user_id).await?;

            let model = events::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                group_id: ActiveValue::Set(new.group_id),
                created_by: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                location: ActiveValue::Set(location),
                start_at: ActiveValue::Set(window.start()),
                end_at: ActiveValue::Set(window.end()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Event::try_from(model)
        })
    }

    /// Events of a group, latest start first.
    pub async fn events_for_group(
        &self,
        group_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Event>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, group_id, user_id).await?;
            let rows = events::Entity::find()
                .filter(events::Column::GroupId.eq(group_id))
                .order_by_desc(events::Column::StartAt)
                .all(&db_tx)
                .await?;
            rows.into_iter().map(Event::try_from).collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn event(&self, event_id: Uuid, user_id: &str) -> ResultEngine<EventDetail> {
        with_tx!(self, |db_tx| {
            let (event, _) = self.require_event_member(&db_tx, event_id, user_id).await?;
            Ok(EventDetail {
                event: Event::try_from(event)?,
                attendees: self.attendees_of(&db_tx, event_id).await?,
                comments: self.event_thread(&db_tx, event_id).await?,
            })
        })
    }

    /// Edit an event. Allowed to its creator and to group admins.
    pub async fn update_event(
        &self,
        event_id: Uuid,
        update: EventUpdate,
        user_id: &str,
    ) -> ResultEngine<Event> {
        let name = update
            .name
            .as_deref()
            .map(|n| normalize_required(n, "event name"))
            .transpose()?;
        let location = update
            .location
            .as_deref()
            .map(|l| normalize_required(l, "location"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let (event, role) = self.require_event_member(&db_tx, event_id, user_id).await?;
            if event.created_by != user_id && role != GroupRole::Admin {
                return Err(EngineError::Forbidden(
                    "only the creator or a group admin can edit the event".to_string(),
                ));
            }

            let window = EventWindow::new(
                update.start.unwrap_or(event.start_at),
                update.end.unwrap_or(event.end_at),
            )?;

            let mut active: events::ActiveModel = event.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(location) = location {
                active.location = ActiveValue::Set(location);
            }
            if let Some(description) = update.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional(Some(description)));
            }
            if update.start.is_some() {
                active.start_at = ActiveValue::Set(window.start());
            }
            if update.end.is_some() {
                active.end_at = ActiveValue::Set(window.end());
            }

            let updated = active.update(&db_tx).await?;
            Event::try_from(updated)
        })
    }

    /// Record the user's answer for an event. Returns all attendees.
    pub async fn set_attendance(
        &self,
        event_id: Uuid,
        status: Attendance,
        user_id: &str,
    ) -> ResultEngine<Vec<Attendee>> {
        with_tx!(self, |db_tx| {
            self.require_event_member(&db_tx, event_id, user_id).await?;

            let active = event_attendees::ActiveModel {
                event_id: ActiveValue::Set(event_id),
                user_id: ActiveValue::Set(user_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                confirmed_at: ActiveValue::Set(Utc::now()),
            };

            // Upsert: insert if missing, otherwise update the answer.
            match event_attendees::Entity::find_by_id((event_id, user_id.to_string()))
                .one(&db_tx)
                .await?
            {
                Some(_) => {
                    active.update(&db_tx).await?;
                }
                None => {
                    active.insert(&db_tx).await?;
                }
            }

            self.attendees_of(&db_tx, event_id).await
        })
    }

    /// Append a comment to an event. Returns the whole thread, oldest first.
    pub async fn add_event_comment(
        &self,
        event_id: Uuid,
        text: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Comment>> {
        let text = normalize_required(text, "comment")?;
        with_tx!(self, |db_tx| {
            self.require_event_member(&db_tx, event_id, user_id).await?;
            event_comments::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                event_id: ActiveValue::Set(event_id),
                user_id: ActiveValue::Set(user_id.to_string()),
                text: ActiveValue::Set(text),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            self.event_thread(&db_tx, event_id).await
        })
    }

    pub(super) async fn attendees_of(
        &self,
        db: &DatabaseTransaction,
        event_id: Uuid,
    ) -> ResultEngine<Vec<Attendee>> {
        let rows = event_attendees::Entity::find()
            .filter(event_attendees::Column::EventId.eq(event_id))
            .order_by_asc(event_attendees::Column::ConfirmedAt)
            .all(db)
            .await?;
        let names = self
            .display_names(db, rows.iter().map(|a| a.user_id.clone()))
            .await?;

        rows.into_iter()
            .map(|a| {
                Ok(Attendee {
                    name: names.get(&a.user_id).cloned().unwrap_or_default(),
                    status: Attendance::try_from(a.status.as_str())?,
                    username: a.user_id,
                    confirmed_at: a.confirmed_at,
                })
            })
            .collect()
    }

    async fn event_thread(
        &self,
        db: &DatabaseTransaction,
        event_id: Uuid,
    ) -> ResultEngine<Vec<Comment>> {
        let rows = event_comments::Entity::find()
            .filter(event_comments::Column::EventId.eq(event_id))
            .order_by_asc(event_comments::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
