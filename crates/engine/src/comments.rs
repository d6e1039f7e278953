//! Append-only comment threads attached to drinks and events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<super::drink_comments::Model> for Comment {
    fn from(model: super::drink_comments::Model) -> Self {
        Self {
            id: model.id,
            author: model.user_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

impl From<super::event_comments::Model> for Comment {
    fn from(model: super::event_comments::Model) -> Self {
        Self {
            id: model.id,
            author: model.user_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}
