//! Drinks: the atomic unit of member activity.
//!
//! A [`DrinkRecord`] is the scoring view of a drink (type, volume, instant).
//! A [`Drink`] is the full persisted row as returned by the engine.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, scoring};

/// Kinds of drink a member can log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrinkType {
    Beer,
    Wine,
    Spirit,
    Cocktail,
    Shot,
    Other,
}

impl DrinkType {
    pub const ALL: [DrinkType; 6] = [
        Self::Beer,
        Self::Wine,
        Self::Spirit,
        Self::Cocktail,
        Self::Shot,
        Self::Other,
    ];

    /// Canonical name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beer => "beer",
            Self::Wine => "wine",
            Self::Spirit => "spirit",
            Self::Cocktail => "cocktail",
            Self::Shot => "shot",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DrinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DrinkType {
    type Error = EngineError;

    /// Parses canonical names and the labels used by the first web client
    /// (`Cerveja`, `Vinho`, `Destilado`, `Coquetel`, `Shot`, `Outro`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "beer" | "cerveja" => Ok(Self::Beer),
            "wine" | "vinho" => Ok(Self::Wine),
            "spirit" | "destilado" => Ok(Self::Spirit),
            "cocktail" | "coquetel" => Ok(Self::Cocktail),
            "shot" => Ok(Self::Shot),
            "other" | "outro" => Ok(Self::Other),
            _ => Err(EngineError::UnknownDrinkType(value.to_string())),
        }
    }
}

impl FromStr for DrinkType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Scoring view of a drink. The volume is always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrinkRecord {
    drink_type: DrinkType,
    volume_ml: i64,
    occurred_at: DateTime<Utc>,
}

impl DrinkRecord {
    pub fn new(
        drink_type: DrinkType,
        volume_ml: i64,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        scoring::ensure_volume(volume_ml)?;
        Ok(Self {
            drink_type,
            volume_ml,
            occurred_at,
        })
    }

    pub fn drink_type(&self) -> DrinkType {
        self.drink_type
    }

    pub fn volume_ml(&self) -> i64 {
        self.volume_ml
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn liters(&self) -> f64 {
        self.volume_ml as f64 / 1000.0
    }

    /// Points earned by this drink.
    pub fn score(&self) -> f64 {
        scoring::points_for(self.drink_type, self.volume_ml)
    }
}

/// A persisted drink.
#[derive(Clone, Debug, PartialEq)]
pub struct Drink {
    pub id: Uuid,
    pub user_id: String,
    pub group_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub drink_type: DrinkType,
    pub brand: String,
    pub volume_ml: i64,
    pub location: Option<String>,
    pub photo_url: String,
    pub points: f64,
    pub occurred_at: DateTime<Utc>,
}

impl Drink {
    pub fn record(&self) -> DrinkRecord {
        DrinkRecord {
            drink_type: self.drink_type,
            volume_ml: self.volume_ml,
            occurred_at: self.occurred_at,
        }
    }
}

impl TryFrom<Model> for Drink {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let drink_type = DrinkType::try_from(model.drink_type.as_str())?;
        scoring::ensure_volume(model.volume_ml)?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            group_id: model.group_id,
            event_id: model.event_id,
            name: model.name,
            drink_type,
            brand: model.brand,
            volume_ml: model.volume_ml,
            location: model.location,
            photo_url: model.photo_url,
            points: model.points,
            occurred_at: model.occurred_at,
        })
    }
}

/// Input for logging a new drink.
#[derive(Clone, Debug)]
pub struct NewDrink {
    pub group_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub drink_type: DrinkType,
    pub brand: String,
    pub volume_ml: i64,
    pub location: Option<String>,
    pub photo_url: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drinks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub group_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub drink_type: String,
    pub brand: String,
    pub volume_ml: i64,
    pub location: Option<String>,
    pub photo_url: String,
    pub points: f64,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(has_many = "super::drink_comments::Entity")]
    Comments,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::drink_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!(DrinkType::try_from("beer").unwrap(), DrinkType::Beer);
        assert_eq!(DrinkType::try_from("Cerveja").unwrap(), DrinkType::Beer);
        assert_eq!(DrinkType::try_from(" COQUETEL ").unwrap(), DrinkType::Cocktail);
        assert_eq!("Outro".parse::<DrinkType>().unwrap(), DrinkType::Other);
        for kind in DrinkType::ALL {
            assert_eq!(DrinkType::try_from(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            DrinkType::try_from("mead"),
            Err(EngineError::UnknownDrinkType("mead".to_string()))
        );
    }

    #[test]
    fn record_requires_positive_volume() {
        let now = Utc::now();
        assert!(matches!(
            DrinkRecord::new(DrinkType::Beer, 0, now),
            Err(EngineError::InvalidVolume(_))
        ));
        assert!(matches!(
            DrinkRecord::new(DrinkType::Beer, -330, now),
            Err(EngineError::InvalidVolume(_))
        ));
        let record = DrinkRecord::new(DrinkType::Wine, 150, now).unwrap();
        assert_eq!(record.liters(), 0.15);
        assert_eq!(record.score(), 3.0);
    }
}
