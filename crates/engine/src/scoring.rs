//! Point policy for logged drinks.
//!
//! A drink is worth `points_per_hundred_ml(type) * volume_ml / 100` points.

use crate::{DrinkType, EngineError, ResultEngine};

/// Points awarded per 100ml for each drink type.
///
/// `Other` is worth the same as beer: an unclassified drink earns the
/// baseline rate rather than nothing.
pub fn points_per_hundred_ml(drink_type: DrinkType) -> f64 {
    match drink_type {
        DrinkType::Beer => 1.0,
        DrinkType::Wine => 2.0,
        DrinkType::Cocktail => 2.5,
        DrinkType::Spirit => 4.0,
        DrinkType::Shot => 10.0,
        DrinkType::Other => 1.0,
    }
}

/// Score a drink. Fails with [`EngineError::InvalidVolume`] when
/// `volume_ml <= 0`.
pub fn score(drink_type: DrinkType, volume_ml: i64) -> ResultEngine<f64> {
    ensure_volume(volume_ml)?;
    Ok(points_for(drink_type, volume_ml))
}

/// Score a drink whose type is given by name.
pub fn score_named(drink_type: &str, volume_ml: i64) -> ResultEngine<f64> {
    score(DrinkType::try_from(drink_type)?, volume_ml)
}

pub(crate) fn ensure_volume(volume_ml: i64) -> ResultEngine<()> {
    if volume_ml <= 0 {
        return Err(EngineError::InvalidVolume(format!(
            "volume must be > 0 ml, got {volume_ml}"
        )));
    }
    Ok(())
}

pub(crate) fn points_for(drink_type: DrinkType, volume_ml: i64) -> f64 {
    points_per_hundred_ml(drink_type) * volume_ml as f64 / 100.0
}
