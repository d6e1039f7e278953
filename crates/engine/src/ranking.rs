//! Member leaderboards.

use std::fmt;

use crate::EngineError;

/// Running totals of a group member.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemberTotals {
    pub user_id: String,
    pub name: String,
    pub total_drinks: u64,
    pub total_liters: f64,
    pub total_points: f64,
    pub total_party_hours: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankMetric {
    #[default]
    Points,
    TotalDrinks,
    TotalLiters,
    TotalPartyHours,
}

impl RankMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::TotalDrinks => "total_drinks",
            Self::TotalLiters => "total_liters",
            Self::TotalPartyHours => "total_party_hours",
        }
    }

    fn value(self, member: &MemberTotals) -> f64 {
        match self {
            Self::Points => member.total_points,
            Self::TotalDrinks => member.total_drinks as f64,
            Self::TotalLiters => member.total_liters,
            Self::TotalPartyHours => member.total_party_hours,
        }
    }
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RankMetric {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "points" | "total_points" | "totalPoints" => Ok(Self::Points),
            "total_drinks" | "totalDrinks" => Ok(Self::TotalDrinks),
            "total_liters" | "totalLiters" => Ok(Self::TotalLiters),
            "total_party_hours" | "totalPartyHours" => Ok(Self::TotalPartyHours),
            other => Err(EngineError::InvalidInput(format!(
                "unknown ranking metric: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Desc => Self::Asc,
            Self::Asc => Self::Desc,
        }
    }
}

impl TryFrom<&str> for SortOrder {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "desc" => Ok(Self::Desc),
            "asc" => Ok(Self::Asc),
            other => Err(EngineError::InvalidInput(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

/// Leaderboard column selection: picking the active metric flips the
/// order, picking another metric starts it descending.
pub fn select_metric(
    current: (RankMetric, SortOrder),
    picked: RankMetric,
) -> (RankMetric, SortOrder) {
    if current.0 == picked {
        (picked, current.1.toggled())
    } else {
        (picked, SortOrder::Desc)
    }
}

/// Stable sort of `members` by `metric`. Equal values keep their input
/// order in both directions.
/// NaN totals sort as larger than any number.
pub fn rank(
    mut members: Vec<MemberTotals>,
    metric: RankMetric,
    order: SortOrder,
) -> Vec<MemberTotals> {
    members.sort_by(|a, b| {
        let (a, b) = (metric.value(a), metric.value(b));
        match order {
            SortOrder::Desc => b.total_cmp(&a),
            SortOrder::Asc => a.total_cmp(&b),
        }
    });
    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, drinks: u64, liters: f64, points: f64, hours: f64) -> MemberTotals {
        MemberTotals {
            user_id: user_id.to_string(),
            name: user_id.to_uppercase(),
            total_drinks: drinks,
            total_liters: liters,
            total_points: points,
            total_party_hours: hours,
        }
    }

    fn ids(members: &[MemberTotals]) -> Vec<&str> {
        members.iter().map(|m| m.user_id.as_str()).collect()
    }

    #[test]
    fn default_is_points_descending() {
        assert_eq!(RankMetric::default(), RankMetric::Points);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn points_desc_is_stable() {
        let members = vec![
            member("ana", 3, 1.0, 10.0, 2.0),
            member("bia", 5, 2.0, 25.0, 1.0),
            member("caio", 1, 0.5, 10.0, 4.0),
            member("duda", 2, 0.7, 25.0, 0.0),
            member("enzo", 0, 0.0, 0.0, 0.0),
        ];
        let ranked = rank(members, RankMetric::Points, SortOrder::Desc);
        assert_eq!(ids(&ranked), vec!["bia", "duda", "ana", "caio", "enzo"]);
    }

    #[test]
    fn ascending_keeps_ties_in_input_order() {
        let members = vec![
            member("ana", 3, 1.0, 10.0, 2.0),
            member("bia", 1, 2.0, 25.0, 2.0),
            member("caio", 1, 0.5, 10.0, 4.0),
        ];
        let ranked = rank(members, RankMetric::TotalDrinks, SortOrder::Asc);
        assert_eq!(ids(&ranked), vec!["bia", "caio", "ana"]);
    }

    #[test]
    fn ranks_by_every_metric() {
        let members = vec![
            member("ana", 3, 1.0, 10.0, 2.0),
            member("bia", 1, 2.0, 25.0, 1.0),
            member("caio", 2, 0.5, 5.0, 4.0),
        ];
        assert_eq!(
            ids(&rank(members.clone(), RankMetric::TotalDrinks, SortOrder::Desc)),
            vec!["ana", "caio", "bia"]
        );
        assert_eq!(
            ids(&rank(members.clone(), RankMetric::TotalLiters, SortOrder::Desc)),
            vec!["bia", "ana", "caio"]
        );
        assert_eq!(
            ids(&rank(members, RankMetric::TotalPartyHours, SortOrder::Asc)),
            vec!["bia", "ana", "caio"]
        );
    }

    #[test]
    fn metric_selection_toggles_order() {
        let state = (RankMetric::Points, SortOrder::Desc);
        let state = select_metric(state, RankMetric::Points);
        assert_eq!(state, (RankMetric::Points, SortOrder::Asc));
        let state = select_metric(state, RankMetric::TotalLiters);
        assert_eq!(state, (RankMetric::TotalLiters, SortOrder::Desc));
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!(
            RankMetric::try_from("totalPartyHours").unwrap(),
            RankMetric::TotalPartyHours
        );
        assert_eq!(RankMetric::try_from("points").unwrap(), RankMetric::Points);
        assert!(RankMetric::try_from("age").is_err());
        assert_eq!(SortOrder::try_from("asc").unwrap(), SortOrder::Asc);
        assert!(SortOrder::try_from("up").is_err());
    }

    #[test]
    fn nan_totals_do_not_break_the_sort() {
        let members: Vec<MemberTotals> = (0..64)
            .map(|i| {
                let points = if i % 7 == 0 { f64::NAN } else { f64::from(i % 10) };
                member(&format!("m{i}"), 1, 0.1, points, 0.0)
            })
            .collect();

        let ranked = rank(members, RankMetric::Points, SortOrder::Desc);
        assert_eq!(ranked.len(), 64);
        let nans = ranked.iter().take_while(|m| m.total_points.is_nan()).count();
        assert_eq!(nans, 10);
        let finite: Vec<f64> = ranked[nans..].iter().map(|m| m.total_points).collect();
        assert!(finite.iter().all(|p| !p.is_nan()));
        assert!(finite.windows(2).all(|w| w[0] >= w[1]));

        let ranked = rank(ranked, RankMetric::Points, SortOrder::Asc);
        assert!(ranked[54..].iter().all(|m| m.total_points.is_nan()));
        assert_eq!(ranked[0].total_points, 0.0);
    }
}
