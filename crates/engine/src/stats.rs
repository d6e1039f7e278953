//! Aggregation of drink records into dashboard buckets.
//!
//! Two partitions are provided:
//!
//! - by drink type, one bucket per type present, most frequent first;
//! - by time of day, always the four [`TimePeriod`] buckets in fixed order.
//!
//! Liters are `sum(volume_ml) / 1000` and are never rounded here.

use std::{collections::HashMap, fmt, hash::Hash};

use chrono::{DateTime, TimeZone, Timelike, Utc};

use crate::{DrinkRecord, DrinkType};

/// Part of the day a drink was logged in, by local hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimePeriod {
    /// 06:00 to 12:00
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// 18:00 to 24:00
    Evening,
    /// 00:00 to 06:00
    Night,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        Self::Morning,
        Self::Afternoon,
        Self::Evening,
        Self::Night,
    ];

    /// Lower bound inclusive, upper bound exclusive.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=23 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn of<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self::from_hour(instant.with_timezone(tz).hour())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Type(DrinkType),
    Period(TimePeriod),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateBucket {
    pub key: BucketKey,
    pub count: u64,
    pub total_liters: f64,
    pub total_points: f64,
}

/// Count, liters and points over a set of records.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub drinks: u64,
    pub liters: f64,
    pub points: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    count: u64,
    volume_ml: i64,
    points: f64,
}

impl Accumulator {
    fn push(&mut self, record: &DrinkRecord) {
        self.count += 1;
        self.volume_ml += record.volume_ml();
        self.points += record.score();
    }

    fn liters(&self) -> f64 {
        self.volume_ml as f64 / 1000.0
    }

    fn into_bucket(self, key: BucketKey) -> AggregateBucket {
        AggregateBucket {
            key,
            count: self.count,
            total_liters: self.liters(),
            total_points: self.points,
        }
    }

    fn into_totals(self) -> Totals {
        Totals {
            drinks: self.count,
            liters: self.liters(),
            points: self.points,
        }
    }
}

/// Group records by drink type.
///
/// Buckets are ordered by descending count; ties keep the order in which
/// each type first appears in `records`. Empty input yields no buckets.
pub fn aggregate_by_type<'a, I>(records: I) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a DrinkRecord>,
{
    let mut groups: Vec<(DrinkType, Accumulator)> = Vec::new();
    for record in records {
        let kind = record.drink_type();
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, acc)) => acc.push(record),
            None => {
                let mut acc = Accumulator::default();
                acc.push(record);
                groups.push((kind, acc));
            }
        }
    }

    let mut buckets: Vec<AggregateBucket> = groups
        .into_iter()
        .map(|(kind, acc)| acc.into_bucket(BucketKey::Type(kind)))
        .collect();
    // `sort_by` is stable, which keeps first-occurrence order on ties.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Group records by local time of day.
///
/// Always returns four buckets (Morning, Afternoon, Evening, Night), with
/// zero values for periods without records.
pub fn aggregate_by_time_period<'a, I, Tz>(records: I, tz: &Tz) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a DrinkRecord>,
    Tz: TimeZone,
{
    let mut accs = [Accumulator::default(); 4];
    for record in records {
        let period = TimePeriod::of(record.occurred_at(), tz);
        accs[period_index(period)].push(record);
    }

    TimePeriod::ALL
        .into_iter()
        .map(|period| accs[period_index(period)].into_bucket(BucketKey::Period(period)))
        .collect()
}

fn period_index(period: TimePeriod) -> usize {
    match period {
        TimePeriod::Morning => 0,
        TimePeriod::Afternoon => 1,
        TimePeriod::Evening => 2,
        TimePeriod::Night => 3,
    }
}

pub fn summarize<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a DrinkRecord>,
{
    let mut acc = Accumulator::default();
    for record in records {
        acc.push(record);
    }
    acc.into_totals()
}

/// Totals per key, e.g. per member.
pub fn totals_by<K, I>(records: I) -> HashMap<K, Totals>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, DrinkRecord)>,
{
    let mut accs: HashMap<K, Accumulator> = HashMap::new();
    for (key, record) in records {
        accs.entry(key).or_default().push(&record);
    }
    accs.into_iter()
        .map(|(key, acc)| (key, acc.into_totals()))
        .collect()
}

/// Group-wide totals, including party hours.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTotals {
    pub drinks: u64,
    pub liters: f64,
    pub points: f64,
    pub party_hours: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Averages {
    pub drinks: f64,
    pub liters: f64,
    pub points: f64,
    pub party_hours: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupAverages {
    /// `None` when the group has no members.
    pub per_member: Option<Averages>,
    /// `None` when the group has no events.
    pub per_event: Option<Averages>,
}

impl GroupTotals {
    fn divided_by(&self, divisor: u64) -> Option<Averages> {
        if divisor == 0 {
            return None;
        }
        let d = divisor as f64;
        Some(Averages {
            drinks: self.drinks as f64 / d,
            liters: self.liters / d,
            points: self.points / d,
            party_hours: self.party_hours / d,
        })
    }

    pub fn averages(&self, members: u64, events: u64) -> GroupAverages {
        GroupAverages {
            per_member: self.divided_by(members),
            per_event: self.divided_by(events),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 15, 0).unwrap()
    }

    fn record(kind: DrinkType, volume_ml: i64, hour: u32) -> DrinkRecord {
        DrinkRecord::new(kind, volume_ml, at(hour)).unwrap()
    }

    #[test]
    fn empty_input_asymmetry() {
        let empty: [DrinkRecord; 0] = [];
        assert!(aggregate_by_type(&empty).is_empty());

        let periods = aggregate_by_time_period(&empty, &Utc);
        assert_eq!(periods.len(), 4);
        for (bucket, period) in periods.iter().zip(TimePeriod::ALL) {
            assert_eq!(bucket.key, BucketKey::Period(period));
            assert_eq!(bucket.count, 0);
            assert_eq!(bucket.total_liters, 0.0);
            assert_eq!(bucket.total_points, 0.0);
        }
    }

    #[test]
    fn single_beer_round_trip() {
        let records = [record(DrinkType::Beer, 500, 20)];
        let buckets = aggregate_by_type(&records);
        assert_eq!(
            buckets,
            vec![AggregateBucket {
                key: BucketKey::Type(DrinkType::Beer),
                count: 1,
                total_liters: 0.5,
                total_points: 5.0,
            }]
        );
    }

    #[test]
    fn types_sorted_by_count_with_stable_ties() {
        let records = [
            record(DrinkType::Wine, 150, 20),
            record(DrinkType::Shot, 40, 21),
            record(DrinkType::Beer, 330, 22),
            record(DrinkType::Beer, 330, 23),
            record(DrinkType::Shot, 40, 23),
            record(DrinkType::Beer, 500, 1),
        ];
        let keys: Vec<_> = aggregate_by_type(&records)
            .into_iter()
            .map(|bucket| (bucket.key, bucket.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                (BucketKey::Type(DrinkType::Beer), 3),
                (BucketKey::Type(DrinkType::Shot), 2),
                (BucketKey::Type(DrinkType::Wine), 1),
            ]
        );

        let ties = [
            record(DrinkType::Cocktail, 200, 20),
            record(DrinkType::Spirit, 50, 20),
            record(DrinkType::Other, 100, 20),
        ];
        let keys: Vec<_> = aggregate_by_type(&ties).into_iter().map(|b| b.key).collect();
        assert_eq!(
            keys,
            vec![
                BucketKey::Type(DrinkType::Cocktail),
                BucketKey::Type(DrinkType::Spirit),
                BucketKey::Type(DrinkType::Other),
            ]
        );
    }

    #[test]
    fn period_boundaries() {
        assert_eq!(TimePeriod::from_hour(7), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(23), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(2), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(6), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(18), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(0), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Night);
    }

    #[test]
    fn periods_use_the_local_hour() {
        // 04:15 UTC is 07:15 at UTC+3.
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let records = [record(DrinkType::Beer, 330, 4)];
        let utc = aggregate_by_time_period(&records, &Utc);
        let local = aggregate_by_time_period(&records, &tz);
        assert_eq!(utc[3].count, 1);
        assert_eq!(local[0].count, 1);
        assert_eq!(local[3].count, 0);
    }

    #[test]
    fn partitions_preserve_totals() {
        let records: Vec<_> = (0..24)
            .map(|hour| {
                let kind = DrinkType::ALL[hour as usize % DrinkType::ALL.len()];
                record(kind, 50 + i64::from(hour) * 10, hour)
            })
            .collect();

        let by_type = aggregate_by_type(&records);
        let by_period = aggregate_by_time_period(&records, &Utc);
        let total = summarize(&records);

        let type_count: u64 = by_type.iter().map(|b| b.count).sum();
        let period_count: u64 = by_period.iter().map(|b| b.count).sum();
        assert_eq!(type_count, records.len() as u64);
        assert_eq!(period_count, records.len() as u64);
        assert_eq!(by_period.iter().map(|b| b.count).collect::<Vec<_>>(), vec![6, 6, 6, 6]);

        let type_liters: f64 = by_type.iter().map(|b| b.total_liters).sum();
        let period_points: f64 = by_period.iter().map(|b| b.total_points).sum();
        assert!((type_liters - total.liters).abs() < 1e-9);
        assert!((period_points - total.points).abs() < 1e-9);
    }

    #[test]
    fn totals_by_member() {
        let totals = totals_by(vec![
            ("alice", record(DrinkType::Beer, 500, 20)),
            ("bob", record(DrinkType::Shot, 50, 21)),
            ("alice", record(DrinkType::Wine, 150, 22)),
        ]);
        assert_eq!(
            totals["alice"],
            Totals {
                drinks: 2,
                liters: 0.65,
                points: 8.0
            }
        );
        assert_eq!(totals["bob"].points, 5.0);
    }

    #[test]
    fn averages_are_absent_without_divisor() {
        let totals = GroupTotals {
            drinks: 10,
            liters: 5.0,
            points: 40.0,
            party_hours: 12.0,
        };
        let averages = totals.averages(4, 0);
        assert!(averages.per_event.is_none());
        let per_member = averages.per_member.unwrap();
        assert_eq!(per_member.drinks, 2.5);
        assert_eq!(per_member.points, 10.0);
        assert_eq!(per_member.party_hours, 3.0);
        assert!(totals.averages(0, 0).per_member.is_none());
    }
}
