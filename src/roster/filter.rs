use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::seat_label::compare_seat_labels;
use crate::models::{DayType, SeatRecord};

/// Occupancy-status selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Expired,
    Vacant,
}

/// Day-type selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayFilter {
    #[default]
    All,
    Full,
    Morning,
    Evening,
}

/// Which backend roster a selection reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
    Full,
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub day: DayFilter,
}

impl StatusFilter {
    /// Expiry is decided by the backend; the expired view is a separate roster,
    /// never a client-side predicate.
    pub fn source(self) -> RosterSource {
        match self {
            StatusFilter::Expired => RosterSource::Expired,
            StatusFilter::All | StatusFilter::Vacant => RosterSource::Full,
        }
    }
}

impl DayFilter {
    pub fn day_type(self) -> Option<DayType> {
        match self {
            DayFilter::All => None,
            DayFilter::Full => Some(DayType::FullDay),
            DayFilter::Morning => Some(DayType::MorningHalf),
            DayFilter::Evening => Some(DayType::EveningHalf),
        }
    }
}

impl FilterSelection {
    pub fn new(status: StatusFilter, day: DayFilter) -> Self {
        Self { status, day }
    }

    pub fn source(&self) -> RosterSource {
        self.status.source()
    }

    /// Whether a single record survives both selectors.
    pub fn matches(&self, record: &SeatRecord) -> bool {
        if self.status == StatusFilter::Vacant && !record.is_vacant() {
            return false;
        }
        match self.day.day_type() {
            Some(day_type) => record.day_type_lower() == day_type.label(),
            None => true,
        }
    }
}

/// Narrow by status, then by day type, then order by seat label.
///
/// Pure: the same input always yields the same sequence, and feeding the
/// output back in with the same selection returns it unchanged.
pub fn filter_and_sort<I>(records: I, selection: &FilterSelection) -> Vec<SeatRecord>
where
    I: IntoIterator<Item = SeatRecord>,
{
    let mut kept: Vec<SeatRecord> = records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect();
    sort_by_seat(&mut kept);
    kept
}

/// Stable sort by seat label.
pub fn sort_by_seat(records: &mut [SeatRecord]) {
    records.sort_by(|a, b| compare_seat_labels(&a.seat_no, &b.seat_no));
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} filter: {value}")]
pub struct UnknownFilter {
    kind: &'static str,
    value: String,
}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "expired" => Ok(StatusFilter::Expired),
            "vacant" => Ok(StatusFilter::Vacant),
            _ => Err(UnknownFilter { kind: "status", value: s.to_string() }),
        }
    }
}

impl FromStr for DayFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DayFilter::All),
            "full" => Ok(DayFilter::Full),
            "morning" => Ok(DayFilter::Morning),
            "evening" => Ok(DayFilter::Evening),
            _ => Err(UnknownFilter { kind: "day", value: s.to_string() }),
        }
    }
}

// Query strings and `FromStr` accept the same spellings.
fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = UnknownFilter>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(de::Error::custom)
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for DayFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status={:?} day={:?}", self.status, self.day)
    }
}
