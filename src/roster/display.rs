use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::seat_label::ParsedSeat;
use crate::models::{DayType, SeatRecord};

/// How half-day slots are told apart from the full-day slot on the same seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySuffixStyle {
    /// `31_A` / `31_B`
    #[default]
    Underscore,
    /// `31A` / `31B`
    Plain,
    /// labels shown as stored
    None,
}

impl FromStr for DaySuffixStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "underscore" => Ok(DaySuffixStyle::Underscore),
            "plain" => Ok(DaySuffixStyle::Plain),
            "none" => Ok(DaySuffixStyle::None),
            other => Err(format!("unknown day suffix style: {other}")),
        }
    }
}

/// Display suffixes per half-day shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySuffixTable {
    pub morning: String,
    pub evening: String,
}

impl From<DaySuffixStyle> for DaySuffixTable {
    fn from(style: DaySuffixStyle) -> Self {
        let (morning, evening) = match style {
            DaySuffixStyle::Underscore => ("_A", "_B"),
            DaySuffixStyle::Plain => ("A", "B"),
            DaySuffixStyle::None => ("", ""),
        };
        Self { morning: morning.to_string(), evening: evening.to_string() }
    }
}

impl Default for DaySuffixTable {
    fn default() -> Self {
        DaySuffixStyle::default().into()
    }
}

impl DaySuffixTable {
    pub fn suffix_for(&self, day_type: Option<DayType>) -> &str {
        match day_type {
            Some(DayType::MorningHalf) => &self.morning,
            Some(DayType::EveningHalf) => &self.evening,
            Some(DayType::FullDay) | None => "",
        }
    }

    /// Cosmetic label only. A stored label that already carries a letter is
    /// left alone so `31_A` never turns into `31_A_A`.
    pub fn display_label(&self, record: &SeatRecord) -> String {
        let day_type = record.day_type.as_deref().and_then(DayType::from_label);
        let suffix = self.suffix_for(day_type);
        if suffix.is_empty() || ParsedSeat::parse(&record.seat_no).suffix().is_some() {
            return record.seat_no.clone();
        }
        format!("{}{}", record.seat_no, suffix)
    }
}

/// A roster row as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub record: SeatRecord,
    pub display_label: String,
}

impl RosterEntry {
    pub fn new(record: SeatRecord, table: &DaySuffixTable) -> Self {
        let display_label = table.display_label(&record);
        Self { record, display_label }
    }
}
