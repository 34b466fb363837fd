use chrono::NaiveDate;
use serde::Serialize;

/// Period selector shared by the payment, expense and report endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeriodFilter {
    #[default]
    All,
    Day(NaiveDate),
    Month { month: u32, year: i32 },
    Year(i32),
}

/// Query string form of a period.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct PeriodParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl PeriodFilter {
    pub fn params(&self) -> PeriodParams {
        match *self {
            PeriodFilter::All => PeriodParams::default(),
            PeriodFilter::Day(date) => PeriodParams {
                date: Some(date.format("%Y-%m-%d").to_string()),
                ..Default::default()
            },
            PeriodFilter::Month { month, year } => PeriodParams {
                month: Some(month),
                year: Some(year),
                ..Default::default()
            },
            PeriodFilter::Year(year) => PeriodParams { year: Some(year), ..Default::default() },
        }
    }

    /// Month/year only; the dashboard-totals endpoint has no day granularity.
    pub fn totals_params(&self) -> PeriodParams {
        match *self {
            PeriodFilter::Day(_) | PeriodFilter::All => PeriodParams::default(),
            other => other.params(),
        }
    }
}

/// Accepts `YYYY-MM-DD`, `DD-MM-YYYY` and `DD/MM/YYYY`.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_dates_are_normalised() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(parse_filter_date("2025-06-09"), Some(expected));
        assert_eq!(parse_filter_date("09-06-2025"), Some(expected));
        assert_eq!(parse_filter_date("09/06/2025"), Some(expected));
        assert_eq!(parse_filter_date("June 9"), None);
    }

    #[test]
    fn params_by_period() {
        let day = PeriodFilter::Day(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(day.params().date.as_deref(), Some("2025-01-02"));
        assert_eq!(day.totals_params(), PeriodParams::default());

        let month = PeriodFilter::Month { month: 6, year: 2025 };
        assert_eq!(month.params(), PeriodParams { date: None, month: Some(6), year: Some(2025) });
    }
}
