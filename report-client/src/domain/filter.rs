use std::fmt;

use time::{Date, Month};

/// What a dashboard asks the report API for. Dates are UTC; the server filters
/// on UTC dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    Daily(Date),
    Monthly { year: i32, month: Month },
    HoursAgo { hours: u32 },
}

impl ReportFilter {
    pub fn daily(year: i32, month: u8, day: u8) -> Result<Self, time::error::ComponentRange> {
        let month = Month::try_from(month)?;
        Ok(Self::Daily(Date::from_calendar_date(year, month, day)?))
    }

    pub fn monthly(year: i32, month: u8) -> Result<Self, time::error::ComponentRange> {
        Ok(Self::Monthly {
            year,
            month: Month::try_from(month)?,
        })
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Daily(_) => "/api/daily-reports-data/",
            Self::Monthly { .. } => "/api/monthly-reports-data/",
            Self::HoursAgo { .. } => "/api/consumption-hours-ago",
        }
    }

    /// Query parameters in the order the endpoints document them. Months are 1-based.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Daily(date) => vec![
                ("year", date.year().to_string()),
                ("month", u8::from(date.month()).to_string()),
                ("day", date.day().to_string()),
            ],
            Self::Monthly { year, month } => vec![
                ("year", year.to_string()),
                ("month", u8::from(*month).to_string()),
            ],
            Self::HoursAgo { hours } => vec![("hours", hours.to_string())],
        }
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily(date) => write!(f, "daily {date}"),
            Self::Monthly { year, month } => write!(f, "monthly {year}-{:02}", u8::from(*month)),
            Self::HoursAgo { hours } => write!(f, "last {hours} hours"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn daily_query_uses_one_based_month() {
        let filter = ReportFilter::daily(2024, 3, 5).unwrap();
        assert_eq!(filter, ReportFilter::Daily(date!(2024-03-05)));
        assert_eq!(
            filter.query(),
            vec![("year", "2024".to_string()), ("month", "3".to_string()), ("day", "5".to_string())]
        );
        assert_eq!(filter.to_string(), "daily 2024-03-05");
    }

    #[test]
    fn invalid_calendar_dates_are_rejected() {
        assert!(ReportFilter::daily(2023, 2, 29).is_err());
        assert!(ReportFilter::monthly(2024, 13).is_err());
    }

    #[test]
    fn hours_ago_targets_its_own_endpoint() {
        let filter = ReportFilter::HoursAgo { hours: 24 };
        assert_eq!(filter.path(), "/api/consumption-hours-ago");
        assert_eq!(filter.query(), vec![("hours", "24".to_string())]);
    }
}
