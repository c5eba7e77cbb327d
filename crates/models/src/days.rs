use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// The day of the week a schedule entry falls on, derived from its date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Day-to-name mapping for parsing and display
    const DAY_NAMES: [(Self, &'static str); 7] = [
        (Self::Monday, "Monday"),
        (Self::Tuesday, "Tuesday"),
        (Self::Wednesday, "Wednesday"),
        (Self::Thursday, "Thursday"),
        (Self::Friday, "Friday"),
        (Self::Saturday, "Saturday"),
        (Self::Sunday, "Sunday"),
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        Self::DAY_NAMES
            .iter()
            .find(|(day, _)| day == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Error returned when a day name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError(pub String);

impl Display for ParseDayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Unknown day of week: {}", self.0)
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for DayOfWeek {
    type Err = ParseDayError;

    fn from_str(day: &str) -> Result<Self, Self::Err> {
        Self::DAY_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(day))
            .map(|(day, _)| *day)
            .ok_or_else(|| ParseDayError(day.to_string()))
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "database")]
crate::db_value::string_column!(DayOfWeek);

#[cfg(test)]
mod test {
    use crate::days::DayOfWeek;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_day_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        assert_eq!(DayOfWeek::from_date(date), DayOfWeek::Monday);

        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        assert_eq!(DayOfWeek::from_date(date), DayOfWeek::Sunday);
        assert!(DayOfWeek::Sunday.is_weekend());
    }

    #[test]
    fn test_day_from_str() {
        assert_eq!(DayOfWeek::from_str("Friday").unwrap(), DayOfWeek::Friday);
        assert_eq!(DayOfWeek::from_str("friday").unwrap(), DayOfWeek::Friday);
        assert!(DayOfWeek::from_str("Fri").is_err());
    }

    #[test]
    fn test_day_display() {
        assert_eq!(DayOfWeek::Wednesday.to_string(), "Wednesday");
    }
}
