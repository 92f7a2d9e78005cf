use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Absolute point in time held by a picker.
///
/// Instants are wall-clock values; epoch conversions treat them as UTC so
/// timestamps are stable regardless of the host timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(NaiveDateTime);

impl Instant {
    #[must_use]
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }

    #[must_use]
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|datetime| Self(datetime.naive_utc()))
    }

    #[must_use]
    pub fn timestamp_millis(self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    #[must_use]
    pub fn datetime(self) -> NaiveDateTime {
        self.0
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0.date()
    }

    #[must_use]
    pub fn time(self) -> NaiveTime {
        self.0.time()
    }

    /// Moves the date component to `cursor`, clamping the day to the month length.
    #[must_use]
    pub fn with_cursor(self, cursor: Cursor) -> Self {
        let day = self.0.day().min(days_in_month(cursor.year, cursor.month));
        match NaiveDate::from_ymd_opt(cursor.year, cursor.month + 1, day) {
            Some(date) => Self(date.and_time(self.0.time())),
            None => self,
        }
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl From<NaiveDate> for Instant {
    fn from(value: NaiveDate) -> Self {
        Self::from_date(value)
    }
}

/// Any representation a host may hand to the picker where a date is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(i64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl DateValue {
    /// Empty text stands for "no value" in host payloads.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for DateValue {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        Self::DateTime(value.and_time(NaiveTime::MIN))
    }
}

impl From<Instant> for DateValue {
    fn from(value: Instant) -> Self {
        Self::DateTime(value.datetime())
    }
}

/// Value shape supplied by a host: nothing, a scalar, or a list.
///
/// Single pickers expect `Empty`/`Single`, range pickers expect
/// `Empty`/`Multiple`; any other shape is reported and treated as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueInput {
    #[default]
    Empty,
    Multiple(Vec<DateValue>),
    Single(DateValue),
}

impl From<DateValue> for ValueInput {
    fn from(value: DateValue) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<DateValue>> for ValueInput {
    fn from(value: Vec<DateValue>) -> Self {
        Self::Multiple(value)
    }
}

impl From<&str> for ValueInput {
    fn from(value: &str) -> Self {
        Self::Single(DateValue::from(value))
    }
}

impl From<[&str; 2]> for ValueInput {
    fn from(value: [&str; 2]) -> Self {
        Self::Multiple(value.into_iter().map(DateValue::from).collect())
    }
}

/// Picker granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerMode {
    #[default]
    Date,
    Month,
    Year,
}

impl PickerMode {
    #[must_use]
    pub fn default_format(self) -> &'static str {
        match self {
            Self::Date => "YYYY-MM-DD",
            Self::Month => "YYYY-MM",
            Self::Year => "YYYY",
        }
    }

    #[must_use]
    pub fn default_placeholder(self) -> &'static str {
        match self {
            Self::Date => "Select date",
            Self::Month => "Select month",
            Self::Year => "Select year",
        }
    }

    /// Months moved by one jump click.
    #[must_use]
    pub fn jump_months(self) -> i32 {
        match self {
            Self::Date => 1,
            Self::Month => 12,
            Self::Year => 120,
        }
    }
}

/// Visible year/month of a calendar panel. `month` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cursor {
    pub year: i32,
    pub month: u32,
}

impl Cursor {
    #[must_use]
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.min(11),
        }
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// Adds or subtracts months, rolling the year as needed.
    #[must_use]
    pub fn shifted(self, delta_months: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(delta_months);
        let year = total
            .div_euclid(12)
            .clamp(i64::from(NaiveDate::MIN.year()), i64::from(NaiveDate::MAX.year()));
        Self {
            year: year as i32,
            month: total.rem_euclid(12) as u32,
        }
    }

    /// Replaces the year, clamped to the calendar range of `NaiveDate`.
    #[must_use]
    pub fn with_year(self, year: i32) -> Self {
        Self {
            year: year.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpDirection {
    Back,
    Today,
    Forward,
}

/// Endpoint of a range an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partial {
    #[default]
    Start,
    End,
}

impl Partial {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        if index == 0 { Self::Start } else { Self::End }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

pub(crate) fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(28, |last| last.day())
}
