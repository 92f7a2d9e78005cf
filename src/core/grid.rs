//! Interface of the calendar grid collaborator.
//!
//! Cell generation lives outside this crate; controllers only build the
//! request and hand the returned cells to the host read-only.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{Cursor, PickerMode};

/// Host predicate marking dates as not selectable.
#[derive(Clone)]
pub struct DisableDate(Arc<dyn Fn(NaiveDate) -> bool + Send + Sync>);

impl DisableDate {
    pub fn new(predicate: impl Fn(NaiveDate) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    #[must_use]
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        (self.0)(date)
    }
}

impl fmt::Debug for DisableDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DisableDate(..)")
    }
}

/// Input handed to a [`CalendarGrid`].
#[derive(Debug, Clone)]
pub struct GridRequest<'a> {
    pub cursor: Cursor,
    pub mode: PickerMode,
    pub disable_date: Option<&'a DisableDate>,
    /// 1 = Monday .. 7 = Sunday.
    pub first_day_of_week: u8,
    /// Selection to highlight; a single picker leaves the end slot empty.
    pub selection: [Option<NaiveDate>; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_period: bool,
    pub disabled: bool,
    pub selected: bool,
    pub in_range: bool,
}

/// Pure generator of the day matrix for one panel.
pub trait CalendarGrid {
    fn cells(&self, request: &GridRequest<'_>) -> Vec<DayCell>;
}
