use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::core::{DateValue, FormatEngine, Instant, ScannedFields, ValueInput};
use crate::error::{PickerError, PickerResult};

use super::PickerConfig;

/// Read-only inputs of a transition besides the state and the event.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub config: &'a PickerConfig,
    pub engine: &'a FormatEngine,
    pub now: NaiveDateTime,
}

impl TransitionContext<'_> {
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    #[must_use]
    pub fn time_enabled(&self) -> bool {
        self.config.enable_time_picker
    }

    /// Instant selected by clicking `date`, keeping the chosen time of day
    /// when the time sub-picker is enabled.
    #[must_use]
    pub fn selection_instant(&self, date: NaiveDate, time_of_day: &str) -> Instant {
        let date = Instant::from_date(date);
        if !self.time_enabled() {
            return date;
        }
        match self.engine.merge_time_of_day(date, time_of_day) {
            Ok(merged) => merged,
            Err(err) => {
                warn!(error = %err, "keeping midnight for clicked date");
                date
            }
        }
    }

    /// Instant the text buffer currently describes, falling back to the
    /// committed value and then to now.
    #[must_use]
    pub fn edit_base(&self, text: &str, committed: Option<Instant>) -> Instant {
        self.engine
            .parse_text(text, false)
            .or(committed)
            .unwrap_or_else(|| Instant::new(self.now))
    }
}

/// Cursor/time fields re-derived from typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DerivedFields {
    pub year: Option<i32>,
    /// Zero-based.
    pub month: Option<u32>,
    pub time_of_day: Option<String>,
}

impl DerivedFields {
    pub(crate) fn from_scan(engine: &FormatEngine, instant: Instant, fields: ScannedFields) -> Self {
        Self {
            year: fields.year,
            month: fields.month.map(|month| month.saturating_sub(1)),
            time_of_day: fields.has_time().then(|| engine.time_text(instant)),
        }
    }
}

pub(crate) fn resolve_date_value(engine: &FormatEngine, value: &DateValue) -> PickerResult<Option<Instant>> {
    if value.is_blank() {
        return Ok(None);
    }
    engine
        .to_instant(value)
        .map(Some)
        .ok_or_else(|| PickerError::MalformedValue(format!("value: {value:?} is invalid datetime")))
}

pub(crate) fn resolve_single_input(
    engine: &FormatEngine,
    input: &ValueInput,
) -> PickerResult<Option<Instant>> {
    match input {
        ValueInput::Empty => Ok(None),
        ValueInput::Single(value) => resolve_date_value(engine, value),
        ValueInput::Multiple(values) => Err(PickerError::MalformedValue(format!(
            "single picker expects a scalar value, got a list of {}",
            values.len()
        ))),
    }
}

pub(crate) fn resolve_pair_input(
    engine: &FormatEngine,
    input: &ValueInput,
) -> PickerResult<[Option<Instant>; 2]> {
    match input {
        ValueInput::Empty => Ok([None, None]),
        ValueInput::Single(value) => Err(PickerError::MalformedValue(format!(
            "range value must be a list, got {value:?}"
        ))),
        ValueInput::Multiple(values) => {
            if values.len() != 2 {
                warn!(len = values.len(), "normalizing range value to two endpoints");
            }
            let start = values
                .first()
                .map(|value| resolve_date_value(engine, value))
                .transpose()?
                .flatten();
            let end = values
                .get(1)
                .map(|value| resolve_date_value(engine, value))
                .transpose()?
                .flatten();
            Ok([start, end])
        }
    }
}

/// Orders a committed pair so the start never follows the end.
#[must_use]
pub fn order_pair(pair: [Option<Instant>; 2]) -> [Option<Instant>; 2] {
    match pair {
        [Some(start), Some(end)] if start > end => [Some(end), Some(start)],
        other => other,
    }
}
