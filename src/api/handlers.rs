use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{FormattedValue, Instant, Partial};

/// Payload of `on_input`: the raw text typed and the committed value text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputContext<V> {
    pub input: String,
    pub value: V,
    pub partial: Option<Partial>,
}

/// Payload of `on_focus`/`on_blur`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusContext<V> {
    pub value: V,
    pub partial: Option<Partial>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickContext {
    pub partial: Partial,
}

/// Host callbacks of a single-date picker. Every hook is optional.
pub trait DatePickerHandler {
    fn on_change(&mut self, _value: &FormattedValue, _instant: Option<Instant>) {}
    fn on_input(&mut self, _context: &InputContext<String>) {}
    fn on_focus(&mut self, _context: &FocusContext<String>) {}
    fn on_blur(&mut self, _context: &FocusContext<String>) {}
}

/// Host callbacks of a date-range picker. Every hook is optional.
pub trait DateRangePickerHandler {
    fn on_change(&mut self, _value: &[FormattedValue; 2], _instants: [Option<Instant>; 2]) {}
    fn on_input(&mut self, _context: &InputContext<[String; 2]>) {}
    fn on_focus(&mut self, _context: &FocusContext<[String; 2]>) {}
    fn on_blur(&mut self, _context: &FocusContext<[String; 2]>) {}
    /// Fired for every cell click, whether or not it commits.
    fn on_pick(&mut self, _date: NaiveDate, _context: PickContext) {}
    /// Asks the host to move keyboard focus to the input of `partial`.
    fn on_focus_request(&mut self, _partial: Partial) {}
}
