use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::{Cursor, Instant, JumpDirection, ValueInput, jump};

use super::handlers::{FocusContext, InputContext};
use super::transition::{DerivedFields, TransitionContext, resolve_single_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SinglePhase {
    Idle,
    Editing,
}

/// Complete state of a single-date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleSelectionState {
    pub value: Option<Instant>,
    pub text_buffer: String,
    pub cursor: Cursor,
    pub time_of_day: String,
    pub popup_visible: bool,
    pub hover_active: bool,
}

impl SingleSelectionState {
    /// Builds the mount state from the committed value.
    #[must_use]
    pub fn initial(value: Option<Instant>, ctx: &TransitionContext<'_>) -> Self {
        let midnight = Instant::from_date(ctx.today());
        let mut state = Self {
            value: None,
            text_buffer: String::new(),
            cursor: Cursor::from_date(ctx.today()),
            time_of_day: ctx.engine.time_text(midnight),
            popup_visible: false,
            hover_active: false,
        };
        state.resync_from_value(value, ctx);
        state
    }

    #[must_use]
    pub fn phase(&self, ctx: &TransitionContext<'_>) -> SinglePhase {
        if self.popup_visible || self.text_buffer != ctx.engine.display_text(self.value) {
            SinglePhase::Editing
        } else {
            SinglePhase::Idle
        }
    }

    /// Adopts `value` and re-derives the text; cursor and time only follow
    /// a present value.
    pub fn resync_from_value(&mut self, value: Option<Instant>, ctx: &TransitionContext<'_>) {
        self.value = value;
        self.text_buffer = ctx.engine.display_text(value);
        if let Some(instant) = value {
            self.cursor = Cursor::from_date(instant.date());
            self.time_of_day = ctx.engine.time_text(instant);
        }
    }

    fn apply_derived(&mut self, derived: DerivedFields) {
        if let Some(year) = derived.year {
            self.cursor.year = year;
        }
        if let Some(month) = derived.month {
            self.cursor.month = month;
        }
        if let Some(time_of_day) = derived.time_of_day {
            self.time_of_day = time_of_day;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SingleEvent {
    CellClick(NaiveDate),
    CellHoverEnter(NaiveDate),
    CellHoverLeave,
    TextChange(String),
    Enter,
    Focus,
    Blur,
    Clear,
    Jump(JumpDirection),
    Confirm,
    /// Preset already resolved by the controller.
    Preset(ValueInput),
    TimeChange(String),
    YearChange(i32),
    /// Zero-based month.
    MonthChange(u32),
    PopupVisibility(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleEffect {
    Commit(Option<Instant>),
    Input(InputContext<String>),
    Focus(FocusContext<String>),
    Blur(FocusContext<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleTransition {
    pub state: SingleSelectionState,
    pub effects: Vec<SingleEffect>,
}

/// Pure transition of a single-date picker.
#[must_use]
pub fn transition(
    state: &SingleSelectionState,
    event: SingleEvent,
    ctx: &TransitionContext<'_>,
) -> SingleTransition {
    let engine = ctx.engine;
    let mut next = state.clone();
    let mut effects = Vec::new();
    let committed_text = engine.display_text(state.value);

    match event {
        SingleEvent::CellClick(date) => {
            let instant = ctx.selection_instant(date, &state.time_of_day);
            debug!(%date, "cell click");
            next.hover_active = false;
            next.text_buffer = engine.display_text(Some(instant));
            effects.push(SingleEffect::Commit(Some(instant)));
            if !ctx.time_enabled() {
                next.popup_visible = false;
            }
        }
        SingleEvent::CellHoverEnter(date) => {
            let instant = ctx.selection_instant(date, &state.time_of_day);
            trace!(%date, "cell hover preview");
            next.hover_active = true;
            next.text_buffer = engine.display_text(Some(instant));
        }
        SingleEvent::CellHoverLeave => {
            next.hover_active = false;
            next.text_buffer = committed_text;
        }
        SingleEvent::TextChange(text) => {
            if !ctx.config.allow_input {
                trace!("text input disabled, ignoring edit");
                return SingleTransition {
                    state: next,
                    effects,
                };
            }
            effects.push(SingleEffect::Input(InputContext {
                input: text.clone(),
                value: committed_text,
                partial: None,
            }));
            next.text_buffer = text;
            if let Some((instant, fields)) = engine.parse_text_fields(&next.text_buffer) {
                next.apply_derived(DerivedFields::from_scan(engine, instant, fields));
            }
        }
        SingleEvent::Enter => {
            let typed_valid = engine.parse_text(&state.text_buffer, false).is_some();
            if !typed_valid && state.value.is_none() {
                trace!("enter ignored without any valid value");
                return SingleTransition {
                    state: next,
                    effects,
                };
            }
            next.popup_visible = false;
            if let Some(instant) = engine.parse_text(&state.text_buffer, true) {
                effects.push(SingleEffect::Commit(Some(instant)));
            } else {
                next.text_buffer = committed_text;
            }
        }
        SingleEvent::Focus => {
            effects.push(SingleEffect::Focus(FocusContext {
                value: committed_text,
                partial: None,
            }));
        }
        SingleEvent::Blur => {
            effects.push(SingleEffect::Blur(FocusContext {
                value: state.text_buffer.clone(),
                partial: None,
            }));
            if engine.parse_text(&state.text_buffer, true).is_none() {
                next.text_buffer = committed_text;
            }
        }
        SingleEvent::Clear => {
            if !ctx.config.clearable {
                trace!("picker not clearable, ignoring clear");
                return SingleTransition {
                    state: next,
                    effects,
                };
            }
            next.popup_visible = false;
            next.text_buffer.clear();
            effects.push(SingleEffect::Commit(None));
        }
        SingleEvent::Jump(direction) => {
            next.cursor = jump(state.cursor, ctx.config.mode, direction, ctx.today());
            if direction == JumpDirection::Today {
                let base = ctx.edit_base(&state.text_buffer, state.value);
                next.text_buffer = engine.display_text(Some(base.with_cursor(next.cursor)));
            }
        }
        SingleEvent::Confirm => {
            next.popup_visible = false;
            if let Some(instant) = engine.parse_text(&state.text_buffer, true) {
                effects.push(SingleEffect::Commit(Some(instant)));
            } else {
                next.text_buffer = committed_text;
            }
        }
        SingleEvent::Preset(input) => match resolve_single_input(engine, &input) {
            Ok(Some(instant)) => {
                next.popup_visible = false;
                next.text_buffer = engine.display_text(Some(instant));
                effects.push(SingleEffect::Commit(Some(instant)));
            }
            Ok(None) => {
                warn!("preset resolved to an empty value, ignoring");
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed preset");
            }
        },
        SingleEvent::TimeChange(time_of_day) => {
            let base = ctx.edit_base(&state.text_buffer, state.value);
            match engine.merge_time_of_day(base, &time_of_day) {
                Ok(merged) => {
                    next.text_buffer = engine.display_text(Some(merged));
                }
                Err(err) => {
                    warn!(error = %err, "keeping text after invalid time selection");
                }
            }
            next.time_of_day = time_of_day;
        }
        SingleEvent::YearChange(year) => {
            next.cursor = state.cursor.with_year(year);
            let base = ctx.edit_base(&state.text_buffer, state.value);
            next.text_buffer = engine.display_text(Some(base.with_cursor(next.cursor)));
        }
        SingleEvent::MonthChange(month) => {
            next.cursor.month = month.min(11);
            let base = ctx.edit_base(&state.text_buffer, state.value);
            next.text_buffer = engine.display_text(Some(base.with_cursor(next.cursor)));
        }
        SingleEvent::PopupVisibility(visible) => {
            if visible && !state.popup_visible {
                next.resync_from_value(state.value, ctx);
            }
            next.popup_visible = visible;
            next.hover_active = false;
        }
    }

    SingleTransition {
        state: next,
        effects,
    }
}
