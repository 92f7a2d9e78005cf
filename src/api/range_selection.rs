use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::{
    Cursor, FormatEngine, Instant, JumpDirection, Partial, ValueInput, companion_cursor, jump,
};

use super::handlers::{FocusContext, InputContext, PickContext};
use super::transition::{DerivedFields, TransitionContext, order_pair, resolve_pair_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangePhase {
    Idle,
    FirstEndpointSelected,
    BothEndpointsSelected,
}

/// Complete state of a date-range picker. Every pair has exactly two slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelectionState {
    pub value: [Option<Instant>; 2],
    pub text_buffer: [String; 2],
    pub cursors: [Cursor; 2],
    pub time_of_day: [String; 2],
    pub active: Partial,
    pub first_click_pending: bool,
    pub popup_visible: bool,
    pub hover_active: bool,
}

impl RangeSelectionState {
    #[must_use]
    pub fn initial(value: [Option<Instant>; 2], ctx: &TransitionContext<'_>) -> Self {
        let today = Cursor::from_date(ctx.today());
        let midnight = ctx.engine.time_text(Instant::from_date(ctx.today()));
        let mut state = Self {
            value: [None, None],
            text_buffer: [String::new(), String::new()],
            cursors: [today, companion_cursor(today, ctx.config.mode)],
            time_of_day: [midnight.clone(), midnight],
            active: Partial::Start,
            first_click_pending: false,
            popup_visible: false,
            hover_active: false,
        };
        state.resync_from_value(value, ctx);
        state
    }

    #[must_use]
    pub fn phase(&self, engine: &FormatEngine) -> RangePhase {
        if !self.first_click_pending {
            return RangePhase::Idle;
        }
        if strict_slots(engine, &self.text_buffer).iter().all(Option::is_some) {
            RangePhase::BothEndpointsSelected
        } else {
            RangePhase::FirstEndpointSelected
        }
    }

    /// Adopts `value`; cursors and times only follow present slots, and the
    /// end panel never shows a month at or before the start panel.
    pub fn resync_from_value(&mut self, value: [Option<Instant>; 2], ctx: &TransitionContext<'_>) {
        self.value = value;
        self.text_buffer = committed_texts(ctx.engine, value);
        if let Some(start) = value[0] {
            self.cursors[0] = Cursor::from_date(start.date());
            self.time_of_day[0] = ctx.engine.time_text(start);
        }
        if let Some(end) = value[1] {
            self.time_of_day[1] = ctx.engine.time_text(end);
            let cursor = Cursor::from_date(end.date());
            self.cursors[1] = if cursor > self.cursors[0] {
                cursor
            } else {
                companion_cursor(self.cursors[0], ctx.config.mode)
            };
        }
    }

    fn apply_derived(&mut self, slot: usize, derived: DerivedFields) {
        let cursor = &mut self.cursors[slot];
        if let Some(year) = derived.year {
            cursor.year = year;
        }
        if let Some(month) = derived.month {
            cursor.month = month;
        }
        if let Some(time_of_day) = derived.time_of_day {
            self.time_of_day[slot] = time_of_day;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RangeEvent {
    CellClick(NaiveDate),
    CellHoverEnter(NaiveDate),
    CellHoverLeave,
    TextChange { partial: Partial, text: String },
    Enter,
    Focus(Partial),
    Blur(Partial),
    Clear,
    Jump { partial: Partial, direction: JumpDirection },
    Confirm,
    Preset(ValueInput),
    TimeChange(String),
    YearChange { partial: Partial, year: i32 },
    /// Zero-based month.
    MonthChange { partial: Partial, month: u32 },
    PopupVisibility(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeEffect {
    /// Both endpoints, already ordered.
    Commit([Option<Instant>; 2]),
    Input(InputContext<[String; 2]>),
    Focus(FocusContext<[String; 2]>),
    Blur(FocusContext<[String; 2]>),
    Pick(NaiveDate, PickContext),
    RequestFocus(Partial),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTransition {
    pub state: RangeSelectionState,
    pub effects: Vec<RangeEffect>,
}

fn committed_texts(engine: &FormatEngine, value: [Option<Instant>; 2]) -> [String; 2] {
    value.map(|slot| engine.display_text(slot))
}

fn strict_slots(engine: &FormatEngine, texts: &[String; 2]) -> [Option<Instant>; 2] {
    [
        engine.parse_text(&texts[0], true),
        engine.parse_text(&texts[1], true),
    ]
}

fn first_invalid(slots: &[Option<Instant>; 2]) -> Option<Partial> {
    slots.iter().position(Option::is_none).map(Partial::from_index)
}

fn both(slots: [Option<Instant>; 2]) -> Option<[Option<Instant>; 2]> {
    slots.iter().all(Option::is_some).then_some(slots)
}

/// Writes the ordered pair into the text slots and queues the commit.
fn commit_pair(
    next: &mut RangeSelectionState,
    effects: &mut Vec<RangeEffect>,
    engine: &FormatEngine,
    pair: [Option<Instant>; 2],
) {
    let ordered = order_pair(pair);
    debug!(start = ?ordered[0], end = ?ordered[1], "commit range");
    next.text_buffer = committed_texts(engine, ordered);
    effects.push(RangeEffect::Commit(ordered));
}

/// Pure transition of a date-range picker.
#[must_use]
pub fn transition(
    state: &RangeSelectionState,
    event: RangeEvent,
    ctx: &TransitionContext<'_>,
) -> RangeTransition {
    let engine = ctx.engine;
    let mut next = state.clone();
    let mut effects = Vec::new();
    let committed = committed_texts(engine, state.value);
    let active = state.active.index();

    match event {
        RangeEvent::CellClick(date) => {
            let instant = ctx.selection_instant(date, &state.time_of_day[active]);
            next.hover_active = false;
            next.text_buffer[active] = engine.display_text(Some(instant));
            effects.push(RangeEffect::Pick(
                date,
                PickContext {
                    partial: state.active,
                },
            ));

            let slots = strict_slots(engine, &next.text_buffer);
            let pending = first_invalid(&slots);
            if ctx.time_enabled() {
                next.active = pending.unwrap_or(state.active);
            } else if pending.is_none() && state.first_click_pending {
                commit_pair(&mut next, &mut effects, engine, slots);
                next.popup_visible = false;
                next.first_click_pending = false;
            } else {
                next.first_click_pending = true;
                next.active = pending.unwrap_or_else(|| state.active.other());
            }
            if next.active != state.active {
                effects.push(RangeEffect::RequestFocus(next.active));
            }
            debug!(%date, active = ?next.active, pending = next.first_click_pending, "range cell click");
        }
        RangeEvent::CellHoverEnter(date) => {
            let instant = ctx.selection_instant(date, &state.time_of_day[active]);
            trace!(%date, "range hover preview");
            next.hover_active = true;
            next.text_buffer[active] = engine.display_text(Some(instant));
        }
        RangeEvent::CellHoverLeave => {
            next.hover_active = false;
            next.text_buffer[active] = committed[active].clone();
        }
        RangeEvent::TextChange { partial, text } => {
            if !ctx.config.allow_input {
                trace!("text input disabled, ignoring edit");
                return RangeTransition {
                    state: next,
                    effects,
                };
            }
            effects.push(RangeEffect::Input(InputContext {
                input: text.clone(),
                value: committed,
                partial: Some(partial),
            }));
            next.text_buffer[partial.index()] = text;
            let scans = [
                engine.parse_text_fields(&next.text_buffer[0]),
                engine.parse_text_fields(&next.text_buffer[1]),
            ];
            if let [Some(start), Some(end)] = scans {
                for (slot, (instant, fields)) in [start, end].into_iter().enumerate() {
                    next.apply_derived(slot, DerivedFields::from_scan(engine, instant, fields));
                }
            }
        }
        RangeEvent::Enter => {
            let typed_valid = state
                .text_buffer
                .iter()
                .all(|text| engine.parse_text(text, false).is_some());
            let committed_valid = state.value.iter().all(Option::is_some);
            if !typed_valid && !committed_valid {
                trace!("enter ignored without any valid range");
                return RangeTransition {
                    state: next,
                    effects,
                };
            }
            next.popup_visible = false;
            match both(strict_slots(engine, &state.text_buffer)) {
                Some(pair) => commit_pair(&mut next, &mut effects, engine, pair),
                None if committed_valid => next.text_buffer = committed,
                None => next.text_buffer = [String::new(), String::new()],
            }
        }
        RangeEvent::Focus(partial) => {
            next.active = partial;
            effects.push(RangeEffect::Focus(FocusContext {
                value: committed,
                partial: Some(partial),
            }));
        }
        RangeEvent::Blur(partial) => {
            let slot = partial.index();
            effects.push(RangeEffect::Blur(FocusContext {
                value: state.text_buffer.clone(),
                partial: Some(partial),
            }));
            if engine.parse_text(&state.text_buffer[slot], true).is_none() {
                next.text_buffer[slot] = committed[slot].clone();
            }
        }
        RangeEvent::Clear => {
            if !ctx.config.clearable {
                trace!("picker not clearable, ignoring clear");
                return RangeTransition {
                    state: next,
                    effects,
                };
            }
            next.popup_visible = false;
            next.first_click_pending = false;
            commit_pair(&mut next, &mut effects, engine, [None, None]);
        }
        RangeEvent::Jump { partial, direction } => {
            let slot = partial.index();
            next.cursors[slot] = jump(state.cursors[slot], ctx.config.mode, direction, ctx.today());
        }
        RangeEvent::Confirm => {
            next.popup_visible = false;
            next.first_click_pending = false;
            match both(strict_slots(engine, &state.text_buffer)) {
                Some(pair) => commit_pair(&mut next, &mut effects, engine, pair),
                None => next.text_buffer = committed,
            }
        }
        RangeEvent::Preset(input) if !matches!(input, ValueInput::Multiple(_)) => {
            warn!(preset = ?input, "skipping range preset that is not a list");
        }
        RangeEvent::Preset(input) => match resolve_pair_input(engine, &input) {
            Ok(pair) => {
                next.popup_visible = false;
                next.first_click_pending = false;
                commit_pair(&mut next, &mut effects, engine, pair);
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed range preset");
            }
        },
        RangeEvent::TimeChange(time_of_day) => {
            let base = ctx.edit_base(&state.text_buffer[active], state.value[active]);
            match engine.merge_time_of_day(base, &time_of_day) {
                Ok(merged) => next.text_buffer[active] = engine.display_text(Some(merged)),
                Err(err) => warn!(error = %err, "keeping text after invalid time selection"),
            }
            next.time_of_day[active] = time_of_day;
        }
        RangeEvent::YearChange { partial, year } => {
            let slot = cursor_slot(state, partial, ctx);
            next.cursors[slot] = state.cursors[slot].with_year(year);
        }
        RangeEvent::MonthChange { partial, month } => {
            let slot = cursor_slot(state, partial, ctx);
            next.cursors[slot].month = month.min(11);
        }
        RangeEvent::PopupVisibility(visible) => {
            if visible && !state.popup_visible {
                next.resync_from_value(state.value, ctx);
                next.first_click_pending = false;
            }
            next.popup_visible = visible;
            next.hover_active = false;
        }
    }

    RangeTransition {
        state: next,
        effects,
    }
}

/// Year/month edits follow the active endpoint while the time sub-picker is
/// shown, otherwise the panel that raised them.
fn cursor_slot(state: &RangeSelectionState, partial: Partial, ctx: &TransitionContext<'_>) -> usize {
    if ctx.time_enabled() {
        state.active.index()
    } else {
        partial.index()
    }
}
