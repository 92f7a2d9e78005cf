use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{
    CalendarGrid, Clock, DayCell, DisableDate, FormatEngine, FormatTarget, FormattedValue,
    GridRequest, Instant, JumpDirection, Partial, ValueInput,
};
use crate::error::PickerResult;

use super::controller_core::ControllerCore;
use super::handlers::DateRangePickerHandler;
use super::presets::Presets;
use super::range_selection::{
    RangeEffect, RangeEvent, RangePhase, RangeSelectionState, transition,
};
use super::transition::{order_pair, resolve_pair_input};
use super::value_store::{Change, ValueStore};
use super::PickerConfig;

type RangeValue = [Option<Instant>; 2];

/// Date-range picker controller with two panels and two text inputs.
pub struct DateRangePickerController {
    core: ControllerCore<RangeValue, dyn DateRangePickerHandler>,
    state: RangeSelectionState,
}

impl std::fmt::Debug for DateRangePickerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("DateRangePickerController");
        self.core.debug_fields(&mut debug);
        debug.field("state", &self.state).finish_non_exhaustive()
    }
}

impl DateRangePickerController {
    pub fn new(config: PickerConfig) -> PickerResult<Self> {
        Self::build(config, ValueStore::owned, &ValueInput::Empty)
    }

    pub fn uncontrolled(config: PickerConfig, default_value: impl Into<ValueInput>) -> PickerResult<Self> {
        Self::build(config, ValueStore::owned, &default_value.into())
    }

    pub fn controlled(config: PickerConfig, value: impl Into<ValueInput>) -> PickerResult<Self> {
        Self::build(config, ValueStore::external, &value.into())
    }

    fn build(
        config: PickerConfig,
        store: impl FnOnce(RangeValue) -> ValueStore<RangeValue>,
        initial: &ValueInput,
    ) -> PickerResult<Self> {
        let core = ControllerCore::new(config, store, initial, mount_value)?;
        let state = RangeSelectionState::initial(core.value(), &core.context());
        Ok(Self { core, state })
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl DateRangePickerHandler + 'static) -> Self {
        self.core.handler = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.core.presets = presets;
        self
    }

    #[must_use]
    pub fn with_disable_date(mut self, disable_date: DisableDate) -> Self {
        self.core.disable_date = Some(disable_date);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.core.clock = Box::new(clock);
        self.state = RangeSelectionState::initial(self.core.value(), &self.core.context());
        self
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.core.config
    }

    #[must_use]
    pub fn engine(&self) -> &FormatEngine {
        &self.core.engine
    }

    #[must_use]
    pub fn state(&self) -> &RangeSelectionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> RangePhase {
        self.state.phase(&self.core.engine)
    }

    #[must_use]
    pub fn value(&self) -> RangeValue {
        self.core.value()
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.core.store.is_controlled()
    }

    #[must_use]
    pub fn presets(&self) -> &Presets {
        &self.core.presets
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.core.config.placeholder()
    }

    pub fn cell_click(&mut self, date: NaiveDate) {
        self.dispatch(RangeEvent::CellClick(date));
    }

    pub fn cell_hover_enter(&mut self, date: NaiveDate) {
        self.dispatch(RangeEvent::CellHoverEnter(date));
    }

    pub fn cell_hover_leave(&mut self) {
        self.dispatch(RangeEvent::CellHoverLeave);
    }

    pub fn text_change(&mut self, partial: Partial, text: impl Into<String>) {
        self.dispatch(RangeEvent::TextChange {
            partial,
            text: text.into(),
        });
    }

    pub fn enter(&mut self) {
        self.dispatch(RangeEvent::Enter);
    }

    pub fn focus(&mut self, partial: Partial) {
        self.dispatch(RangeEvent::Focus(partial));
    }

    pub fn blur(&mut self, partial: Partial) {
        self.dispatch(RangeEvent::Blur(partial));
    }

    pub fn clear(&mut self) {
        self.dispatch(RangeEvent::Clear);
    }

    /// Moves the cursor of the panel tagged `partial`.
    pub fn jump(&mut self, partial: Partial, direction: JumpDirection) {
        self.dispatch(RangeEvent::Jump { partial, direction });
    }

    pub fn confirm(&mut self) {
        self.dispatch(RangeEvent::Confirm);
    }

    pub fn time_change(&mut self, time_of_day: impl Into<String>) {
        self.dispatch(RangeEvent::TimeChange(time_of_day.into()));
    }

    pub fn year_change(&mut self, partial: Partial, year: i32) {
        self.dispatch(RangeEvent::YearChange { partial, year });
    }

    pub fn month_change(&mut self, partial: Partial, month: u32) {
        self.dispatch(RangeEvent::MonthChange { partial, month });
    }

    pub fn set_popup_visible(&mut self, visible: bool) {
        self.dispatch(RangeEvent::PopupVisibility(visible));
    }

    pub fn preset_click(&mut self, label: &str) -> PickerResult<()> {
        let value = self.core.preset_value(label)?;
        self.dispatch(RangeEvent::Preset(value));
        Ok(())
    }

    pub fn apply_preset_value(&mut self, value: impl Into<ValueInput>) {
        self.dispatch(RangeEvent::Preset(value.into()));
    }

    /// Adopts a pair re-supplied by the host of a controlled picker.
    pub fn sync_external_value(&mut self, value: impl Into<ValueInput>) {
        let value = mount_value(&self.core.engine, &value.into());
        if self.core.store.supply(value) {
            let mut state = self.state.clone();
            state.resync_from_value(value, &self.core.context());
            self.state = state;
        }
    }

    /// Grid input for the panel of `partial`.
    #[must_use]
    pub fn grid_request(&self, partial: Partial) -> GridRequest<'_> {
        GridRequest {
            cursor: self.state.cursors[partial.index()],
            mode: self.core.config.mode,
            disable_date: self.core.disable_date.as_ref(),
            first_day_of_week: self.core.config.first_day_of_week,
            selection: self.value().map(|slot| slot.map(Instant::date)),
        }
    }

    #[must_use]
    pub fn cells(&self, partial: Partial, grid: &impl CalendarGrid) -> Vec<DayCell> {
        grid.cells(&self.grid_request(partial))
    }

    pub fn snapshot_json(&self) -> PickerResult<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    fn dispatch(&mut self, event: RangeEvent) {
        let outcome = transition(&self.state, event, &self.core.context());
        self.state = outcome.state;
        for effect in outcome.effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: RangeEffect) {
        match effect {
            RangeEffect::Commit(next) => {
                let change = self.commit(next);
                self.core
                    .notify(|handler| handler.on_change(&change.formatted, change.instants));
            }
            RangeEffect::Input(context) => self.core.notify(|handler| handler.on_input(&context)),
            RangeEffect::Focus(context) => self.core.notify(|handler| handler.on_focus(&context)),
            RangeEffect::Blur(context) => self.core.notify(|handler| handler.on_blur(&context)),
            RangeEffect::Pick(date, context) => {
                self.core.notify(|handler| handler.on_pick(date, context));
            }
            RangeEffect::RequestFocus(partial) => {
                self.core.notify(|handler| handler.on_focus_request(partial));
            }
        }
    }

    /// Commits both endpoints as one update.
    fn commit(&mut self, next: RangeValue) -> Change<[FormattedValue; 2], RangeValue> {
        let next = order_pair(next);
        let formatted = next.map(|slot| {
            slot.map_or(FormattedValue::Empty, |instant| {
                self.core.engine.format_instant(instant, FormatTarget::Value)
            })
        });
        let change = self.core.store.commit(formatted, next);
        if !self.core.store.is_controlled() {
            let mut state = self.state.clone();
            state.resync_from_value(next, &self.core.context());
            self.state = state;
        }
        debug!(formatted = ?change.formatted, "range picker change");
        change
    }
}

fn mount_value(engine: &FormatEngine, input: &ValueInput) -> RangeValue {
    match resolve_pair_input(engine, input) {
        Ok(value) => order_pair(value),
        Err(err) => {
            warn!(error = %err, "treating range value as empty");
            [None, None]
        }
    }
}
