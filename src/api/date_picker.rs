use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{
    CalendarGrid, Clock, DayCell, DisableDate, FormatEngine, FormatTarget, FormattedValue,
    GridRequest, Instant, JumpDirection, ValueInput,
};
use crate::error::PickerResult;

use super::controller_core::ControllerCore;
use super::handlers::DatePickerHandler;
use super::presets::Presets;
use super::single_selection::{
    SingleEffect, SingleEvent, SinglePhase, SingleSelectionState, transition,
};
use super::transition::resolve_single_input;
use super::value_store::{Change, ValueStore};
use super::PickerConfig;

/// Single-date picker controller.
///
/// Owns the configuration, the value store and the current
/// [`SingleSelectionState`]; every host event is funneled through the pure
/// transition function and the resulting effects are applied here.
pub struct DatePickerController {
    core: ControllerCore<Option<Instant>, dyn DatePickerHandler>,
    state: SingleSelectionState,
}

impl std::fmt::Debug for DatePickerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("DatePickerController");
        self.core.debug_fields(&mut debug);
        debug.field("state", &self.state).finish_non_exhaustive()
    }
}

impl DatePickerController {
    /// Uncontrolled picker starting empty.
    pub fn new(config: PickerConfig) -> PickerResult<Self> {
        Self::build(config, ValueStore::owned, &ValueInput::Empty)
    }

    /// Uncontrolled picker seeded with a default value.
    pub fn uncontrolled(config: PickerConfig, default_value: impl Into<ValueInput>) -> PickerResult<Self> {
        Self::build(config, ValueStore::owned, &default_value.into())
    }

    /// Controlled picker: commits only notify, the host re-supplies the value
    /// through [`Self::sync_external_value`].
    pub fn controlled(config: PickerConfig, value: impl Into<ValueInput>) -> PickerResult<Self> {
        Self::build(config, ValueStore::external, &value.into())
    }

    fn build(
        config: PickerConfig,
        store: impl FnOnce(Option<Instant>) -> ValueStore<Option<Instant>>,
        initial: &ValueInput,
    ) -> PickerResult<Self> {
        let core = ControllerCore::new(config, store, initial, mount_value)?;
        let state = SingleSelectionState::initial(core.value(), &core.context());
        Ok(Self { core, state })
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl DatePickerHandler + 'static) -> Self {
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

    /// Replaces the time source; the cursor of an empty picker moves to the
    /// new clock's month.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.core.clock = Box::new(clock);
        self.state = SingleSelectionState::initial(self.core.value(), &self.core.context());
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
    pub fn state(&self) -> &SingleSelectionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SinglePhase {
        self.state.phase(&self.core.context())
    }

    /// Committed value as held by the store.
    #[must_use]
    pub fn value(&self) -> Option<Instant> {
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
        self.dispatch(SingleEvent::CellClick(date));
    }

    pub fn cell_hover_enter(&mut self, date: NaiveDate) {
        self.dispatch(SingleEvent::CellHoverEnter(date));
    }

    pub fn cell_hover_leave(&mut self) {
        self.dispatch(SingleEvent::CellHoverLeave);
    }

    pub fn text_change(&mut self, text: impl Into<String>) {
        self.dispatch(SingleEvent::TextChange(text.into()));
    }

    pub fn enter(&mut self) {
        self.dispatch(SingleEvent::Enter);
    }

    pub fn focus(&mut self) {
        self.dispatch(SingleEvent::Focus);
    }

    pub fn blur(&mut self) {
        self.dispatch(SingleEvent::Blur);
    }

    pub fn clear(&mut self) {
        self.dispatch(SingleEvent::Clear);
    }

    pub fn jump(&mut self, direction: JumpDirection) {
        self.dispatch(SingleEvent::Jump(direction));
    }

    pub fn confirm(&mut self) {
        self.dispatch(SingleEvent::Confirm);
    }

    pub fn time_change(&mut self, time_of_day: impl Into<String>) {
        self.dispatch(SingleEvent::TimeChange(time_of_day.into()));
    }

    pub fn year_change(&mut self, year: i32) {
        self.dispatch(SingleEvent::YearChange(year));
    }

    pub fn month_change(&mut self, month: u32) {
        self.dispatch(SingleEvent::MonthChange(month));
    }

    pub fn set_popup_visible(&mut self, visible: bool) {
        self.dispatch(SingleEvent::PopupVisibility(visible));
    }

    /// Applies the preset registered under `label`.
    ///
    /// Unknown labels are reported to the caller; malformed preset values
    /// are logged and leave the picker untouched.
    pub fn preset_click(&mut self, label: &str) -> PickerResult<()> {
        let value = self.core.preset_value(label)?;
        self.dispatch(SingleEvent::Preset(value));
        Ok(())
    }

    /// Applies a value that bypasses the registered presets.
    pub fn apply_preset_value(&mut self, value: impl Into<ValueInput>) {
        self.dispatch(SingleEvent::Preset(value.into()));
    }

    /// Adopts a value re-supplied by the host of a controlled picker.
    ///
    /// Pending edits are discarded. Malformed values are logged and treated
    /// as empty.
    pub fn sync_external_value(&mut self, value: impl Into<ValueInput>) {
        let value = mount_value(&self.core.engine, &value.into());
        if self.core.store.supply(value) {
            let mut state = self.state.clone();
            state.resync_from_value(value, &self.core.context());
            self.state = state;
        }
    }

    #[must_use]
    pub fn grid_request(&self) -> GridRequest<'_> {
        GridRequest {
            cursor: self.state.cursor,
            mode: self.core.config.mode,
            disable_date: self.core.disable_date.as_ref(),
            first_day_of_week: self.core.config.first_day_of_week,
            selection: [self.value().map(Instant::date), None],
        }
    }

    #[must_use]
    pub fn cells(&self, grid: &impl CalendarGrid) -> Vec<DayCell> {
        grid.cells(&self.grid_request())
    }

    pub fn snapshot_json(&self) -> PickerResult<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    fn dispatch(&mut self, event: SingleEvent) {
        let outcome = transition(&self.state, event, &self.core.context());
        self.state = outcome.state;
        for effect in outcome.effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: SingleEffect) {
        match effect {
            SingleEffect::Commit(next) => {
                let change = self.commit(next);
                self.core
                    .notify(|handler| handler.on_change(&change.formatted, change.instants));
            }
            SingleEffect::Input(context) => self.core.notify(|handler| handler.on_input(&context)),
            SingleEffect::Focus(context) => self.core.notify(|handler| handler.on_focus(&context)),
            SingleEffect::Blur(context) => self.core.notify(|handler| handler.on_blur(&context)),
        }
    }

    fn commit(&mut self, next: Option<Instant>) -> Change<FormattedValue, Option<Instant>> {
        let formatted = next.map_or(FormattedValue::Empty, |instant| {
            self.core.engine.format_instant(instant, FormatTarget::Value)
        });
        let change = self.core.store.commit(formatted, next);
        if !self.core.store.is_controlled() {
            let mut state = self.state.clone();
            state.resync_from_value(next, &self.core.context());
            self.state = state;
        }
        debug!(formatted = ?change.formatted, "single picker change");
        change
    }
}

fn mount_value(engine: &FormatEngine, input: &ValueInput) -> Option<Instant> {
    match resolve_single_input(engine, input) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "treating picker value as empty");
            None
        }
    }
}
