use std::fmt::Debug;

use crate::core::{Clock, DisableDate, FormatEngine, SystemClock, ValueInput};
use crate::error::{PickerError, PickerResult};

use super::presets::Presets;
use super::transition::TransitionContext;
use super::value_store::ValueStore;
use super::PickerConfig;

/// Plumbing shared by both controllers: config, formats, value ownership,
/// host callbacks and collaborators.
///
/// `V` is the committed value shape and `H` the handler trait object.
pub(crate) struct ControllerCore<V, H: ?Sized> {
    pub(crate) config: PickerConfig,
    pub(crate) engine: FormatEngine,
    pub(crate) store: ValueStore<V>,
    pub(crate) handler: Option<Box<H>>,
    pub(crate) presets: Presets,
    pub(crate) disable_date: Option<DisableDate>,
    pub(crate) clock: Box<dyn Clock>,
}

impl<V: Copy + Debug + PartialEq, H: ?Sized> ControllerCore<V, H> {
    /// Validates `config` and mounts `initial` through `mount`.
    pub(crate) fn new(
        config: PickerConfig,
        store: impl FnOnce(V) -> ValueStore<V>,
        initial: &ValueInput,
        mount: fn(&FormatEngine, &ValueInput) -> V,
    ) -> PickerResult<Self> {
        config.validate()?;
        let engine = config.format_engine();
        let value = mount(&engine, initial);
        Ok(Self {
            store: store(value),
            config,
            engine,
            handler: None,
            presets: Presets::new(),
            disable_date: None,
            clock: Box::new(SystemClock),
        })
    }

    pub(crate) fn context(&self) -> TransitionContext<'_> {
        TransitionContext {
            config: &self.config,
            engine: &self.engine,
            now: self.clock.now(),
        }
    }

    pub(crate) fn value(&self) -> V {
        *self.store.read()
    }

    /// Resolves the preset registered under `label`.
    pub(crate) fn preset_value(&self, label: &str) -> PickerResult<ValueInput> {
        self.presets
            .get(label)
            .map(|preset| preset.resolve())
            .ok_or_else(|| PickerError::MalformedPreset(format!("no preset labelled `{label}`")))
    }

    /// Runs `notify` against the host handler, if one is attached.
    pub(crate) fn notify(&mut self, notify: impl FnOnce(&mut H)) {
        if let Some(handler) = self.handler.as_deref_mut() {
            notify(handler);
        }
    }

    pub(crate) fn debug_fields(&self, f: &mut std::fmt::DebugStruct<'_, '_>) {
        f.field("config", &self.config)
            .field("store", &self.store)
            .field("presets", &self.presets)
            .field("has_handler", &self.handler.is_some());
    }
}
