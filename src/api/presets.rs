use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::ValueInput;

/// Shortcut offered next to the calendar: a literal value or a producer
/// evaluated at click time.
#[derive(Clone)]
pub enum Preset {
    Literal(ValueInput),
    Producer(Arc<dyn Fn() -> ValueInput + Send + Sync>),
}

impl Preset {
    pub fn literal(value: impl Into<ValueInput>) -> Self {
        Self::Literal(value.into())
    }

    pub fn producer(producer: impl Fn() -> ValueInput + Send + Sync + 'static) -> Self {
        Self::Producer(Arc::new(producer))
    }

    #[must_use]
    pub fn resolve(&self) -> ValueInput {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Label → preset, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Presets {
    entries: IndexMap<String, Preset>,
}

impl Presets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, label: impl Into<String>, preset: Preset) -> Self {
        self.insert(label, preset);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, preset: Preset) {
        self.entries.insert(label.into(), preset);
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Preset> {
        self.entries.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
