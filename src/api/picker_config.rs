use serde::{Deserialize, Serialize};

use crate::core::{FormatEngine, FormatSpec, PickerMode, ValueType};
use crate::error::{PickerError, PickerResult};

/// Public picker bootstrap configuration.
///
/// This type is serializable so hosts can persist/load picker setup without
/// inventing their own format. Collaborators that cannot be serialized
/// (presets, disable-date predicate, clock) are attached on the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    #[serde(default)]
    pub mode: PickerMode,
    /// Display format; the mode default applies when absent.
    #[serde(default)]
    pub format: Option<String>,
    /// Commit encoding; the effective display format applies when absent.
    #[serde(default)]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub enable_time_picker: bool,
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,
    #[serde(default = "default_true")]
    pub allow_input: bool,
    #[serde(default = "default_true")]
    pub clearable: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self::new(PickerMode::Date)
    }
}

impl PickerConfig {
    #[must_use]
    pub fn new(mode: PickerMode) -> Self {
        Self {
            mode,
            format: None,
            value_type: None,
            enable_time_picker: false,
            first_day_of_week: default_first_day_of_week(),
            allow_input: true,
            clearable: true,
            placeholder: None,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_value_type(mut self, value_type: impl Into<ValueType>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    #[must_use]
    pub fn with_time_picker(mut self, enabled: bool) -> Self {
        self.enable_time_picker = enabled;
        self
    }

    #[must_use]
    pub fn with_first_day_of_week(mut self, first_day_of_week: u8) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    #[must_use]
    pub fn with_allow_input(mut self, allow_input: bool) -> Self {
        self.allow_input = allow_input;
        self
    }

    #[must_use]
    pub fn with_clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn display_format(&self) -> &str {
        self.format
            .as_deref()
            .unwrap_or_else(|| self.mode.default_format())
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.placeholder
            .as_deref()
            .unwrap_or_else(|| self.mode.default_placeholder())
    }

    #[must_use]
    pub fn format_spec(&self) -> FormatSpec {
        let display_format = self.display_format();
        let value_type = self.value_type.clone().unwrap_or_else(|| {
            ValueType::Format(crate::core::derive_effective_format(
                display_format,
                self.enable_time_picker,
            ))
        });
        FormatSpec::new(display_format, value_type, self.enable_time_picker)
    }

    #[must_use]
    pub fn format_engine(&self) -> FormatEngine {
        FormatEngine::new(self.format_spec())
    }

    pub fn validate(&self) -> PickerResult<()> {
        if self.display_format().trim().is_empty() {
            return Err(PickerError::InvalidConfig(
                "display format must not be empty".to_owned(),
            ));
        }
        if let Some(ValueType::Format(format)) = &self.value_type {
            if format.trim().is_empty() {
                return Err(PickerError::InvalidConfig(
                    "value type format must not be empty".to_owned(),
                ));
            }
        }
        if !(1..=7).contains(&self.first_day_of_week) {
            return Err(PickerError::InvalidConfig(format!(
                "first day of week must be within 1..=7, got {}",
                self.first_day_of_week
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> PickerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> PickerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn default_first_day_of_week() -> u8 {
    1
}

fn default_true() -> bool {
    true
}
