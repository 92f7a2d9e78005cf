use serde::{Deserialize, Serialize, Serializer};
use tracing::error;

use crate::core::format_pattern::{FormatPattern, ScannedFields};
use crate::core::free_form::parse_free_form;
use crate::core::time_of_day::merge_time_of_day;
use crate::core::{DateValue, Instant};
use crate::error::PickerResult;

pub const DEFAULT_TIME_FORMAT: &str = "HH:mm:ss";
pub const TIMESTAMP_VALUE_TYPE: &str = "timestamp";

/// Encoding of committed values handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// Epoch milliseconds.
    Timestamp,
    Format(String),
}

impl From<String> for ValueType {
    fn from(value: String) -> Self {
        if value == TIMESTAMP_VALUE_TYPE {
            Self::Timestamp
        } else {
            Self::Format(value)
        }
    }
}

impl From<&str> for ValueType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::Timestamp => TIMESTAMP_VALUE_TYPE.to_owned(),
            ValueType::Format(format) => format,
        }
    }
}

/// Formatted scalar. `Empty` is the total-failure/no-value result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormattedValue {
    #[default]
    Empty,
    Text(String),
    Timestamp(i64),
}

impl FormattedValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Self::Timestamp(millis) => Some(*millis),
            _ => None,
        }
    }
}

impl Serialize for FormattedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Timestamp(millis) => serializer.serialize_i64(*millis),
        }
    }
}

/// Scalar or list value accepted by [`FormatEngine::format`].
#[derive(Debug, Clone, Copy)]
pub enum FormatInput<'a> {
    Single(&'a DateValue),
    Range(&'a [DateValue]),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormatOutput {
    Single(FormattedValue),
    /// Empty when any element failed.
    Range(Vec<FormattedValue>),
}

/// Which of the negotiated formats a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTarget {
    Display,
    Value,
}

/// Negotiated display/value formats of one picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub display_format: String,
    pub value_type: ValueType,
    pub time_sub_format: String,
    pub time_enabled: bool,
}

impl FormatSpec {
    #[must_use]
    pub fn new(display_format: &str, value_type: ValueType, time_enabled: bool) -> Self {
        Self {
            display_format: display_format.to_owned(),
            value_type,
            time_sub_format: extract_time_format(display_format)
                .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_owned()),
            time_enabled,
        }
    }
}

/// Time-only part of a combined format, `None` when it has no time tokens.
#[must_use]
pub fn extract_time_format(full_format: &str) -> Option<String> {
    FormatPattern::compile(full_format)
        .time_section()
        .map(str::to_owned)
}

/// Display format with ` HH:mm:ss` appended when time selection is enabled
/// but the format carries no time tokens.
#[must_use]
pub fn derive_effective_format(display_format: &str, time_enabled: bool) -> String {
    if time_enabled && extract_time_format(display_format).is_none() {
        format!("{display_format} {DEFAULT_TIME_FORMAT}")
    } else {
        display_format.to_owned()
    }
}

/// Parses `text` against `pattern`.
///
/// Strict parsing additionally requires the text to be exactly what the
/// pattern renders for the parsed instant, so `2022-2-2` fails `YYYY-MM-DD`.
#[must_use]
pub fn parse_with_pattern(text: &str, pattern: &FormatPattern, strict: bool) -> Option<Instant> {
    let instant = pattern.scan(text)?.resolve()?;
    if strict && pattern.render(instant) != text {
        return None;
    }
    Some(instant)
}

/// Format negotiation, parsing and validation for one picker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEngine {
    spec: FormatSpec,
    effective: FormatPattern,
    value_pattern: Option<FormatPattern>,
    time_pattern: FormatPattern,
}

impl FormatEngine {
    #[must_use]
    pub fn new(spec: FormatSpec) -> Self {
        let effective =
            FormatPattern::compile(&derive_effective_format(&spec.display_format, spec.time_enabled));
        let value_pattern = match &spec.value_type {
            ValueType::Timestamp => None,
            ValueType::Format(format) => Some(FormatPattern::compile(format)),
        };
        let time_pattern = FormatPattern::compile(&spec.time_sub_format);
        Self {
            spec,
            effective,
            value_pattern,
            time_pattern,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &FormatSpec {
        &self.spec
    }

    #[must_use]
    pub fn effective_format(&self) -> &str {
        self.effective.source()
    }

    #[must_use]
    pub fn time_format(&self) -> &str {
        self.time_pattern.source()
    }

    /// Parses `text` against an arbitrary `format`.
    ///
    /// Non-strict parsing tries the free-form ISO-like reading first.
    #[must_use]
    pub fn parse(&self, text: &str, format: &str, strict: bool) -> Option<Instant> {
        if !strict {
            if let Some(instant) = parse_free_form(text) {
                return Some(instant);
            }
        }
        parse_with_pattern(text, &FormatPattern::compile(format), strict)
    }

    /// Parses text typed into the picker input against the effective format.
    #[must_use]
    pub fn parse_text(&self, text: &str, strict: bool) -> Option<Instant> {
        if !strict {
            if let Some(instant) = parse_free_form(text) {
                return Some(instant);
            }
        }
        parse_with_pattern(text, &self.effective, strict)
    }

    /// Strictly parses text against the effective format and reports which
    /// fields the format actually produced.
    #[must_use]
    pub fn parse_text_fields(&self, text: &str) -> Option<(Instant, ScannedFields)> {
        let fields = self.effective.scan(text)?;
        let instant = fields.resolve()?;
        (self.effective.render(instant) == text).then_some((instant, fields))
    }

    /// Resolves any host-supplied representation into an instant.
    #[must_use]
    pub fn to_instant(&self, value: &DateValue) -> Option<Instant> {
        match value {
            DateValue::Timestamp(millis) => Instant::from_timestamp_millis(*millis),
            DateValue::DateTime(datetime) => Some(Instant::new(*datetime)),
            DateValue::Text(text) => self.parse_text(text, false),
        }
    }

    #[must_use]
    pub fn display_text(&self, instant: Option<Instant>) -> String {
        instant.map_or_else(String::new, |instant| self.effective.render(instant))
    }

    #[must_use]
    pub fn time_text(&self, instant: Instant) -> String {
        self.time_pattern.render(instant)
    }

    #[must_use]
    pub fn format_instant(&self, instant: Instant, target: FormatTarget) -> FormattedValue {
        match target {
            FormatTarget::Display => FormattedValue::Text(self.effective.render(instant)),
            FormatTarget::Value => match &self.value_pattern {
                None => FormattedValue::Timestamp(instant.timestamp_millis()),
                Some(pattern) => FormattedValue::Text(pattern.render(instant)),
            },
        }
    }

    /// Formats a scalar or a list element-wise.
    ///
    /// Any element that cannot be resolved fails the whole call: a
    /// diagnostic is logged and the result is `Empty` / an empty list.
    #[must_use]
    pub fn format(&self, value: FormatInput<'_>, target: FormatTarget) -> FormatOutput {
        match value {
            FormatInput::Single(value) if value.is_blank() => {
                FormatOutput::Single(FormattedValue::Empty)
            }
            FormatInput::Single(value) => match self.to_instant(value) {
                Some(instant) => FormatOutput::Single(self.format_instant(instant, target)),
                None => {
                    self.report_format_failure(&format!("{value:?}"));
                    FormatOutput::Single(FormattedValue::Empty)
                }
            },
            FormatInput::Range(values) => {
                let formatted: Option<Vec<FormattedValue>> = values
                    .iter()
                    .map(|value| {
                        self.to_instant(value)
                            .map(|instant| self.format_instant(instant, target))
                    })
                    .collect();
                match formatted {
                    Some(formatted) => FormatOutput::Range(formatted),
                    None => {
                        self.report_format_failure(&format!("{values:?}"));
                        FormatOutput::Range(Vec::new())
                    }
                }
            }
        }
    }

    /// Overlays `time_text` onto the date component of `date`.
    pub fn merge_time_of_day(&self, date: Instant, time_text: &str) -> PickerResult<Instant> {
        merge_time_of_day(date, time_text)
    }

    /// Validity of a scalar or of every list element.
    ///
    /// Without `format`, only the free-form reading (and native/timestamp
    /// values) count as valid.
    #[must_use]
    pub fn is_valid(&self, value: FormatInput<'_>, format: Option<&str>, strict: bool) -> bool {
        let check = |value: &DateValue| match (value, format) {
            (DateValue::Text(text), Some(format)) => self.parse(text, format, strict).is_some(),
            (DateValue::Text(text), None) => parse_free_form(text).is_some(),
            (other, _) => self.to_instant(other).is_some(),
        };
        match value {
            FormatInput::Single(value) => check(value),
            FormatInput::Range(values) => values.iter().all(check),
        }
    }

    fn report_format_failure(&self, value: &str) {
        let value_type: String = self.spec.value_type.clone().into();
        error!(
            format = %self.spec.display_format,
            value_type = %value_type,
            value = %value,
            "check that format, valueType and value are valid"
        );
    }
}
