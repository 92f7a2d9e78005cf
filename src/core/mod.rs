pub mod clock;
pub mod format_engine;
pub mod format_pattern;
pub mod free_form;
pub mod grid;
pub mod navigation;
pub mod time_of_day;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use format_engine::{
    DEFAULT_TIME_FORMAT, FormatEngine, FormatInput, FormatOutput, FormatSpec, FormatTarget,
    FormattedValue, TIMESTAMP_VALUE_TYPE, ValueType, derive_effective_format,
    extract_time_format, parse_with_pattern,
};
pub use format_pattern::{FormatPattern, FormatToken, Meridiem, ScannedFields};
pub use free_form::parse_free_form;
pub use grid::{CalendarGrid, DayCell, DisableDate, GridRequest};
pub use navigation::{companion_cursor, jump};
pub use time_of_day::{TimeOfDay, merge_time_of_day};
pub use types::{Cursor, DateValue, Instant, JumpDirection, Partial, PickerMode, ValueInput};
