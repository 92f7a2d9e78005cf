//! picker-core: headless date and date-range picker engine.
//!
//! The crate owns the state, formatting and transition logic of a calendar
//! picker; rendering, calendar cell generation and event capture belong to
//! the host. `core` holds the pure date machinery, `api` the configuration
//! and the two controllers.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{DatePickerController, DateRangePickerController, PickerConfig};
pub use error::{PickerError, PickerResult};
