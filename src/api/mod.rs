mod controller_core;
mod date_picker;
mod date_range_picker;
mod handlers;
mod picker_config;
mod presets;
mod range_selection;
mod single_selection;
mod transition;
mod value_store;

pub use date_picker::DatePickerController;
pub use date_range_picker::DateRangePickerController;
pub use handlers::{
    DatePickerHandler, DateRangePickerHandler, FocusContext, InputContext, PickContext,
};
pub use picker_config::PickerConfig;
pub use presets::{Preset, Presets};
pub use range_selection::{
    RangeEffect, RangeEvent, RangePhase, RangeSelectionState, RangeTransition,
    transition as range_transition,
};
pub use single_selection::{
    SingleEffect, SingleEvent, SinglePhase, SingleSelectionState, SingleTransition,
    transition as single_transition,
};
pub use transition::{TransitionContext, order_pair};
pub use value_store::{Change, ValueSource, ValueStore};
