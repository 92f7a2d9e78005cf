use chrono::NaiveDate;

use crate::core::{Cursor, JumpDirection, PickerMode};

/// Moves a calendar cursor by one jump click.
///
/// `Back`/`Forward` step by the mode's jump magnitude; `Today` ignores the
/// current cursor and lands on the month containing `today`.
#[must_use]
pub fn jump(cursor: Cursor, mode: PickerMode, direction: JumpDirection, today: NaiveDate) -> Cursor {
    match direction {
        JumpDirection::Back => cursor.shifted(-mode.jump_months()),
        JumpDirection::Forward => cursor.shifted(mode.jump_months()),
        JumpDirection::Today => Cursor::from_date(today),
    }
}

/// Cursor shown next to `start` in a two-panel range picker.
#[must_use]
pub fn companion_cursor(start: Cursor, mode: PickerMode) -> Cursor {
    start.shifted(mode.jump_months())
}
