use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use picker_core::api::{
    DatePickerController, DatePickerHandler, FocusContext, InputContext, PickerConfig, Preset,
    Presets, SinglePhase,
};
use picker_core::core::{
    Cursor, DateValue, FixedClock, FormattedValue, Instant, JumpDirection, PickerMode,
    ValueInput,
};

#[derive(Debug, Default)]
struct Recorded {
    changes: Vec<(FormattedValue, Option<Instant>)>,
    inputs: Vec<InputContext<String>>,
    focuses: Vec<FocusContext<String>>,
    blurs: Vec<FocusContext<String>>,
}

#[derive(Clone, Default)]
struct RecordingHandler {
    recorded: Rc<RefCell<Recorded>>,
}

impl DatePickerHandler for RecordingHandler {
    fn on_change(&mut self, value: &FormattedValue, instant: Option<Instant>) {
        self.recorded.borrow_mut().changes.push((value.clone(), instant));
    }

    fn on_input(&mut self, context: &InputContext<String>) {
        self.recorded.borrow_mut().inputs.push(context.clone());
    }

    fn on_focus(&mut self, context: &FocusContext<String>) {
        self.recorded.borrow_mut().focuses.push(context.clone());
    }

    fn on_blur(&mut self, context: &FocusContext<String>) {
        self.recorded.borrow_mut().blurs.push(context.clone());
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Instant {
    let datetime: NaiveDateTime = date(year, month, day)
        .and_hms_opt(hour, minute, second)
        .expect("valid time");
    Instant::new(datetime)
}

fn clock() -> FixedClock {
    FixedClock(at(2024, 6, 15, 10, 0, 0).datetime())
}

fn build_picker(
    config: PickerConfig,
    initial: impl Into<ValueInput>,
) -> (DatePickerController, Rc<RefCell<Recorded>>) {
    let handler = RecordingHandler::default();
    let recorded = handler.recorded.clone();
    let controller = DatePickerController::uncontrolled(config, initial)
        .expect("picker init")
        .with_clock(clock())
        .with_handler(handler);
    (controller, recorded)
}

#[test]
fn typed_text_commits_on_enter() {
    let config = PickerConfig::new(PickerMode::Date).with_format("YYYY-MM-DD");
    let (mut picker, recorded) = build_picker(config, ValueInput::Empty);
    picker.set_popup_visible(true);

    picker.text_change("2022-02-02");
    assert_eq!(picker.state().cursor, Cursor::new(2022, 1));
    picker.enter();

    let recorded = recorded.borrow();
    assert_eq!(
        recorded.changes,
        vec![(
            FormattedValue::Text("2022-02-02".to_owned()),
            Some(Instant::from_date(date(2022, 2, 2)))
        )]
    );
    assert_eq!(recorded.inputs.len(), 1);
    assert_eq!(recorded.inputs[0].input, "2022-02-02");
    assert_eq!(recorded.inputs[0].value, "");
    assert_eq!(picker.state().text_buffer, "2022-02-02");
    assert_eq!(picker.value(), Some(Instant::from_date(date(2022, 2, 2))));
    assert!(!picker.state().popup_visible);
    assert_eq!(picker.phase(), SinglePhase::Idle);
}

#[test]
fn time_selection_merges_onto_clicked_date_and_keeps_popup_open() {
    let config = PickerConfig::new(PickerMode::Date)
        .with_format("YYYY-MM-DD HH:mm:ss")
        .with_time_picker(true);
    let (mut picker, recorded) = build_picker(config, ValueInput::Empty);
    picker.set_popup_visible(true);

    picker.cell_click(date(2022, 3, 3));
    assert!(picker.state().popup_visible);
    assert_eq!(picker.value(), Some(at(2022, 3, 3, 0, 0, 0)));

    picker.time_change("14:30:00");
    assert!(picker.state().popup_visible);
    assert_eq!(picker.state().text_buffer, "2022-03-03 14:30:00");
    assert_eq!(picker.state().time_of_day, "14:30:00");
    assert_eq!(recorded.borrow().changes.len(), 1);

    picker.confirm();
    assert!(!picker.state().popup_visible);
    assert_eq!(picker.value(), Some(at(2022, 3, 3, 14, 30, 0)));
    let recorded = recorded.borrow();
    assert_eq!(
        recorded.changes.last(),
        Some(&(
            FormattedValue::Text("2022-03-03 14:30:00".to_owned()),
            Some(at(2022, 3, 3, 14, 30, 0))
        ))
    );
}

#[test]
fn later_date_click_keeps_selected_time() {
    let config = PickerConfig::new(PickerMode::Date).with_time_picker(true);
    let (mut picker, _recorded) = build_picker(config, "2022-03-03 08:15:00");
    picker.set_popup_visible(true);

    picker.cell_click(date(2022, 3, 9));
    assert_eq!(picker.value(), Some(at(2022, 3, 9, 8, 15, 0)));
    assert_eq!(picker.state().text_buffer, "2022-03-09 08:15:00");
}

#[test]
fn invalid_text_reverts_on_blur_without_change() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    assert_eq!(picker.state().cursor, Cursor::new(2022, 0));

    picker.text_change("2022-13-40");
    assert_eq!(picker.state().text_buffer, "2022-13-40");
    assert_eq!(picker.state().cursor, Cursor::new(2022, 0));
    assert_eq!(picker.phase(), SinglePhase::Editing);

    picker.blur();
    let recorded = recorded.borrow();
    assert!(recorded.changes.is_empty());
    assert_eq!(recorded.blurs.len(), 1);
    assert_eq!(recorded.blurs[0].value, "2022-13-40");
    assert_eq!(picker.state().text_buffer, "2022-01-05");
}

#[test]
fn timestamp_value_type_emits_epoch_millis() {
    let config = PickerConfig::new(PickerMode::Date).with_value_type("timestamp");
    let (mut picker, recorded) = build_picker(config, ValueInput::Empty);

    picker.cell_click(date(2022, 2, 2));

    let recorded = recorded.borrow();
    let (formatted, _) = &recorded.changes[0];
    assert_eq!(formatted.as_timestamp(), Some(1_643_760_000_000));
    assert_eq!(
        serde_json::to_value(formatted).expect("serialize"),
        serde_json::json!(1_643_760_000_000_i64)
    );
    assert_eq!(picker.state().text_buffer, "2022-02-02");
}

#[test]
fn enter_without_any_valid_value_is_noop() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), ValueInput::Empty);
    picker.set_popup_visible(true);

    picker.text_change("not a date");
    picker.enter();

    assert!(picker.state().popup_visible);
    assert_eq!(picker.state().text_buffer, "not a date");
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn enter_with_loose_text_reverts_to_committed_value() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    picker.set_popup_visible(true);

    picker.text_change("2022-2-2");
    picker.enter();

    assert!(!picker.state().popup_visible);
    assert_eq!(picker.state().text_buffer, "2022-01-05");
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn hover_previews_text_without_moving_cursor() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    picker.set_popup_visible(true);
    let cursor = picker.state().cursor;

    picker.cell_hover_enter(date(2022, 2, 20));
    assert!(picker.state().hover_active);
    assert_eq!(picker.state().text_buffer, "2022-02-20");
    assert_eq!(picker.state().cursor, cursor);

    picker.cell_hover_leave();
    assert!(!picker.state().hover_active);
    assert_eq!(picker.state().text_buffer, "2022-01-05");
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn jump_moves_cursor_and_today_reformats_text_only() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");

    picker.jump(JumpDirection::Back);
    assert_eq!(picker.state().cursor, Cursor::new(2021, 11));
    assert_eq!(picker.state().text_buffer, "2022-01-05");

    picker.jump(JumpDirection::Today);
    assert_eq!(picker.state().cursor, Cursor::new(2024, 5));
    assert_eq!(picker.state().text_buffer, "2024-06-05");
    assert_eq!(picker.value(), Some(Instant::from_date(date(2022, 1, 5))));
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn year_mode_jumps_a_decade() {
    let config = PickerConfig::new(PickerMode::Year);
    let (mut picker, _recorded) = build_picker(config, ValueInput::Empty);
    assert_eq!(picker.state().cursor, Cursor::new(2024, 5));

    picker.jump(JumpDirection::Forward);
    assert_eq!(picker.state().cursor, Cursor::new(2034, 5));
    assert_eq!(picker.placeholder(), "Select year");
}

#[test]
fn year_and_month_change_reformat_the_edited_date() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-31");

    picker.month_change(1);
    assert_eq!(picker.state().cursor, Cursor::new(2022, 1));
    assert_eq!(picker.state().text_buffer, "2022-02-28");

    picker.year_change(2020);
    assert_eq!(picker.state().cursor, Cursor::new(2020, 1));
    assert_eq!(picker.state().text_buffer, "2020-02-28");
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn out_of_range_year_is_clamped_before_jumping() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-31");

    picker.year_change(300_000_000);
    picker.jump(JumpDirection::Forward);
    picker.jump(JumpDirection::Back);

    assert_eq!(picker.state().cursor.year, NaiveDate::MAX.year());
    assert_eq!(picker.value(), Some(at(2022, 1, 31, 0, 0, 0)));
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn year_less_format_keeps_cursor_year_and_time() {
    let config = PickerConfig::default()
        .with_format("MM-DD")
        .with_value_type("YYYY-MM-DD HH:mm:ss");
    let (mut picker, _) = build_picker(config, "2022-02-14 09:30:00");
    assert_eq!(picker.state().text_buffer, "02-14");
    assert_eq!(picker.state().cursor, Cursor::new(2022, 1));
    assert_eq!(picker.state().time_of_day, "09:30:00");

    picker.text_change("05-20");

    assert_eq!(picker.state().cursor, Cursor::new(2022, 4));
    assert_eq!(picker.state().time_of_day, "09:30:00");
}

#[test]
fn date_only_edit_keeps_chosen_time_of_day() {
    let config = PickerConfig::default().with_format("YYYY-MM-DD");
    let (mut picker, _) = build_picker(config, "2022-02-14 18:45:00");
    assert_eq!(picker.state().time_of_day, "18:45:00");

    picker.text_change("2023-07-01");

    assert_eq!(picker.state().cursor, Cursor::new(2023, 6));
    assert_eq!(picker.state().time_of_day, "18:45:00");
}

#[test]
fn clear_commits_empty_value_unless_disabled() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    picker.set_popup_visible(true);
    picker.clear();

    assert_eq!(picker.value(), None);
    assert_eq!(picker.state().text_buffer, "");
    assert!(!picker.state().popup_visible);
    assert_eq!(
        recorded.borrow().changes,
        vec![(FormattedValue::Empty, None)]
    );

    let config = PickerConfig::default().with_clearable(false);
    let (mut locked, recorded) = build_picker(config, "2022-01-05");
    locked.clear();
    assert_eq!(locked.value(), Some(Instant::from_date(date(2022, 1, 5))));
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn text_edits_are_ignored_when_input_is_disabled() {
    let config = PickerConfig::default().with_allow_input(false);
    let (mut picker, recorded) = build_picker(config, "2022-01-05");

    picker.text_change("2023-03-03");
    assert_eq!(picker.state().text_buffer, "2022-01-05");
    assert!(recorded.borrow().inputs.is_empty());
}

#[test]
fn presets_commit_literal_and_produced_values() {
    let presets = Presets::new()
        .with("New year", Preset::literal("2022-01-01"))
        .with(
            "Epoch",
            Preset::producer(|| ValueInput::Single(DateValue::Timestamp(0))),
        )
        .with("Broken", Preset::literal(["2022-01-01", "2022-01-02"]));
    let (picker, recorded) = build_picker(PickerConfig::default(), ValueInput::Empty);
    let mut picker = picker.with_presets(presets);
    picker.set_popup_visible(true);

    picker.preset_click("New year").expect("known preset");
    assert!(!picker.state().popup_visible);
    assert_eq!(picker.state().text_buffer, "2022-01-01");

    picker.preset_click("Epoch").expect("known preset");
    assert_eq!(picker.state().text_buffer, "1970-01-01");

    picker.preset_click("Broken").expect("known preset");
    assert_eq!(picker.state().text_buffer, "1970-01-01");
    assert_eq!(recorded.borrow().changes.len(), 2);

    assert!(picker.preset_click("Missing").is_err());
}

#[test]
fn focus_reports_committed_text() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    picker.text_change("2022-01");
    picker.focus();

    let recorded = recorded.borrow();
    assert_eq!(recorded.focuses.len(), 1);
    assert_eq!(recorded.focuses[0].value, "2022-01-05");
    assert_eq!(recorded.focuses[0].partial, None);
}

#[test]
fn reopening_popup_discards_uncommitted_edits() {
    let (mut picker, recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    picker.set_popup_visible(true);
    picker.text_change("2023-07-07");
    assert_eq!(picker.state().cursor, Cursor::new(2023, 6));

    picker.set_popup_visible(false);
    picker.set_popup_visible(true);

    assert_eq!(picker.state().text_buffer, "2022-01-05");
    assert_eq!(picker.state().cursor, Cursor::new(2022, 0));
    assert!(recorded.borrow().changes.is_empty());
}

#[test]
fn controlled_picker_only_notifies_until_value_is_resupplied() {
    let handler = RecordingHandler::default();
    let recorded = handler.recorded.clone();
    let mut picker = DatePickerController::controlled(PickerConfig::default(), "2022-01-05")
        .expect("picker init")
        .with_clock(clock())
        .with_handler(handler);
    assert!(picker.is_controlled());

    picker.cell_click(date(2022, 1, 9));
    assert_eq!(picker.value(), Some(Instant::from_date(date(2022, 1, 5))));
    assert_eq!(recorded.borrow().changes.len(), 1);
    assert_eq!(
        recorded.borrow().changes[0].1,
        Some(Instant::from_date(date(2022, 1, 9)))
    );

    picker.sync_external_value("2022-01-09");
    assert_eq!(picker.value(), Some(Instant::from_date(date(2022, 1, 9))));
    assert_eq!(picker.state().text_buffer, "2022-01-09");

    picker.sync_external_value(ValueInput::Empty);
    assert_eq!(picker.value(), None);
    assert_eq!(picker.state().text_buffer, "");
}

#[test]
fn malformed_mount_value_is_treated_as_empty() {
    let (picker, _recorded) = build_picker(PickerConfig::default(), "garbage");
    assert_eq!(picker.value(), None);
    assert_eq!(picker.state().text_buffer, "");
    assert_eq!(picker.state().cursor, Cursor::new(2024, 5));

    let (list, _recorded) = build_picker(
        PickerConfig::default(),
        ValueInput::from(["2022-01-01", "2022-01-02"]),
    );
    assert_eq!(list.value(), None);
}

#[test]
fn snapshot_serializes_state_as_camel_case_json() {
    let (picker, _recorded) = build_picker(PickerConfig::default(), "2022-01-05");
    let json = picker.snapshot_json().expect("snapshot");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse snapshot");

    assert_eq!(value["textBuffer"], "2022-01-05");
    assert_eq!(value["popupVisible"], false);
    assert_eq!(value["cursor"]["month"], 0);
}
