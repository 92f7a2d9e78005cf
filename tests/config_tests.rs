use picker_core::api::{DatePickerController, DateRangePickerController, PickerConfig};
use picker_core::core::{PickerMode, ValueType};
use picker_core::PickerError;

#[test]
fn json_config_applies_field_defaults() {
    let config = PickerConfig::from_json(r#"{ "mode": "month" }"#).expect("parse config");
    assert_eq!(config.mode, PickerMode::Month);
    assert_eq!(config.format, None);
    assert_eq!(config.first_day_of_week, 1);
    assert!(config.allow_input);
    assert!(config.clearable);
    assert!(!config.enable_time_picker);
    assert_eq!(config.display_format(), "YYYY-MM");
}

#[test]
fn json_config_reads_camel_case_options() {
    let config = PickerConfig::from_json(
        r#"{
            "mode": "date",
            "format": "DD/MM/YYYY",
            "valueType": "timestamp",
            "enableTimePicker": true,
            "firstDayOfWeek": 7,
            "allowInput": false,
            "clearable": false,
            "placeholder": "Pick a day"
        }"#,
    )
    .expect("parse config");

    assert_eq!(config.value_type, Some(ValueType::Timestamp));
    assert_eq!(config.first_day_of_week, 7);
    assert_eq!(config.placeholder(), "Pick a day");
    assert_eq!(config.format_engine().effective_format(), "DD/MM/YYYY HH:mm:ss");
}

#[test]
fn config_json_round_trips() {
    let config = PickerConfig::new(PickerMode::Year)
        .with_format("YYYY")
        .with_value_type("YYYY-MM-DD")
        .with_first_day_of_week(3)
        .with_placeholder("Year");
    let json = config.to_json_pretty().expect("serialize config");
    assert!(json.contains("\"valueType\": \"YYYY-MM-DD\""));
    let restored = PickerConfig::from_json(&json).expect("parse config");
    assert_eq!(restored, config);
}

#[test]
fn invalid_json_and_values_are_rejected() {
    let err = PickerConfig::from_json("{ not json").expect_err("syntax error must fail");
    assert!(matches!(err, PickerError::Serialization(_)));

    let err = PickerConfig::from_json(r#"{ "firstDayOfWeek": 9 }"#)
        .expect_err("week start must fail");
    assert!(matches!(err, PickerError::InvalidConfig(_)));
}

#[test]
fn controllers_refuse_invalid_config() {
    let config = PickerConfig::default().with_value_type("");
    assert!(matches!(
        DatePickerController::new(config.clone()),
        Err(PickerError::InvalidConfig(_))
    ));
    assert!(matches!(
        DateRangePickerController::new(config),
        Err(PickerError::InvalidConfig(_))
    ));
}
