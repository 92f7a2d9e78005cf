use chrono::NaiveDate;
use picker_core::api::{DateRangePickerController, PickerConfig};
use picker_core::core::{FixedClock, JumpDirection, Partial};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Open,
    Close,
    Click(u32),
    Hover(u32),
    Leave,
    Type(bool, String),
    Enter,
    Confirm,
    Clear,
    Blur(bool),
    Jump(bool),
}

fn partial(end: bool) -> Partial {
    if end { Partial::End } else { Partial::Start }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Open),
        Just(Step::Close),
        (1_u32..=28).prop_map(Step::Click),
        (1_u32..=28).prop_map(Step::Hover),
        Just(Step::Leave),
        (any::<bool>(), "(2022-0[1-9]-[0-2][1-9]|[a-z0-9-]{0,10})")
            .prop_map(|(end, text)| Step::Type(end, text)),
        Just(Step::Enter),
        Just(Step::Confirm),
        Just(Step::Clear),
        any::<bool>().prop_map(Step::Blur),
        any::<bool>().prop_map(Step::Jump),
    ]
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 3, d).expect("valid date")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn committed_range_stays_ordered(steps in prop::collection::vec(step_strategy(), 1..40)) {
        let clock = FixedClock(day(15).and_hms_opt(9, 0, 0).expect("valid time"));
        let mut range = DateRangePickerController::new(PickerConfig::default())
            .expect("range init")
            .with_clock(clock);

        for step in steps {
            let reopening = matches!(step, Step::Open) && !range.state().popup_visible;
            match step {
                Step::Open => range.set_popup_visible(true),
                Step::Close => range.set_popup_visible(false),
                Step::Click(d) => range.cell_click(day(d)),
                Step::Hover(d) => range.cell_hover_enter(day(d)),
                Step::Leave => range.cell_hover_leave(),
                Step::Type(end, text) => range.text_change(partial(end), text),
                Step::Enter => range.enter(),
                Step::Confirm => range.confirm(),
                Step::Clear => range.clear(),
                Step::Blur(end) => range.blur(partial(end)),
                Step::Jump(end) => range.jump(partial(end), JumpDirection::Forward),
            }

            if let [Some(start), Some(end)] = range.value() {
                prop_assert!(start <= end);
            }
            let state = range.state();
            prop_assert_eq!(state.value, range.value());
            if reopening {
                let committed = state.value.map(|slot| range.engine().display_text(slot));
                prop_assert_eq!(&state.text_buffer, &committed);
                prop_assert!(!state.first_click_pending);
            }
        }
    }

    #[test]
    fn blur_always_leaves_parseable_or_committed_text(
        end in any::<bool>(),
        text in "[0-9a-z/-]{0,12}",
    ) {
        let mut range = DateRangePickerController::uncontrolled(
            PickerConfig::default(),
            ["2022-03-01", "2022-03-09"],
        )
        .expect("range init");
        let partial = partial(end);
        range.text_change(partial, text);
        range.blur(partial);

        let slot = partial.index();
        let buffer = &range.state().text_buffer[slot];
        let committed = range.engine().display_text(range.value()[slot]);
        prop_assert!(range.engine().parse_text(buffer, true).is_some() || *buffer == committed);
    }
}
