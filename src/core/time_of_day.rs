use chrono::NaiveTime;

use crate::core::format_pattern::{Meridiem, TextScanner, apply_meridiem};
use crate::core::Instant;
use crate::error::{PickerError, PickerResult};

/// Hour/minute/second/millisecond read from a time sub-picker string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl TimeOfDay {
    /// Parses `H[:m[:s[.SSS]]]` with an optional `AM`/`PM` marker anywhere
    /// around it. Missing components are zero; a meridiem converts the hour
    /// to the 24-hour clock.
    pub fn parse(text: &str) -> PickerResult<Self> {
        let invalid = || PickerError::UnparseableText {
            text: text.to_owned(),
            format: "H:m:s.SSS [A]".to_owned(),
        };

        let (clock, meridiem) = split_meridiem(text.trim());
        let mut scanner = TextScanner::new(clock.trim());
        let hour = scanner.digits(1, 2).ok_or_else(invalid)?;
        let mut minute = 0;
        let mut second = 0;
        let mut millisecond = 0;
        if scanner.eat_if(|byte| byte == b':') {
            minute = scanner.digits(1, 2).ok_or_else(invalid)?;
            if scanner.eat_if(|byte| byte == b':') {
                second = scanner.digits(1, 2).ok_or_else(invalid)?;
                if scanner.eat_if(|byte| byte == b'.') {
                    millisecond = scanner.digits(1, 3).ok_or_else(invalid)?;
                }
            }
        }
        if !scanner.is_done() {
            return Err(invalid());
        }

        let hour = apply_meridiem(hour, meridiem).ok_or_else(invalid)?;
        let parsed = Self {
            hour,
            minute,
            second,
            millisecond,
        };
        parsed.to_naive_time().ok_or_else(invalid)?;
        Ok(parsed)
    }

    #[must_use]
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond)
    }
}

/// Overlays the time of `time_text` onto the date component of `date`.
///
/// The date component of `date` is never changed.
pub fn merge_time_of_day(date: Instant, time_text: &str) -> PickerResult<Instant> {
    let time = TimeOfDay::parse(time_text)?;
    let naive_time = time.to_naive_time().ok_or_else(|| PickerError::UnparseableText {
        text: time_text.to_owned(),
        format: "H:m:s.SSS [A]".to_owned(),
    })?;
    Ok(Instant::new(date.date().and_time(naive_time)))
}

fn split_meridiem(text: &str) -> (&str, Option<Meridiem>) {
    let lower = text.to_ascii_lowercase();
    for (marker, meridiem) in [("am", Meridiem::Am), ("pm", Meridiem::Pm)] {
        if let Some(stripped) = lower.strip_suffix(marker) {
            return (&text[..stripped.len()], Some(meridiem));
        }
        if lower.starts_with(marker) {
            return (&text[marker.len()..], Some(meridiem));
        }
    }
    (text, None)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{TimeOfDay, merge_time_of_day};
    use crate::core::Instant;

    #[test]
    fn parse_applies_meridiem_correction() {
        let pm = TimeOfDay::parse("02:15:00 PM").expect("pm");
        assert_eq!(pm.hour, 14);
        let midnight = TimeOfDay::parse("12:00 am").expect("am");
        assert_eq!(midnight.hour, 0);
        let noon = TimeOfDay::parse("12:00 pm").expect("noon");
        assert_eq!(noon.hour, 12);
    }

    #[test]
    fn parse_rejects_out_of_range_components() {
        assert!(TimeOfDay::parse("25:00:00").is_err());
        assert!(TimeOfDay::parse("10:61").is_err());
        assert!(TimeOfDay::parse("13:00 PM").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
    }

    #[test]
    fn merge_keeps_date_component() {
        let date = Instant::new(
            NaiveDate::from_ymd_opt(2022, 3, 3)
                .expect("date")
                .and_hms_opt(8, 0, 0)
                .expect("time"),
        );
        let merged = merge_time_of_day(date, "14:30:00").expect("merge");
        assert_eq!(merged.date(), date.date());
        assert_eq!(merged.time().to_string(), "14:30:00");
    }
}
