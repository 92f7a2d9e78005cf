use chrono::DateTime;

use crate::core::format_pattern::{ScannedFields, TextScanner};
use crate::core::Instant;

/// Parses an ISO-like instant without a caller-supplied format.
///
/// Accepts RFC 3339 with an offset (normalized to UTC) and the loose
/// `YYYY[-/]M[-/]D[T ]H:m:s.SSS` family where every part after the year is
/// optional, e.g. `2022`, `2022-2`, `2022/02/02 9:05`, `20220202T101010`.
#[must_use]
pub fn parse_free_form(text: &str) -> Option<Instant> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(Instant::new(datetime.naive_utc()));
    }

    scan_loose(text)?.resolve()
}

fn scan_loose(text: &str) -> Option<ScannedFields> {
    let mut scanner = TextScanner::new(text);
    let mut fields = ScannedFields {
        year: Some(scanner.digits(4, 4)? as i32),
        ..ScannedFields::default()
    };
    let is_date_separator = |byte: u8| byte == b'-' || byte == b'/';

    scanner.eat_if(is_date_separator);
    fields.month = scanner.digits(1, 2);
    scanner.eat_if(is_date_separator);
    fields.day = scanner.digits(1, 2);
    while scanner.eat_if(|byte| byte == b'T' || byte == b't' || byte.is_ascii_whitespace()) {}

    fields.hour = scanner.digits(1, 2);
    scanner.eat_if(|byte| byte == b':');
    fields.minute = scanner.digits(1, 2);
    scanner.eat_if(|byte| byte == b':');
    fields.second = scanner.digits(1, 2);
    scanner.eat_if(|byte| byte == b'.' || byte == b':');

    let fraction = scanner.digit_run();
    if !fraction.is_empty() {
        let millis = fraction
            .iter()
            .chain(std::iter::repeat(&b'0'))
            .take(3)
            .fold(0_u32, |acc, byte| acc * 10 + u32::from(byte - b'0'));
        fields.millisecond = Some(millis);
    }

    scanner.is_done().then_some(fields)
}
