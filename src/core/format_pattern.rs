use std::fmt::Write as _;
use std::ops::Range;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::core::Instant;

/// Single token of a display/value format string.
///
/// Supported tokens: `YYYY YY MM M DD D HH H hh h mm m ss s SSS A a`.
/// Text inside `[...]` and any other character is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Year4,
    Year2,
    Month2,
    Month1,
    Day2,
    Day1,
    Hour24Padded,
    Hour24,
    Hour12Padded,
    Hour12,
    Minute2,
    Minute1,
    Second2,
    Second1,
    Millis3,
    MeridiemUpper,
    MeridiemLower,
    Literal(String),
}

impl FormatToken {
    #[must_use]
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            Self::Hour24Padded
                | Self::Hour24
                | Self::Hour12Padded
                | Self::Hour12
                | Self::Minute2
                | Self::Minute1
                | Self::Second2
                | Self::Second1
                | Self::Millis3
                | Self::MeridiemUpper
                | Self::MeridiemLower
        )
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            Self::Year4 | Self::Year2 | Self::Month2 | Self::Month1 | Self::Day2 | Self::Day1
        )
    }
}

/// Token names, longest first within each letter so `YYYY` wins over `YY`.
const TOKEN_NAMES: &[&str] = &[
    "YYYY", "YY", "MM", "M", "DD", "D", "HH", "H", "hh", "h", "mm", "m", "ss", "s", "SSS", "A",
    "a",
];

fn token_for(name: &str) -> FormatToken {
    match name {
        "YYYY" => FormatToken::Year4,
        "YY" => FormatToken::Year2,
        "MM" => FormatToken::Month2,
        "M" => FormatToken::Month1,
        "DD" => FormatToken::Day2,
        "D" => FormatToken::Day1,
        "HH" => FormatToken::Hour24Padded,
        "H" => FormatToken::Hour24,
        "hh" => FormatToken::Hour12Padded,
        "h" => FormatToken::Hour12,
        "mm" => FormatToken::Minute2,
        "m" => FormatToken::Minute1,
        "ss" => FormatToken::Second2,
        "s" => FormatToken::Second1,
        "SSS" => FormatToken::Millis3,
        "A" => FormatToken::MeridiemUpper,
        "a" => FormatToken::MeridiemLower,
        other => FormatToken::Literal(other.to_owned()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Fields recovered from text, `None` when the format never mentions them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScannedFields {
    pub year: Option<i32>,
    /// One-based month.
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub millisecond: Option<u32>,
    pub meridiem: Option<Meridiem>,
}

impl ScannedFields {
    #[must_use]
    pub fn has_time(&self) -> bool {
        self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
            || self.millisecond.is_some()
    }

    /// Builds a date-time; missing date fields fall back to 1970-01-01 and
    /// missing time fields to zero.
    #[must_use]
    pub fn resolve(&self) -> Option<Instant> {
        let date = NaiveDate::from_ymd_opt(
            self.year.unwrap_or(1970),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
        )?;
        let hour = apply_meridiem(self.hour.unwrap_or(0), self.meridiem)?;
        let time = NaiveTime::from_hms_milli_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.millisecond.unwrap_or(0),
        )?;
        Some(Instant::new(NaiveDateTime::new(date, time)))
    }
}

pub(crate) fn apply_meridiem(hour: u32, meridiem: Option<Meridiem>) -> Option<u32> {
    match meridiem {
        None => Some(hour),
        Some(_) if hour == 0 || hour > 12 => None,
        Some(Meridiem::Am) => Some(hour % 12),
        Some(Meridiem::Pm) => Some(hour % 12 + 12),
    }
}

/// Compiled format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    tokens: Vec<(FormatToken, Range<usize>)>,
}

impl FormatPattern {
    #[must_use]
    pub fn compile(source: &str) -> Self {
        let mut tokens: Vec<(FormatToken, Range<usize>)> = Vec::new();
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];

            if let Some(stripped) = rest.strip_prefix('[') {
                if let Some(close) = stripped.find(']') {
                    let end = pos + 1 + close + 1;
                    push_literal(&mut tokens, &stripped[..close], pos..end);
                    pos = end;
                    continue;
                }
            }

            if let Some(name) = TOKEN_NAMES.iter().find(|name| rest.starts_with(**name)) {
                let end = pos + name.len();
                tokens.push((token_for(name), pos..end));
                pos = end;
                continue;
            }

            let ch_len = rest.chars().next().map_or(1, char::len_utf8);
            let end = pos + ch_len;
            push_literal(&mut tokens, &source[pos..end], pos..end);
            pos = end;
        }

        Self {
            source: source.to_owned(),
            tokens,
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> impl Iterator<Item = &FormatToken> {
        self.tokens.iter().map(|(token, _)| token)
    }

    #[must_use]
    pub fn has_time_tokens(&self) -> bool {
        self.tokens().any(FormatToken::is_time)
    }

    /// Substring from the first to the last time token, inclusive.
    #[must_use]
    pub fn time_section(&self) -> Option<&str> {
        let first = self.tokens.iter().find(|(token, _)| token.is_time())?;
        let last = self.tokens.iter().rev().find(|(token, _)| token.is_time())?;
        Some(&self.source[first.1.start..last.1.end])
    }

    #[must_use]
    pub fn render(&self, instant: Instant) -> String {
        let datetime = instant.datetime();
        let mut out = String::with_capacity(self.source.len() + 4);
        for (token, _) in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match token {
                FormatToken::Year4 => write!(out, "{:04}", datetime.year()),
                FormatToken::Year2 => write!(out, "{:02}", datetime.year().rem_euclid(100)),
                FormatToken::Month2 => write!(out, "{:02}", datetime.month()),
                FormatToken::Month1 => write!(out, "{}", datetime.month()),
                FormatToken::Day2 => write!(out, "{:02}", datetime.day()),
                FormatToken::Day1 => write!(out, "{}", datetime.day()),
                FormatToken::Hour24Padded => write!(out, "{:02}", datetime.hour()),
                FormatToken::Hour24 => write!(out, "{}", datetime.hour()),
                FormatToken::Hour12Padded => write!(out, "{:02}", datetime.hour12().1),
                FormatToken::Hour12 => write!(out, "{}", datetime.hour12().1),
                FormatToken::Minute2 => write!(out, "{:02}", datetime.minute()),
                FormatToken::Minute1 => write!(out, "{}", datetime.minute()),
                FormatToken::Second2 => write!(out, "{:02}", datetime.second()),
                FormatToken::Second1 => write!(out, "{}", datetime.second()),
                FormatToken::Millis3 => {
                    write!(out, "{:03}", datetime.nanosecond() / 1_000_000 % 1000)
                }
                FormatToken::MeridiemUpper => {
                    out.push_str(if datetime.hour12().0 { "PM" } else { "AM" });
                    Ok(())
                }
                FormatToken::MeridiemLower => {
                    out.push_str(if datetime.hour12().0 { "pm" } else { "am" });
                    Ok(())
                }
                FormatToken::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
            };
        }
        out
    }

    /// Reads fields from `text` token by token.
    ///
    /// Literals must match exactly; trailing whitespace is ignored. Returns
    /// `None` as soon as the text stops following the pattern.
    #[must_use]
    pub fn scan(&self, text: &str) -> Option<ScannedFields> {
        let mut scanner = TextScanner::new(text.trim_end());
        let mut fields = ScannedFields::default();

        for (token, _) in &self.tokens {
            match token {
                FormatToken::Year4 => fields.year = Some(scanner.digits(4, 4)? as i32),
                FormatToken::Year2 => {
                    let short = scanner.digits(2, 2)? as i32;
                    fields.year = Some(short + if short > 68 { 1900 } else { 2000 });
                }
                FormatToken::Month2 => fields.month = Some(scanner.digits(2, 2)?),
                FormatToken::Month1 => fields.month = Some(scanner.digits(1, 2)?),
                FormatToken::Day2 => fields.day = Some(scanner.digits(2, 2)?),
                FormatToken::Day1 => fields.day = Some(scanner.digits(1, 2)?),
                FormatToken::Hour24Padded
                | FormatToken::Hour24
                | FormatToken::Hour12Padded
                | FormatToken::Hour12 => fields.hour = Some(scanner.digits(1, 2)?),
                FormatToken::Minute2 | FormatToken::Minute1 => {
                    fields.minute = Some(scanner.digits(1, 2)?);
                }
                FormatToken::Second2 | FormatToken::Second1 => {
                    fields.second = Some(scanner.digits(1, 2)?);
                }
                FormatToken::Millis3 => fields.millisecond = Some(scanner.digits(3, 3)?),
                FormatToken::MeridiemUpper | FormatToken::MeridiemLower => {
                    fields.meridiem = Some(scanner.meridiem()?);
                }
                FormatToken::Literal(literal) => scanner.literal(literal)?,
            }
        }

        scanner.is_done().then_some(fields)
    }
}

fn push_literal(tokens: &mut Vec<(FormatToken, Range<usize>)>, text: &str, span: Range<usize>) {
    if let Some((FormatToken::Literal(previous), previous_span)) = tokens.last_mut() {
        if previous_span.end == span.start {
            previous.push_str(text);
            previous_span.end = span.end;
            return;
        }
    }
    tokens.push((FormatToken::Literal(text.to_owned()), span));
}

/// Byte cursor over ASCII-oriented date text.
pub(crate) struct TextScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TextScanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consumes between `min` and `max` ASCII digits.
    pub(crate) fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while self.pos - start < max {
            match self.peek() {
                Some(byte) if byte.is_ascii_digit() => {
                    value = value * 10 + u32::from(byte - b'0');
                    self.pos += 1;
                }
                _ => break,
            }
        }
        (self.pos - start >= min).then_some(value)
    }

    /// Consumes every remaining digit and returns them as text.
    pub(crate) fn digit_run(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    pub(crate) fn eat_if(&mut self, accept: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(byte) if accept(byte) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn literal(&mut self, literal: &str) -> Option<()> {
        let literal = literal.as_bytes();
        let end = self.pos + literal.len();
        if self.bytes.get(self.pos..end) == Some(literal) {
            self.pos = end;
            Some(())
        } else {
            None
        }
    }

    pub(crate) fn meridiem(&mut self) -> Option<Meridiem> {
        let pair = self.bytes.get(self.pos..self.pos + 2)?;
        let meridiem = match pair.to_ascii_lowercase().as_slice() {
            b"am" => Meridiem::Am,
            b"pm" => Meridiem::Pm,
            _ => return None,
        };
        self.pos += 2;
        Some(meridiem)
    }
}
