use chrono::{
    Duration,
    FixedOffset,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Timelike,
    Utc,
};
use regex::{
    Captures,
    Regex,
};
use thiserror::Error;
use tracing::debug;

use crate::core::{
    utils::NormalizeDigits,
    EventCandidate,
};

// Digit classes take full-width digits as well, so match offsets stay valid
// for the original text and captures are folded before parsing.
const DATE_SLASH: &str = r"([0-9０-９]{4})[/／]([0-9０-９]{1,2})[/／]([0-9０-９]{1,2})";
const DATE_KANJI: &str = r"([0-9０-９]{4})年([0-9０-９]{1,2})月([0-9０-９]{1,2})日";
const TIME: &str = r"([0-9０-９]{1,2})[:：]([0-9０-９]{2})";
const RANGE_SEPARATOR: &str = r"\s*[~～〜\-−ー－]\s*";

const TOKYO_OFFSET_SECS: i32 = 9 * 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{year}-{month}-{day} is not a valid calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("{hour}:{minute:02} is not a valid time of day")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("pattern `{matcher}` matched without capture group {group}")]
    MissingField { matcher: &'static str, group: usize },
}

pub fn default_duration() -> Duration {
    Duration::hours(1)
}

/// Asia/Tokyo has no daylight saving, so a fixed +09:00 offset is exact.
pub fn tokyo_offset() -> FixedOffset {
    FixedOffset::east_opt(TOKYO_OFFSET_SECS).expect("+09:00 is a valid offset")
}

/// Local wall-clock time in Asia/Tokyo, truncated to whole seconds.
pub fn tokyo_now() -> NaiveDateTime {
    let now = Utc::now().with_timezone(&tokyo_offset()).naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    /// Start and end times both captured.
    Explicit,
    /// Only a start time, end falls back to the default duration.
    StartOnly,
}

/// One entry of the priority chain.
#[derive(Debug, Clone)]
pub struct DateTimeMatcher {
    name: &'static str,
    pattern: Regex,
    span: Span,
}

impl DateTimeMatcher {
    fn new(name: &'static str, pattern: &str, span: Span) -> Self {
        let pattern = Regex::new(pattern).expect("date/time patterns are valid");
        Self { name, pattern, span }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `None` when the pattern does not occur in `text`.
    pub fn try_extract(&self, text: &str) -> Option<Result<EventCandidate, ExtractError>> {
        let caps = self.pattern.captures(text)?;
        let matched = caps.get(0)?;

        let mut remainder = String::with_capacity(text.len());
        remainder.push_str(&text[..matched.start()]);
        remainder.push_str(&text[matched.end()..]);
        let summary = remainder.trim().to_string();

        Some(self.instants(&caps).map(|(start, end)| EventCandidate::new(summary, start, end)))
    }

    fn instants(&self, caps: &Captures) -> Result<(NaiveDateTime, NaiveDateTime), ExtractError> {
        let date = self.date(caps)?;
        let start = date.and_time(self.time(caps, 4)?);
        let end = match self.span {
            Span::Explicit => date.and_time(self.time(caps, 6)?),
            Span::StartOnly => start + default_duration(),
        };
        Ok((start, end))
    }

    fn date(&self, caps: &Captures) -> Result<NaiveDate, ExtractError> {
        let year = self.number(caps, 1)? as i32;
        let month = self.number(caps, 2)?;
        let day = self.number(caps, 3)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ExtractError::InvalidDate { year, month, day })
    }

    fn time(&self, caps: &Captures, group: usize) -> Result<NaiveTime, ExtractError> {
        let hour = self.number(caps, group)?;
        let minute = self.number(caps, group + 1)?;
        NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ExtractError::InvalidTime { hour, minute })
    }

    fn number(&self, caps: &Captures, group: usize) -> Result<u32, ExtractError> {
        caps.get(group)
            .and_then(|m| m.as_str().normalize_digits().parse().ok())
            .ok_or(ExtractError::MissingField { matcher: self.name, group })
    }
}

/// Turns a free-text block into (summary, start, end). Matchers are tried in
/// order and the first one that occurs in the text decides the result.
#[derive(Debug, Clone)]
pub struct DateTimeExtractor {
    matchers: Vec<DateTimeMatcher>,
}

impl Default for DateTimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeExtractor {
    pub fn new() -> Self {
        let matchers = vec![
            // "2026/2/12 17:00~18:00"
            DateTimeMatcher::new(
                "slash_date_time_range",
                &format!(r"{DATE_SLASH}\s+{TIME}{RANGE_SEPARATOR}{TIME}"),
                Span::Explicit,
            ),
            // "2026/2/12 17:00"
            DateTimeMatcher::new(
                "slash_date_start_time",
                &format!(r"{DATE_SLASH}\s+{TIME}"),
                Span::StartOnly,
            ),
            // "2026年2月12日 17:00〜18:00"
            DateTimeMatcher::new(
                "kanji_date_time_range",
                &format!(r"{DATE_KANJI}\s*{TIME}{RANGE_SEPARATOR}{TIME}"),
                Span::Explicit,
            ),
        ];
        Self { matchers }
    }

    pub fn matchers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.matchers.iter().map(DateTimeMatcher::name)
    }

    pub fn extract(&self, text: &str) -> Result<EventCandidate, ExtractError> {
        self.extract_at(text, tokyo_now())
    }

    /// `now` is only used when no matcher applies.
    pub fn extract_at(&self, text: &str, now: NaiveDateTime) -> Result<EventCandidate, ExtractError> {
        for matcher in &self.matchers {
            if let Some(result) = matcher.try_extract(text) {
                debug!(matcher = matcher.name(), ok = result.is_ok(), "date/time pattern matched");
                return result;
            }
        }

        debug!("no date/time pattern matched, using current time");
        Ok(EventCandidate::new(text.trim(), now, now + default_duration()))
    }
}
