use chrono::{
    Days,
    NaiveDate,
    NaiveDateTime,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::{
    models::{local_datetime, TIME_ZONE},
    EventCandidate,
    PopulatedCell,
};

pub const GRID_DESCRIPTION: &str = "Registered automatically from a calendar photo.";
pub const TEXT_DESCRIPTION: &str = "Registered automatically from recognized text.";

/// Labels that mark header cells rather than days.
const WEEKDAY_SENTINELS: &[&str] = &[
    "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN", "月", "火", "水", "木", "金", "土", "日",
];
const BLANK_DAY: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Date {
        date: NaiveDate,
        #[serde(rename = "timeZone")]
        time_zone: String,
    },
    DateTime {
        #[serde(rename = "dateTime", with = "local_datetime")]
        date_time: NaiveDateTime,
        #[serde(rename = "timeZone")]
        time_zone: String,
    },
}

/// Body of an event-creation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InvalidDate,
    InvalidDayRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    DateConstructionFailed,
    CalendarRejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRequest {
    pub day: u32,
    pub month: u32,
    pub request: EventRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub day: String,
    pub month: Option<u32>,
    pub schedule: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErroredItem {
    pub day: String,
    pub month: Option<u32>,
    pub schedule: String,
    pub reason: ErrorReason,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellBatch {
    pub requests: Vec<CellRequest>,
    pub skipped: Vec<SkippedItem>,
    pub errored: Vec<ErroredItem>,
}

enum CellDecision {
    Ignore,
    Skip(SkipReason),
    Error(String),
    Request(CellRequest),
}

/// Builds event-creation requests. Pure, never talks to the calendar.
#[derive(Debug, Clone)]
pub struct EventRequestBuilder {
    time_zone: String,
}

impl Default for EventRequestBuilder {
    fn default() -> Self {
        Self { time_zone: TIME_ZONE.to_string() }
    }
}

impl EventRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All-day requests for every eligible cell. Days span `[date, date + 1)`.
    pub fn from_cells(&self, cells: &[PopulatedCell], year: i32) -> CellBatch {
        let mut batch = CellBatch::default();

        for cell in cells {
            match self.decide(cell, year) {
                CellDecision::Ignore => {}
                CellDecision::Skip(reason) => {
                    debug!(day = %cell.day, month = ?cell.month, ?reason, "skipping cell");
                    batch.skipped.push(SkippedItem {
                        day: cell.day.clone(),
                        month: cell.month,
                        schedule: cell.schedule.trim().to_string(),
                        reason,
                    });
                }
                CellDecision::Error(detail) => {
                    warn!(day = %cell.day, month = ?cell.month, %detail, "cell has no valid date");
                    batch.errored.push(ErroredItem {
                        day: cell.day.clone(),
                        month: cell.month,
                        schedule: cell.schedule.trim().to_string(),
                        reason: ErrorReason::DateConstructionFailed,
                        detail,
                    });
                }
                CellDecision::Request(request) => batch.requests.push(request),
            }
        }

        batch
    }

    fn decide(&self, cell: &PopulatedCell, year: i32) -> CellDecision {
        let schedule = cell.schedule.trim();
        if schedule.is_empty() {
            return CellDecision::Ignore;
        }

        let day_label = cell.day.trim();
        let Some(month) = cell.month else {
            return CellDecision::Skip(SkipReason::InvalidDate);
        };
        if day_label.is_empty() || day_label == BLANK_DAY || is_weekday_sentinel(day_label) {
            return CellDecision::Skip(SkipReason::InvalidDate);
        }

        let day = match day_label.parse::<u32>() {
            Ok(day) if (1..=31).contains(&day) => day,
            _ => return CellDecision::Skip(SkipReason::InvalidDayRange),
        };

        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return CellDecision::Error(format!("{year}-{month}-{day} does not exist"));
        };
        let Some(next_day) = date.checked_add_days(Days::new(1)) else {
            return CellDecision::Error(format!("{date} has no following day"));
        };

        CellDecision::Request(CellRequest {
            day,
            month,
            request: EventRequest {
                summary: schedule.to_string(),
                description: Some(GRID_DESCRIPTION.to_string()),
                start: EventTime::Date { date, time_zone: self.time_zone.clone() },
                end: EventTime::Date { date: next_day, time_zone: self.time_zone.clone() },
            },
        })
    }

    /// Timed request for a candidate pulled out of free text.
    pub fn from_candidate(&self, candidate: &EventCandidate) -> EventRequest {
        EventRequest {
            summary: candidate.summary.clone(),
            description: Some(TEXT_DESCRIPTION.to_string()),
            start: EventTime::DateTime {
                date_time: candidate.start,
                time_zone: candidate.time_zone.clone(),
            },
            end: EventTime::DateTime {
                date_time: candidate.end,
                time_zone: candidate.time_zone.clone(),
            },
        }
    }
}

fn is_weekday_sentinel(label: &str) -> bool {
    WEEKDAY_SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rectangle;

    fn cell(day: &str, month: Option<u32>, schedule: &str) -> PopulatedCell {
        PopulatedCell {
            day: day.to_string(),
            bounds: Rectangle::new(0.0, 0.0, 0.1, 0.1).unwrap(),
            month,
            schedule: schedule.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_cell_becomes_all_day_request() {
        let batch = EventRequestBuilder::new().from_cells(&[cell("5", Some(3), " 歯医者 ")], 2026);
        assert_eq!(batch.requests.len(), 1);
        assert!(batch.skipped.is_empty() && batch.errored.is_empty());

        let request = &batch.requests[0].request;
        assert_eq!(request.summary, "歯医者");
        assert_eq!(request.description.as_deref(), Some(GRID_DESCRIPTION));
        assert_eq!(
            request.start,
            EventTime::Date { date: date(2026, 3, 5), time_zone: "Asia/Tokyo".to_string() }
        );
        assert_eq!(
            request.end,
            EventTime::Date { date: date(2026, 3, 6), time_zone: "Asia/Tokyo".to_string() }
        );
    }

    #[test]
    fn sentinel_and_out_of_range_days_are_skipped() {
        let cells = [
            cell("0", Some(3), "meeting"),
            cell("32", Some(3), "meeting"),
            cell("MON", Some(3), "meeting"),
            cell("mon", Some(3), "meeting"),
            cell("abc", Some(3), "meeting"),
            cell("7", None, "meeting"),
            cell("", Some(3), "meeting"),
        ];
        let batch = EventRequestBuilder::new().from_cells(&cells, 2026);
        let reasons: Vec<_> = batch.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::InvalidDate,
                SkipReason::InvalidDayRange,
                SkipReason::InvalidDate,
                SkipReason::InvalidDate,
                SkipReason::InvalidDayRange,
                SkipReason::InvalidDate,
                SkipReason::InvalidDate,
            ]
        );
        assert!(batch.requests.is_empty());
        assert_eq!(serde_json::to_value(SkipReason::InvalidDayRange).unwrap(), "invalid_day_range");
    }

    #[test]
    fn empty_schedule_is_silently_excluded() {
        let batch = EventRequestBuilder::new()
            .from_cells(&[cell("5", Some(3), "   "), cell("0", None, "")], 2026);
        assert_eq!(batch, CellBatch::default());
    }

    #[test]
    fn impossible_dates_are_errors_and_processing_continues() {
        let cells = [cell("31", Some(4), "締め切り"), cell("30", Some(2), "x"), cell("1", Some(5), "連休")];
        let batch = EventRequestBuilder::new().from_cells(&cells, 2026);
        assert_eq!(batch.errored.len(), 2);
        assert_eq!(batch.errored[0].reason, ErrorReason::DateConstructionFailed);
        assert_eq!(batch.errored[0].schedule, "締め切り");
        assert_eq!(batch.requests.len(), 1);
        assert_eq!(batch.requests[0].day, 1);
        assert_eq!(batch.requests[0].month, 5);
    }

    #[test]
    fn month_end_rolls_into_next_month() {
        let batch = EventRequestBuilder::new().from_cells(&[cell("31", Some(12), "大晦日")], 2026);
        let request = &batch.requests[0].request;
        assert_eq!(
            request.end,
            EventTime::Date { date: date(2027, 1, 1), time_zone: "Asia/Tokyo".to_string() }
        );
    }

    #[test]
    fn candidate_becomes_timed_request() {
        let start = date(2026, 2, 12).and_hms_opt(17, 0, 0).unwrap();
        let end = date(2026, 2, 12).and_hms_opt(18, 0, 0).unwrap();
        let request = EventRequestBuilder::new().from_candidate(&EventCandidate::new("会議", start, end));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "summary": "会議",
                "description": TEXT_DESCRIPTION,
                "start": { "dateTime": "2026-02-12T17:00:00", "timeZone": "Asia/Tokyo" },
                "end": { "dateTime": "2026-02-12T18:00:00", "timeZone": "Asia/Tokyo" },
            })
        );
    }

    #[test]
    fn all_day_request_wire_shape() {
        let batch = EventRequestBuilder::new().from_cells(&[cell("9", Some(2), "誕生日")], 2026);
        let json = serde_json::to_value(&batch.requests[0].request).unwrap();
        assert_eq!(json["start"], serde_json::json!({ "date": "2026-02-09", "timeZone": "Asia/Tokyo" }));
        assert_eq!(json["end"], serde_json::json!({ "date": "2026-02-10", "timeZone": "Asia/Tokyo" }));
    }
}
