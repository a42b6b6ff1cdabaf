use std::{
    sync::Arc,
    time::Instant,
};

use chrono::{
    Datelike,
    NaiveDateTime,
};
use serde::Serialize;
use tracing::{
    info,
    warn,
};
use uuid::Uuid;

use super::{
    models::{
        local_datetime,
        OcrResult,
        PopulatedCell,
    },
    KoyomiError,
};
use crate::{
    calendar::{
        CalendarService,
        CellRequest,
        ErrorReason,
        ErroredItem,
        EventRequestBuilder,
        SkippedItem,
    },
    datetime::{
        tokyo_now,
        DateTimeExtractor,
    },
    grid::{
        CalendarGridMapper,
        GridDefinition,
    },
    ocr::TextRecognizer,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredItem {
    pub day: u32,
    pub month: u32,
    pub summary: String,
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportReport {
    pub registered: Vec<RegisteredItem>,
    pub skipped: Vec<SkippedItem>,
    pub errored: Vec<ErroredItem>,
}

impl ImportReport {
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn errored_count(&self) -> usize {
        self.errored.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextImport {
    pub summary: String,
    #[serde(with = "local_datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "local_datetime")]
    pub end: NaiveDateTime,
    pub status: String,
    pub event_id: String,
}

/// OCR, mapping, request building and calendar insertion for one image at a
/// time. Collaborators are injected so tests can swap them.
pub struct CalendarImporter<R, C> {
    recognizer: R,
    calendar: C,
    mapper: CalendarGridMapper,
    extractor: DateTimeExtractor,
    builder: EventRequestBuilder,
}

impl<R: TextRecognizer, C: CalendarService> CalendarImporter<R, C> {
    pub fn new(recognizer: R, calendar: C, grid: Arc<GridDefinition>) -> Self {
        Self {
            recognizer,
            calendar,
            mapper: CalendarGridMapper::new(grid),
            extractor: DateTimeExtractor::new(),
            builder: EventRequestBuilder::new(),
        }
    }

    pub fn grid(&self) -> &GridDefinition {
        self.mapper.grid()
    }

    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, KoyomiError> {
        Ok(self.recognizer.recognize(image).await?)
    }

    /// Cells only, nothing is sent to the calendar.
    pub async fn preview_grid(&self, image: &[u8]) -> Result<Vec<PopulatedCell>, KoyomiError> {
        let result = self.recognize(image).await?;
        Ok(self.mapper.map_response(&result)?)
    }

    pub async fn import_grid(&self, image: &[u8]) -> Result<ImportReport, KoyomiError> {
        self.import_grid_for_year(image, tokyo_now().year()).await
    }

    /// Registers one all-day event per eligible cell. A rejected insert is
    /// recorded and the remaining cells still go through.
    pub async fn import_grid_for_year(
        &self,
        image: &[u8],
        year: i32,
    ) -> Result<ImportReport, KoyomiError> {
        let import_id = Uuid::new_v4();
        let started = Instant::now();

        let cells = self.preview_grid(image).await?;
        let batch = self.builder.from_cells(&cells, year);

        let mut report =
            ImportReport { registered: Vec::new(), skipped: batch.skipped, errored: batch.errored };

        for CellRequest { day, month, request } in batch.requests {
            match self.calendar.insert_event(&request).await {
                Ok(event) => report.registered.push(RegisteredItem {
                    day,
                    month,
                    summary: request.summary,
                    event_id: event.id,
                }),
                Err(e) => {
                    warn!(%import_id, day, month, error = %e, "calendar rejected event");
                    report.errored.push(ErroredItem {
                        day: day.to_string(),
                        month: Some(month),
                        schedule: request.summary,
                        reason: ErrorReason::CalendarRejected,
                        detail: e.to_string(),
                    });
                }
            }
        }

        info!(
            %import_id,
            year,
            registered = report.registered_count(),
            skipped = report.skipped_count(),
            errored = report.errored_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "grid import finished"
        );
        Ok(report)
    }

    pub async fn import_text(&self, image: &[u8]) -> Result<TextImport, KoyomiError> {
        let result = self.recognize(image).await?;
        let text = result.full_text().trim();
        if text.is_empty() {
            warn!("no text recognized, nothing to register");
            return Err(KoyomiError::NoText);
        }
        let candidate = self.extractor.extract(text)?;
        let request = self.builder.from_candidate(&candidate);
        let event = self.calendar.insert_event(&request).await?;

        info!(id = %event.id, start = %candidate.start, "text import finished");
        Ok(TextImport {
            summary: candidate.summary,
            start: candidate.start,
            end: candidate.end,
            status: event.status.unwrap_or_else(|| "confirmed".to_string()),
            event_id: event.id,
        })
    }
}
