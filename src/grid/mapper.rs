use std::sync::Arc;

use tracing::debug;

use super::{
    assigner::assign,
    classifier::classify,
    GeometryError,
    GridDefinition,
};
use crate::core::{
    ImageSize,
    OcrResult,
    PopulatedCell,
    TextFragment,
};

/// Runs assignment to completion, then classification.
#[derive(Debug, Clone)]
pub struct CalendarGridMapper {
    grid: Arc<GridDefinition>,
}

impl CalendarGridMapper {
    pub fn new(grid: Arc<GridDefinition>) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridDefinition {
        &self.grid
    }

    /// `fragments` must not include the full-text block.
    pub fn map(
        &self,
        fragments: &[TextFragment],
        image: ImageSize,
    ) -> Result<Vec<PopulatedCell>, GeometryError> {
        image.validate()?;

        let buckets = assign(fragments, image, &self.grid);
        debug!(
            fragments = fragments.len(),
            assigned = buckets.assigned_count(),
            cells = self.grid.len(),
            "assigned fragments to grid"
        );

        Ok(classify(&buckets, &self.grid))
    }

    /// Same as [`map`](Self::map) but takes the raw OCR result and skips its
    /// leading full-text element.
    pub fn map_response(&self, result: &OcrResult) -> Result<Vec<PopulatedCell>, GeometryError> {
        self.map(result.spans(), result.image_size)
    }
}
