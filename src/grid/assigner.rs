use tracing::debug;

use super::{
    geometry::resolve_center,
    GridDefinition,
};
use crate::core::{
    ImageSize,
    TextFragment,
};

/// Fragment texts grouped by cell index, in the order they were assigned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellBuckets {
    buckets: Vec<Vec<String>>,
}

impl CellBuckets {
    fn with_cells(len: usize) -> Self {
        Self { buckets: vec![Vec::new(); len] }
    }

    pub fn get(&self, index: usize) -> &[String] {
        self.buckets.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

/// Index of the first cell whose rectangle contains the point.
pub fn locate(grid: &GridDefinition, x: f64, y: f64) -> Option<usize> {
    grid.cells().iter().position(|cell| cell.bounds.contains(x, y))
}

/// Assigns each fragment to at most one cell. The full-text block must already
/// be stripped from `fragments`.
pub fn assign(fragments: &[TextFragment], image: ImageSize, grid: &GridDefinition) -> CellBuckets {
    let mut buckets = CellBuckets::with_cells(grid.len());

    for fragment in fragments {
        let text = fragment.text.trim();
        if text.is_empty() {
            continue;
        }

        let Some((cx, cy)) = resolve_center(&fragment.polygon, image) else {
            debug!(text, "fragment has no resolvable center, skipping");
            continue;
        };

        match locate(grid, cx, cy) {
            Some(index) => buckets.buckets[index].push(text.to_string()),
            None => debug!(text, cx, cy, "fragment is outside every cell"),
        }
    }

    buckets
}
