use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::core::{
    CellDescriptor,
    Rectangle,
};

pub const HEADER_LABEL: &str = "MON";

/// Far beyond any printed calendar, keeps a typo in config from allocating gigabytes.
pub const MAX_UNIFORM_CELLS: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("rectangle {bounds:?} has coordinates outside [0, 1]")]
    OutOfBounds { bounds: [f64; 4] },

    #[error("rectangle {bounds:?} must satisfy x_min < x_max and y_min < y_max")]
    Inverted { bounds: [f64; 4] },

    #[error("grid must contain at least one cell")]
    Empty,

    #[error("header index {index} is out of range for a grid of {len} cells")]
    HeaderOutOfRange { index: usize, len: usize },

    #[error("uniform grid needs at least one row and one column (got {rows}x{cols})")]
    ZeroDimension { rows: u32, cols: u32 },

    #[error("uniform grid of {rows}x{cols} exceeds {max} cells")]
    TooManyCells { rows: u32, cols: u32, max: usize },
}

/// Hand-tuned cells for the printed monthly calendar the service was built
/// for. Print spacing is uneven, neighbouring cells overlap by a few
/// thousandths so handwriting on a border still lands somewhere.
const HAND_TUNED: [(&str, [f64; 4]); 43] = [
    (HEADER_LABEL, [0.030, 0.020, 0.320, 0.150]),
    ("0", [0.034, 0.176, 0.176, 0.322]),
    ("0", [0.170, 0.176, 0.310, 0.322]),
    ("1", [0.304, 0.176, 0.447, 0.322]),
    ("2", [0.441, 0.176, 0.579, 0.322]),
    ("3", [0.573, 0.176, 0.713, 0.322]),
    ("4", [0.707, 0.176, 0.845, 0.322]),
    ("5", [0.839, 0.176, 0.975, 0.322]),
    ("6", [0.034, 0.316, 0.176, 0.457]),
    ("7", [0.170, 0.316, 0.310, 0.457]),
    ("8", [0.304, 0.316, 0.447, 0.457]),
    ("9", [0.441, 0.316, 0.579, 0.457]),
    ("10", [0.573, 0.316, 0.713, 0.457]),
    ("11", [0.707, 0.316, 0.845, 0.457]),
    ("12", [0.839, 0.316, 0.975, 0.457]),
    ("13", [0.034, 0.451, 0.176, 0.594]),
    ("14", [0.170, 0.451, 0.310, 0.594]),
    ("15", [0.304, 0.451, 0.447, 0.594]),
    ("16", [0.441, 0.451, 0.579, 0.594]),
    ("17", [0.573, 0.451, 0.713, 0.594]),
    ("18", [0.707, 0.451, 0.845, 0.594]),
    ("19", [0.839, 0.451, 0.975, 0.594]),
    ("20", [0.034, 0.588, 0.176, 0.729]),
    ("21", [0.170, 0.588, 0.310, 0.729]),
    ("22", [0.304, 0.588, 0.447, 0.729]),
    ("23", [0.441, 0.588, 0.579, 0.729]),
    ("24", [0.573, 0.588, 0.713, 0.729]),
    ("25", [0.707, 0.588, 0.845, 0.729]),
    ("26", [0.839, 0.588, 0.975, 0.729]),
    ("27", [0.034, 0.723, 0.176, 0.863]),
    ("28", [0.170, 0.723, 0.310, 0.863]),
    ("29", [0.304, 0.723, 0.447, 0.863]),
    ("30", [0.441, 0.723, 0.579, 0.863]),
    ("31", [0.573, 0.723, 0.713, 0.863]),
    ("0", [0.707, 0.723, 0.845, 0.863]),
    ("0", [0.839, 0.723, 0.975, 0.863]),
    ("0", [0.034, 0.857, 0.176, 0.990]),
    ("0", [0.170, 0.857, 0.310, 0.990]),
    ("0", [0.304, 0.857, 0.447, 0.990]),
    ("0", [0.441, 0.857, 0.579, 0.990]),
    ("0", [0.573, 0.857, 0.713, 0.990]),
    ("0", [0.707, 0.857, 0.845, 0.990]),
    ("0", [0.839, 0.857, 0.975, 0.990]),
];

fn default_header_index() -> Option<usize> {
    Some(0)
}

/// Parameters for an evenly spaced grid. Days are numbered row-major from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformGrid {
    pub rows: u32,
    pub cols: u32,
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
    /// Optional month header, inserted in front of the day cells.
    pub header: Option<Rectangle>,
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self { rows: 6, cols: 8, x_start: 0.02, x_end: 0.98, y_start: 0.02, y_end: 0.98, header: None }
    }
}

/// How the grid is described in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridLayout {
    #[default]
    HandTuned,
    Explicit {
        cells: Vec<CellDescriptor>,
        #[serde(default = "default_header_index")]
        header_index: Option<usize>,
    },
    Uniform(UniformGrid),
}

/// Ordered, read-only table of calendar cells. Order doubles as the
/// tie-break for points that fall inside more than one rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDefinition {
    cells: Vec<CellDescriptor>,
    header_index: Option<usize>,
}

impl GridDefinition {
    pub fn new(cells: Vec<CellDescriptor>, header_index: Option<usize>) -> Result<Self, GridError> {
        if cells.is_empty() {
            return Err(GridError::Empty);
        }
        if let Some(index) = header_index {
            if index >= cells.len() {
                return Err(GridError::HeaderOutOfRange { index, len: cells.len() });
            }
        }
        // Deserialized rectangles are already checked, hand-built ones may not be.
        for cell in &cells {
            let b = cell.bounds;
            Rectangle::new(b.x_min, b.y_min, b.x_max, b.y_max)?;
        }
        Ok(Self { cells, header_index })
    }

    pub fn from_layout(layout: &GridLayout) -> Result<Self, GridError> {
        match layout {
            GridLayout::HandTuned => Self::hand_tuned(),
            GridLayout::Explicit { cells, header_index } => Self::new(cells.clone(), *header_index),
            GridLayout::Uniform(params) => Self::uniform(params),
        }
    }

    pub fn hand_tuned() -> Result<Self, GridError> {
        let cells = HAND_TUNED
            .iter()
            .map(|(day, b)| Ok(CellDescriptor::new(*day, Rectangle::try_from(*b)?)))
            .collect::<Result<Vec<_>, GridError>>()?;
        Self::new(cells, Some(0))
    }

    pub fn uniform(params: &UniformGrid) -> Result<Self, GridError> {
        if params.rows == 0 || params.cols == 0 {
            return Err(GridError::ZeroDimension { rows: params.rows, cols: params.cols });
        }
        // Validates the outer frame before slicing it up.
        Rectangle::new(params.x_start, params.y_start, params.x_end, params.y_end)?;

        let cell_width = (params.x_end - params.x_start) / params.cols as f64;
        let cell_height = (params.y_end - params.y_start) / params.rows as f64;

        let count = (params.rows as usize)
            .checked_mul(params.cols as usize)
            .filter(|count| *count <= MAX_UNIFORM_CELLS)
            .ok_or(GridError::TooManyCells {
                rows: params.rows,
                cols: params.cols,
                max: MAX_UNIFORM_CELLS,
            })?;
        let mut cells = Vec::with_capacity(count + 1);
        if let Some(header) = params.header {
            cells.push(CellDescriptor::new(HEADER_LABEL, header));
        }

        let mut day_counter = 1;
        for row in 0..params.rows {
            for col in 0..params.cols {
                let x_min = params.x_start + col as f64 * cell_width;
                let y_min = params.y_start + row as f64 * cell_height;
                let bounds = Rectangle::new(
                    round4(x_min),
                    round4(y_min),
                    round4(x_min + cell_width),
                    round4(y_min + cell_height),
                )?;
                cells.push(CellDescriptor::new(day_counter.to_string(), bounds));
                day_counter += 1;
            }
        }

        let header_index = params.header.map(|_| 0);
        Self::new(cells, header_index)
    }

    pub fn cells(&self) -> &[CellDescriptor] {
        &self.cells
    }

    pub fn header_index(&self) -> Option<usize> {
        self.header_index
    }

    pub fn is_header(&self, index: usize) -> bool {
        self.header_index == Some(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Payload for the grid endpoint, serializing to
    /// `[{ "day": .., "box": [..] }, ..]`.
    pub fn to_descriptors(&self) -> Vec<CellDescriptor> {
        self.cells.clone()
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
