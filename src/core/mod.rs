pub mod errors;
pub mod http;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use errors::KoyomiError;
pub use models::{
    CellDescriptor,
    EventCandidate,
    ImageSize,
    OcrResult,
    PopulatedCell,
    Rectangle,
    TextFragment,
    Vertex,
};
