pub mod extractor;

pub use extractor::{
    default_duration,
    tokyo_now,
    tokyo_offset,
    DateTimeExtractor,
    DateTimeMatcher,
    ExtractError,
};
