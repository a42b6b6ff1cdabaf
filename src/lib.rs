pub mod calendar;
pub mod cli;
pub mod config;
pub mod core;
pub mod datetime;
pub mod grid;
pub mod ocr;
pub mod persistence;

pub use crate::core::{
    pipeline::{
        CalendarImporter,
        ImportReport,
        TextImport,
    },
    KoyomiError,
};
