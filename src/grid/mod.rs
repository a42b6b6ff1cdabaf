pub mod assigner;

pub mod classifier;

pub mod definition;

pub mod geometry;

pub mod mapper;

pub use definition::{
    GridDefinition,
    GridError,
    GridLayout,
    UniformGrid,
    HEADER_LABEL,
};
pub use geometry::GeometryError;
pub use mapper::CalendarGridMapper;

#[cfg(test)]
mod mapper_tests;
