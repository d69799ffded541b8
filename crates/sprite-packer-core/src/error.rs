use std::fmt;

use thiserror::Error;

/// Grid axis named in index/split errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SpritePackerError {
    #[error("Invalid grid capacity: {capacity_x}x{capacity_y} (both must be > 0)")]
    InvalidCapacity { capacity_x: usize, capacity_y: usize },
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },
    #[error("Cannot split {axis} {index} of size {size} into a new part of size {new_size}")]
    InvalidSplit {
        axis: Axis,
        index: usize,
        size: u32,
        new_size: u32,
    },
    #[error("Invalid item #{index}: {width}x{height} (extents must be > 0)")]
    InvalidItem { index: usize, width: u32, height: u32 },
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
    #[error("Search finished without a candidate ({fails} failed trials)")]
    NoCandidate { fails: u32 },
}

pub type Result<T> = std::result::Result<T, SpritePackerError>;
