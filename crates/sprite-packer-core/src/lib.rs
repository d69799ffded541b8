//! Core engine for packing rectangular items into a single sprite sheet.
//!
//! - Mappers: HorizontalOnly, VerticalOnly, Optimal (iterative minimal-area search)
//! - `Canvas`: leftmost-then-lowest free-space tracker backed by a `ResizableGrid`
//! - `map_items` takes sized items and returns placements plus the bounding box;
//!   rasterizing and stylesheet generation are left to the caller.
//!
//! Quick example:
//! ```
//! use sprite_packer_core::{Item, MapperConfig, MapperKind, map_items};
//! # fn main() -> sprite_packer_core::Result<()> {
//! let items = vec![Item::new(10, 10, "a"), Item::new(10, 10, "b")];
//! let cfg = MapperConfig { kind: MapperKind::Optimal, ..Default::default() };
//! let out = map_items(&items, &cfg)?;
//! assert_eq!((out.width, out.height), (20, 10));
//! # Ok(()) }
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod mapper;
pub mod model;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use mapper::*;
pub use model::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::canvas::{Canvas, CanvasPlacement, CanvasStats};
    pub use crate::config::{MapperConfig, MapperConfigBuilder, MapperKind};
    pub use crate::mapper::{
        HorizontalMapper, Mapper, OptimalMapper, Strategy, Trial, VerticalMapper, map_items,
    };
    pub use crate::model::{Item, MapperStats, PackingResult, Placement, Rect};
}
