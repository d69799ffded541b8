use crate::config::{MapperConfig, MapperKind};
use crate::error::{Result, SpritePackerError};
use crate::model::{Item, PackingResult, validate_items};
use tracing::instrument;

pub mod horizontal;
pub mod optimal;
pub mod vertical;

pub use horizontal::HorizontalMapper;
pub use optimal::{OptimalMapper, Trial};
pub use vertical::VerticalMapper;

/// A mapper lays out a list of items into one sprite.
///
/// Implementations must ensure no overlaps and return the tight bounding box of their
/// placements. Items with a zero extent are rejected with `InvalidItem`.
pub trait Mapper<P> {
    fn map(&mut self, items: &[Item<P>]) -> Result<PackingResult<P>>;
}

/// The closed set of mappers, selected by [`MapperKind`].
#[derive(Debug, Clone)]
pub enum Strategy {
    HorizontalOnly(HorizontalMapper),
    VerticalOnly(VerticalMapper),
    Optimal(OptimalMapper),
}

impl Strategy {
    pub fn from_config(cfg: &MapperConfig) -> Self {
        match cfg.kind {
            MapperKind::HorizontalOnly => Strategy::HorizontalOnly(HorizontalMapper),
            MapperKind::VerticalOnly => Strategy::VerticalOnly(VerticalMapper),
            MapperKind::Optimal => Strategy::Optimal(OptimalMapper::from_config(cfg)),
        }
    }

    pub fn kind(&self) -> MapperKind {
        match self {
            Strategy::HorizontalOnly(_) => MapperKind::HorizontalOnly,
            Strategy::VerticalOnly(_) => MapperKind::VerticalOnly,
            Strategy::Optimal(_) => MapperKind::Optimal,
        }
    }
}

impl<P: Clone> Mapper<P> for Strategy {
    fn map(&mut self, items: &[Item<P>]) -> Result<PackingResult<P>> {
        match self {
            Strategy::HorizontalOnly(m) => m.map(items),
            Strategy::VerticalOnly(m) => m.map(items),
            Strategy::Optimal(m) => m.map(items),
        }
    }
}

#[instrument(skip_all)]
/// Lays out `items` with the mapper selected by `cfg`.
///
/// Notes:
/// - HorizontalOnly/VerticalOnly keep input order; Optimal returns placements sorted by
///   height (descending, stable).
/// - Identical inputs and configuration always produce identical layouts.
pub fn map_items<P: Clone>(items: &[Item<P>], cfg: &MapperConfig) -> Result<PackingResult<P>> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(SpritePackerError::Empty);
    }
    validate_items(items)?;
    Strategy::from_config(cfg).map(items)
}
