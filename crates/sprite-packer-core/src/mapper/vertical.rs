use super::Mapper;
use crate::error::Result;
use crate::model::{Item, MapperStats, PackingResult, Placement, validate_items};

/// Stacks every item in a single column, top to bottom in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalMapper;

impl<P: Clone> Mapper<P> for VerticalMapper {
    fn map(&mut self, items: &[Item<P>]) -> Result<PackingResult<P>> {
        validate_items(items)?;
        let mut result = PackingResult::new();
        let mut y = 0u32;
        for item in items {
            result.add_placement(Placement::new(0, y, item.clone()));
            y += item.height;
        }
        Ok(result.with_stats(MapperStats {
            candidates_generated: 1,
            ..Default::default()
        }))
    }
}
