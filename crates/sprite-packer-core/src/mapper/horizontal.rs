use super::Mapper;
use crate::error::Result;
use crate::model::{Item, MapperStats, PackingResult, Placement, validate_items};

/// Places every item on a single row, left to right in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalMapper;

impl<P: Clone> Mapper<P> for HorizontalMapper {
    fn map(&mut self, items: &[Item<P>]) -> Result<PackingResult<P>> {
        validate_items(items)?;
        let mut result = PackingResult::new();
        let mut x = 0u32;
        for item in items {
            result.add_placement(Placement::new(x, 0, item.clone()));
            x += item.width;
        }
        Ok(result.with_stats(MapperStats {
            candidates_generated: 1,
            ..Default::default()
        }))
    }
}
