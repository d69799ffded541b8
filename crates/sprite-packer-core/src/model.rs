use serde::{Deserialize, Serialize};

use crate::error::{Result, SpritePackerError};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// True if the interiors of `self` and `other` intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.bottom()
            || other.y >= self.bottom())
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// An item to place: its extent plus an opaque payload (typically an image name).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item<P = String> {
    pub width: u32,
    pub height: u32,
    pub payload: P,
}

impl<P> Item<P> {
    pub fn new(width: u32, height: u32, payload: P) -> Self {
        Self {
            width,
            height,
            payload,
        }
    }

    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
}

/// Checks that every item has positive extents.
pub fn validate_items<P>(items: &[Item<P>]) -> Result<()> {
    if let Some((index, it)) = items
        .iter()
        .enumerate()
        .find(|(_, it)| it.width == 0 || it.height == 0)
    {
        return Err(SpritePackerError::InvalidItem {
            index,
            width: it.width,
            height: it.height,
        });
    }
    Ok(())
}

/// An item placed at a top-left offset within the sprite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<P = String> {
    pub x: u32,
    pub y: u32,
    pub item: Item<P>,
}

impl<P> Placement<P> {
    pub fn new(x: u32, y: u32, item: Item<P>) -> Self {
        Self { x, y, item }
    }
    pub fn right(&self) -> u32 {
        self.x + self.item.width
    }
    pub fn bottom(&self) -> u32 {
        self.y + self.item.height
    }
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.item.width, self.item.height)
    }
}

/// Counters collected during a mapping run. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapperStats {
    /// Trial canvases that could not hold every item.
    pub candidate_fails: u32,
    /// Trial canvases that held every item.
    pub candidates_generated: u32,
    /// Cells created by row/column splits, summed over all trials.
    pub canvas_cells_generated: u64,
    /// `add_rectangle` calls, summed over all trials.
    pub canvas_add_attempts: u64,
}

impl MapperStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Candidates: {}, Failed trials: {}, Cells generated: {}, Add attempts: {}",
            self.candidates_generated,
            self.candidate_fails,
            self.canvas_cells_generated,
            self.canvas_add_attempts,
        )
    }
}

/// Layout produced by a mapper.
///
/// `width`/`height` are always the tight bounding box of `placements`, which can be
/// smaller than the trial canvas that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackingResult<P = String> {
    pub placements: Vec<Placement<P>>,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<MapperStats>,
}

impl<P> Default for PackingResult<P> {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            width: 0,
            height: 0,
            stats: None,
        }
    }
}

impl<P> PackingResult<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a placement and grows the bounding box to include it.
    pub fn add_placement(&mut self, placement: Placement<P>) {
        self.width = self.width.max(placement.right());
        self.height = self.height.max(placement.bottom());
        self.placements.push(placement);
    }

    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    /// Sum of the areas of all placed items.
    pub fn item_area(&self) -> u64 {
        self.placements.iter().map(|p| p.item.area()).sum()
    }

    /// Ratio of item area to bounding-box area (0.0 to 1.0).
    pub fn efficiency(&self) -> f64 {
        let area = self.area();
        if area > 0 {
            self.item_area() as f64 / area as f64
        } else {
            0.0
        }
    }

    pub fn with_stats(mut self, stats: MapperStats) -> Self {
        self.stats = Some(stats);
        self
    }
}
