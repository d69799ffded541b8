//! Iterative search for a small bounding box.
//!
//! Each trial resets a [`Canvas`] to a candidate width/height and places every item,
//! tallest first. A failed trial grows the height by the canvas' deficit hint; a
//! successful one narrows the width to one less than the best candidate so far. Trials
//! whose canvas area is larger than the best candidate, or smaller than the combined
//! item area, are skipped without placing anything.

use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{debug, info};

use super::Mapper;
use crate::canvas::{Canvas, CanvasPlacement, CanvasStats};
use crate::config::MapperConfig;
use crate::error::{Result, SpritePackerError};
use crate::model::{Item, MapperStats, PackingResult, Placement, validate_items};

/// One trial of the search, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Bounding box of the candidate, or `None` if the items did not fit.
    pub candidate: Option<(u32, u32)>,
}

/// Positions from one successful trial, in sorted item order.
#[derive(Debug)]
struct Candidate {
    positions: Vec<(u32, u32)>,
    width: u32,
    height: u32,
}

impl Candidate {
    fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
}

struct RestrictedBox {
    candidate: Option<Candidate>,
    /// Deficit hint reported when the tallest right-flushed item was placed.
    flush_deficit: Option<u32>,
    canvas: CanvasStats,
}

#[derive(Debug, Clone)]
pub struct OptimalMapper {
    canvas: Canvas,
    cutoff_efficiency: f32,
    max_candidates: u32,
    time_budget_ms: Option<u64>,
}

impl Default for OptimalMapper {
    fn default() -> Self {
        Self::from_config(&MapperConfig::default())
    }
}

impl OptimalMapper {
    pub fn new(cutoff_efficiency: f32, max_candidates: u32) -> Self {
        Self {
            canvas: Canvas::new(),
            cutoff_efficiency,
            max_candidates,
            time_budget_ms: None,
        }
    }

    pub fn from_config(cfg: &MapperConfig) -> Self {
        Self {
            canvas: Canvas::new(),
            cutoff_efficiency: cfg.cutoff_efficiency,
            max_candidates: cfg.max_candidates,
            time_budget_ms: cfg.time_budget_ms,
        }
    }

    pub fn with_time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.time_budget_ms = v;
        self
    }

    fn validate(&self) -> Result<()> {
        MapperConfig::builder()
            .cutoff_efficiency(self.cutoff_efficiency)
            .max_candidates(self.max_candidates)
            .build()
            .validate()
    }

    /// Runs the search, calling `observer` after every trial.
    ///
    /// Returning `ControlFlow::Break` from the observer stops the search and returns the
    /// best candidate so far. A stop request made before the first candidate exists is
    /// deferred until one does.
    pub fn map_with_observer<P, F>(
        &mut self,
        items: &[Item<P>],
        mut observer: F,
    ) -> Result<PackingResult<P>>
    where
        P: Clone,
        F: FnMut(&Trial) -> ControlFlow<()>,
    {
        self.validate()?;
        if items.is_empty() {
            return Err(SpritePackerError::Empty);
        }
        validate_items(items)?;

        // Tallest first; the sort is stable so equal heights keep input order.
        let mut sorted: Vec<&Item<P>> = items.iter().collect();
        sorted.sort_by(|a, b| b.height.cmp(&a.height));

        let total_area: u64 = sorted.iter().map(|it| it.area()).sum();
        let widest = sorted.iter().map(|it| it.width).max().unwrap_or(1);
        let total_width = sorted
            .iter()
            .fold(0u32, |acc, it| acc.saturating_add(it.width));

        let mut stats = MapperStats::default();
        let mut best: Option<Candidate> = None;
        let mut stop_requested = false;

        // Wide enough for a single row, so the first trial always succeeds.
        let mut trial_width = Canvas::UNLIMITED_SIZE.max(total_width);
        let mut trial_height = sorted[0].height;

        while trial_width >= widest {
            let trial = self.map_restricted_box(&sorted, trial_width, trial_height)?;
            stats.canvas_add_attempts += trial.canvas.rectangle_add_attempts;
            stats.canvas_cells_generated += trial.canvas.cells_generated;

            let report = Trial {
                canvas_width: trial_width,
                canvas_height: trial_height,
                candidate: trial.candidate.as_ref().map(|c| (c.width, c.height)),
            };
            debug!(
                width = trial_width,
                height = trial_height,
                candidate = ?report.candidate,
                "optimal trial"
            );
            stop_requested |= observer(&report).is_break();

            match trial.candidate {
                None => {
                    stats.candidate_fails += 1;
                    trial_height += trial.canvas.lowest_free_height_deficit.unwrap_or(1);
                }
                Some(candidate) => {
                    stats.candidates_generated += 1;

                    if best.as_ref().is_none_or(|b| candidate.area() < b.area()) {
                        let efficiency = total_area as f32 / candidate.area() as f32;
                        best = Some(candidate);
                        if efficiency >= self.cutoff_efficiency {
                            break;
                        }
                    }
                    if stats.candidates_generated >= self.max_candidates {
                        break;
                    }

                    // Narrower than the best so far; the width never grows back.
                    if let Some(b) = &best {
                        trial_width = trial_width.min(b.width - 1);
                    }

                    // At the narrower width the tallest item flush with the right edge has
                    // to move down, so make room for it up front.
                    trial_height += trial.flush_deficit.unwrap_or(1);
                }
            }

            if let Some(b) = &best {
                if stop_requested {
                    break;
                }
                let best_area = b.area();
                while trial_width >= widest {
                    let area = (trial_width as u64) * (trial_height as u64);
                    let bigger_than_best = area > best_area;
                    let smaller_than_items = area < total_area;
                    if !bigger_than_best && !smaller_than_items {
                        break;
                    }
                    if bigger_than_best {
                        trial_width -= 1;
                    }
                    if smaller_than_items {
                        trial_height += 1;
                    }
                }
            }
        }

        let best = best.ok_or(SpritePackerError::NoCandidate {
            fails: stats.candidate_fails,
        })?;

        let mut result = PackingResult::new();
        for (item, &(x, y)) in sorted.iter().zip(best.positions.iter()) {
            result.add_placement(Placement::new(x, y, (*item).clone()));
        }
        info!(
            width = result.width,
            height = result.height,
            efficiency = result.efficiency(),
            candidates = stats.candidates_generated,
            fails = stats.candidate_fails,
            "optimal mapping done"
        );
        Ok(result.with_stats(stats))
    }

    /// Places `sorted` on a `width` x `height` canvas. Stops at the first item that
    /// does not fit.
    fn map_restricted_box<P>(
        &mut self,
        sorted: &[&Item<P>],
        width: u32,
        height: u32,
    ) -> Result<RestrictedBox> {
        self.canvas.set_dimensions(width, height)?;

        let mut positions = Vec::with_capacity(sorted.len());
        let mut bound_w = 0u32;
        let mut bound_h = 0u32;
        let mut tallest_flush = 0u32;
        let mut flush_deficit = None;

        for item in sorted {
            match self.canvas.add_rectangle(item.width, item.height)? {
                CanvasPlacement::Failed { .. } => {
                    return Ok(RestrictedBox {
                        candidate: None,
                        flush_deficit,
                        canvas: self.canvas.statistics(),
                    });
                }
                CanvasPlacement::Placed {
                    x,
                    y,
                    lowest_deficit,
                } => {
                    positions.push((x, y));
                    let right = x + item.width;
                    bound_w = bound_w.max(right);
                    bound_h = bound_h.max(y + item.height);
                    if right == bound_w && item.height > tallest_flush {
                        tallest_flush = item.height;
                        flush_deficit = lowest_deficit;
                    }
                }
            }
        }

        Ok(RestrictedBox {
            candidate: Some(Candidate {
                positions,
                width: bound_w,
                height: bound_h,
            }),
            flush_deficit,
            canvas: self.canvas.statistics(),
        })
    }
}

impl<P: Clone> Mapper<P> for OptimalMapper {
    fn map(&mut self, items: &[Item<P>]) -> Result<PackingResult<P>> {
        let budget = self.time_budget_ms.filter(|&ms| ms > 0);
        let start = Instant::now();
        self.map_with_observer(items, |_| match budget {
            Some(ms) if start.elapsed().as_millis() as u64 > ms => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        })
    }
}
