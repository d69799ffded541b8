use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Mapper selection and search parameters.
/// Key notes:
///   - `kind` selects HorizontalOnly/VerticalOnly/Optimal
///   - `cutoff_efficiency` and `max_candidates` bound the Optimal search
///   - `time_budget_ms` is checked between Optimal trials
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MapperKind {
    /// All items on one row, in input order.
    HorizontalOnly,
    /// All items in one column, in input order.
    VerticalOnly,
    /// Iterative search over canvas sizes for the smallest bounding area.
    Optimal,
}

impl FromStr for MapperKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "horizontal" | "horizontal_only" => Ok(Self::HorizontalOnly),
            "v" | "vertical" | "vertical_only" => Ok(Self::VerticalOnly),
            "o" | "optimal" => Ok(Self::Optimal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapperConfig {
    #[serde(default = "default_kind")]
    pub kind: MapperKind,
    /// Optimal: stop once a candidate reaches this item-area / bounding-area ratio. In (0, 1].
    #[serde(default = "default_cutoff_efficiency")]
    pub cutoff_efficiency: f32,
    /// Optimal: stop after this many successful candidates.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,
    /// Optimal: optional wall-clock budget (milliseconds). None or 0 disables.
    /// The search always runs until it has at least one candidate.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            cutoff_efficiency: default_cutoff_efficiency(),
            max_candidates: default_max_candidates(),
            time_budget_ms: None,
        }
    }
}

impl MapperConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if `cutoff_efficiency` is outside (0, 1] or `max_candidates` is 0.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpritePackerError;

        if !(self.cutoff_efficiency > 0.0 && self.cutoff_efficiency <= 1.0) {
            return Err(SpritePackerError::InvalidConfig(format!(
                "cutoff_efficiency ({}) must be in (0, 1]",
                self.cutoff_efficiency
            )));
        }
        if self.max_candidates == 0 {
            return Err(SpritePackerError::InvalidConfig(
                "max_candidates must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_kind() -> MapperKind {
    MapperKind::Optimal
}
fn default_cutoff_efficiency() -> f32 {
    1.0
}
fn default_max_candidates() -> u32 {
    70
}

/// Builder for `MapperConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct MapperConfigBuilder {
    cfg: MapperConfig,
}

impl MapperConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: MapperConfig::default(),
        }
    }
    pub fn kind(mut self, v: MapperKind) -> Self {
        self.cfg.kind = v;
        self
    }
    pub fn cutoff_efficiency(mut self, v: f32) -> Self {
        self.cfg.cutoff_efficiency = v;
        self
    }
    pub fn max_candidates(mut self, v: u32) -> Self {
        self.cfg.max_candidates = v;
        self
    }
    pub fn time_budget_ms(mut self, v: Option<u64>) -> Self {
        self.cfg.time_budget_ms = v;
        self
    }
    pub fn build(self) -> MapperConfig {
        self.cfg
    }
}

impl MapperConfig {
    /// Create a fluent builder for `MapperConfig`.
    pub fn builder() -> MapperConfigBuilder {
        MapperConfigBuilder::new()
    }
}
