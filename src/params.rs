use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Heatmap,
    Scatter,
    Histogram,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Heatmap, Tab::Scatter, Tab::Histogram];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Heatmap => "Heatmap",
            Tab::Scatter => "Scatter",
            Tab::Histogram => "Histogram",
        }
    }
}

// ---------------------------------------------------------------------------
// Widget state
// ---------------------------------------------------------------------------

// `None` means "not touched yet": the default for the current table applies.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeatmapParams {
    pub selected: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScatterParams {
    pub x: Option<String>,
    pub y: Option<String>,
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistogramParams {
    pub column: Option<String>,
    pub bins: Option<usize>,
}

/// Everything the widgets hold. Compared between frames to decide whether
/// a rerun is needed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewParams {
    pub tab: Tab,
    pub heatmap: HeatmapParams,
    pub scatter: ScatterParams,
    pub histogram: HistogramParams,
}

// ---------------------------------------------------------------------------
// Resolution against a table
// ---------------------------------------------------------------------------

/// Inclusive slider range with a step measured from `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderBounds {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

impl SliderBounds {
    /// Clamp into range and snap down onto the step grid. `max` itself is
    /// always reachable, even when it is off the grid.
    pub fn clamp(&self, value: usize) -> usize {
        let v = value.clamp(self.min, self.max);
        if v == self.max || self.step == 0 {
            v
        } else {
            self.min + (v - self.min) / self.step * self.step
        }
    }
}

/// Widget values with defaults filled in and ranges enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParams {
    pub heatmap_columns: Vec<String>,
    pub scatter_x: String,
    pub scatter_y: String,
    pub sample_size: usize,
    pub sample_bounds: SliderBounds,
    pub histogram_column: String,
    pub bins: usize,
    pub bins_bounds: SliderBounds,
}

/// Bounds of the scatter sample slider for a table of `n_rows`.
pub fn sample_bounds(config: &DashboardConfig, n_rows: usize) -> SliderBounds {
    let max = config.sample_max.min(n_rows);
    SliderBounds {
        min: config.sample_min.min(max),
        max,
        step: config.sample_step,
    }
}

pub fn bins_bounds(config: &DashboardConfig) -> SliderBounds {
    SliderBounds {
        min: config.bins_min,
        max: config.bins_max,
        step: config.bins_step,
    }
}

impl ViewParams {
    /// Fill defaults and clamp against `numeric` (must be non-empty) and the
    /// table's row count.
    pub fn resolve(
        &self,
        numeric: &[String],
        n_rows: usize,
        config: &DashboardConfig,
    ) -> ResolvedParams {
        debug_assert!(!numeric.is_empty());
        let known = |name: &Option<String>| {
            name.as_ref()
                .filter(|n| numeric.contains(n))
                .cloned()
        };
        let nth = |i: usize| numeric[i.min(numeric.len() - 1)].clone();

        let heatmap_columns = match &self.heatmap.selected {
            Some(selected) => {
                let mut cols: Vec<String> = Vec::new();
                for name in selected {
                    if numeric.contains(name) && !cols.contains(name) {
                        cols.push(name.clone());
                    }
                }
                cols
            }
            None => numeric
                .iter()
                .take(config.heatmap_default_columns)
                .cloned()
                .collect(),
        };

        let sample_bounds = sample_bounds(config, n_rows);
        let sample_size = sample_bounds.clamp(
            self.scatter
                .sample_size
                .unwrap_or_else(|| config.sample_default.min(n_rows)),
        );

        let bins_bounds = bins_bounds(config);
        let bins = bins_bounds.clamp(self.histogram.bins.unwrap_or(config.bins_default));

        ResolvedParams {
            heatmap_columns,
            scatter_x: known(&self.scatter.x).unwrap_or_else(|| nth(1)),
            scatter_y: known(&self.scatter.y).unwrap_or_else(|| nth(0)),
            sample_size,
            sample_bounds,
            histogram_column: known(&self.histogram.column).unwrap_or_else(|| nth(0)),
            bins,
            bins_bounds,
        }
    }
}
