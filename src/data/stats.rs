use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::model::Table;

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation among selected numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` square. `None` where the coefficient is
    /// undefined (zero variance or fewer than two complete rows).
    pub values: Vec<Vec<Option<f64>>>,
    /// Rows left after dropping any row with a missing selected value.
    pub rows_used: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// Correlate `columns` over the rows where all of them are present.
/// Names that are not numeric columns of `table` are skipped.
pub fn correlation_matrix(table: &Table, columns: &[String]) -> CorrelationMatrix {
    let series: Vec<(&String, &[Option<f64>])> = columns
        .iter()
        .filter_map(|name| table.numeric(name).map(|v| (name, v)))
        .collect();

    let complete: Vec<usize> = (0..table.n_rows())
        .filter(|&row| series.iter().all(|(_, v)| v[row].is_some()))
        .collect();

    let dense: Vec<Vec<f64>> = series
        .iter()
        .map(|(_, v)| complete.iter().filter_map(|&row| v[row]).collect())
        .collect();

    let n = dense.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&dense[i], &dense[j]);
            // Self-correlation is exactly one whenever it is defined.
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: series.iter().map(|(name, _)| (*name).clone()).collect(),
        values,
        rows_used: complete.len(),
    }
}

/// Pearson coefficient of two equally long samples, clamped to [-1, 1].
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 || !divisor.is_finite() {
        return None;
    }
    Some((sxy / divisor).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Scatter sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    /// Row of the (normalized) table the point came from.
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSample {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<ScatterPoint>,
    /// Rows with both coordinates present, before sampling.
    pub complete_rows: usize,
}

/// Pair up `x` and `y`, drop incomplete rows, and keep at most
/// `sample_size` of them, chosen uniformly with a `seed`ed generator.
/// Sampled points stay in table order.
pub fn scatter_sample(
    table: &Table,
    x: &str,
    y: &str,
    sample_size: usize,
    seed: u64,
) -> ScatterSample {
    let points: Vec<ScatterPoint> = match (table.numeric(x), table.numeric(y)) {
        (Some(xs), Some(ys)) => xs
            .iter()
            .zip(ys)
            .enumerate()
            .filter_map(|(row, (&x, &y))| Some(ScatterPoint { row, x: x?, y: y? }))
            .collect(),
        _ => Vec::new(),
    };
    let complete_rows = points.len();

    let points = if complete_rows > sample_size {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, complete_rows, sample_size).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| points[i]).collect()
    } else {
        points
    };

    ScatterSample {
        x_column: x.to_string(),
        y_column: y.to_string(),
        points,
        complete_rows,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub column: String,
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => {
                let n = self.counts.len() as f64;
                hi / n - lo / n
            }
            _ => 0.0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(min, max)` of the binned range, if any value was binned.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((*self.edges.first()?, *self.edges.last()?))
    }
}

/// Count the present values of `column` into `bins` equal-width bins
/// spanning their min..max. The last bin includes its upper edge.
pub fn histogram(table: &Table, column: &str, bins: usize) -> Histogram {
    let values: Vec<f64> = table
        .numeric(column)
        .map(|v| v.iter().flatten().copied().collect())
        .unwrap_or_default();

    let empty = Histogram {
        column: column.to_string(),
        edges: Vec::new(),
        counts: Vec::new(),
    };
    let bins = bins.max(1);
    let Some((mut lo, mut hi)) = min_max(&values) else {
        return empty;
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    // Halved so that `hi - lo` cannot overflow for extreme finite values.
    let half_span = hi / 2.0 - lo / 2.0;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| {
            if i == bins {
                return hi;
            }
            let t = i as f64 / bins as f64;
            lo * (1.0 - t) + hi * t
        })
        .collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = if half_span > 0.0 {
            ((v / 2.0 - lo / 2.0) / half_span * bins as f64) as usize
        } else {
            0
        };
        counts[idx.min(bins - 1)] += 1;
    }

    Histogram {
        column: column.to_string(),
        edges,
        counts,
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
