use crate::cache::UploadCache;
use crate::config::DashboardConfig;
use crate::data::loader::Upload;
use crate::data::model::{CellValue, ColumnKind, Table};
use crate::data::normalize::{normalize, NormalizeReport};
use crate::data::stats::{
    correlation_matrix, histogram, scatter_sample, CorrelationMatrix, Histogram, ScatterSample,
};
use crate::error::{DashboardError, DashboardResult};
use crate::params::{ResolvedParams, Tab, ViewParams};

pub const UPLOAD_PROMPT: &str = "Upload a CSV to begin. Expect a 'day' column (date) and \
     numeric columns such as daily_count, lags, etc.";
pub const HEATMAP_WARNING: &str = "Select at least 2 columns";

// ---------------------------------------------------------------------------
// Rerun output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum HeatmapView {
    Matrix(CorrelationMatrix),
    Warning(&'static str),
}

/// The chart computed for the active tab.
#[derive(Debug, Clone, PartialEq)]
pub enum TabView {
    Heatmap(HeatmapView),
    Scatter(ScatterSample),
    Histogram(Histogram),
}

/// Sidebar description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyFrame {
    pub numeric_columns: Vec<String>,
    pub n_rows: usize,
    pub columns: Vec<ColumnSummary>,
    /// Leading rows of the normalized table, row-major.
    pub preview: Vec<Vec<CellValue>>,
    pub params: ResolvedParams,
    pub report: NormalizeReport,
    pub view: TabView,
}

/// Result of one rerun.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Nothing uploaded yet.
    AwaitingUpload,
    /// The upload is unusable; no tab is shown.
    Halted(String),
    Ready(Box<ReadyFrame>),
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Turns (upload, widget values) into a [`Frame`]. Only the CSV parse is
/// remembered between calls.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    cache: UploadCache,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: UploadCache::default(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    pub fn forget_upload(&mut self) {
        self.cache.clear();
    }

    /// Run the whole pipeline for the active tab.
    ///
    /// Parse failures are returned as errors; an upload without numeric
    /// columns yields [`Frame::Halted`].
    pub fn rerun(
        &mut self,
        upload: Option<&Upload>,
        params: &ViewParams,
    ) -> DashboardResult<Frame> {
        let Some(upload) = upload else {
            return Ok(Frame::AwaitingUpload);
        };

        let parsed = self.cache.get_or_parse(upload)?;
        let (table, report) = normalize(&parsed, &self.config.date_column);

        let numeric_columns = table.numeric_columns();
        if numeric_columns.is_empty() {
            log::error!("{} has no numeric columns", upload.name);
            return Ok(Frame::Halted(DashboardError::NoNumericColumns.to_string()));
        }

        let resolved = params.resolve(&numeric_columns, table.n_rows(), &self.config);
        log::debug!("Rerun for {:?} with {:?}", params.tab, resolved);

        let view = match params.tab {
            Tab::Heatmap => {
                if resolved.heatmap_columns.len() < 2 {
                    TabView::Heatmap(HeatmapView::Warning(HEATMAP_WARNING))
                } else {
                    TabView::Heatmap(HeatmapView::Matrix(correlation_matrix(
                        &table,
                        &resolved.heatmap_columns,
                    )))
                }
            }
            Tab::Scatter => TabView::Scatter(scatter_sample(
                &table,
                &resolved.scatter_x,
                &resolved.scatter_y,
                resolved.sample_size,
                self.config.sample_seed,
            )),
            Tab::Histogram => TabView::Histogram(histogram(
                &table,
                &resolved.histogram_column,
                resolved.bins,
            )),
        };

        Ok(Frame::Ready(Box::new(ReadyFrame {
            numeric_columns,
            n_rows: table.n_rows(),
            columns: summarize(&table),
            preview: preview(&table, self.config.preview_rows),
            params: resolved,
            report,
            view,
        })))
    }
}

fn summarize(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .map(|c| ColumnSummary {
            name: c.name.clone(),
            kind: c.kind(),
            non_null: c.non_null(),
        })
        .collect()
}

fn preview(table: &Table, rows: usize) -> Vec<Vec<CellValue>> {
    (0..table.n_rows().min(rows))
        .map(|row| table.columns().iter().map(|c| c.data.cell(row)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HeatmapParams, ScatterParams};

    const TEN_ROWS: &str = "day,a,b\n\
        2024-01-10,10,1.0\n\
        2024-01-02,,2.5\n\
        2024-01-03,3,2.0\n\
        2024-01-04,4,4.5\n\
        2024-01-05,,3.0\n\
        2024-01-06,6,6.5\n\
        2024-01-07,7,5.0\n\
        2024-01-08,8,8.5\n\
        2024-01-09,9,7.0\n\
        2024-01-01,1,0.5\n";

    fn dashboard() -> Dashboard {
        Dashboard::new(DashboardConfig::default())
    }

    fn upload(text: &str) -> Upload {
        Upload::from_bytes("test.csv", text.as_bytes().to_vec())
    }

    fn ready(frame: Frame) -> ReadyFrame {
        match frame {
            Frame::Ready(r) => *r,
            other => panic!("expected a ready frame, got {other:?}"),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_upload_waits_for_input() {
        let frame = dashboard().rerun(None, &ViewParams::default()).unwrap();
        assert_eq!(frame, Frame::AwaitingUpload);
    }

    #[test]
    fn heatmap_over_rows_without_missing_values() {
        let params = ViewParams {
            heatmap: HeatmapParams {
                selected: Some(names(&["a", "b"])),
            },
            ..ViewParams::default()
        };
        let frame = ready(dashboard().rerun(Some(&upload(TEN_ROWS)), &params).unwrap());

        assert_eq!(frame.n_rows, 10);
        assert_eq!(frame.numeric_columns, names(&["a", "b"]));
        let TabView::Heatmap(HeatmapView::Matrix(m)) = frame.view else {
            panic!("expected a matrix");
        };
        assert_eq!(m.rows_used, 8);
        assert_eq!(m.columns, names(&["a", "b"]));
        assert_eq!(m.values.len(), 2);
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 1), Some(1.0));
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn heatmap_with_one_column_warns() {
        for selected in [vec![], names(&["a"])] {
            let params = ViewParams {
                heatmap: HeatmapParams {
                    selected: Some(selected),
                },
                ..ViewParams::default()
            };
            let frame = ready(dashboard().rerun(Some(&upload(TEN_ROWS)), &params).unwrap());
            assert_eq!(frame.view, TabView::Heatmap(HeatmapView::Warning(HEATMAP_WARNING)));
        }
    }

    #[test]
    fn text_only_upload_halts() {
        let frame = dashboard()
            .rerun(Some(&upload("day,name\n2024-01-01,x\n")), &ViewParams::default())
            .unwrap();
        assert_eq!(frame, Frame::Halted("No numeric columns found.".to_string()));
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let err = dashboard()
            .rerun(Some(&upload("a,b\n1,2\n3\n")), &ViewParams::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Csv(_)));
    }

    #[test]
    fn scatter_reruns_are_reproducible() {
        let mut text = String::from("day,a,b\n");
        for i in 0..2_000 {
            text.push_str(&format!("2024-01-01,{i},{}\n", i * 2));
        }
        let up = upload(&text);
        let params = ViewParams {
            tab: Tab::Scatter,
            scatter: ScatterParams {
                sample_size: Some(1_000),
                ..ScatterParams::default()
            },
            ..ViewParams::default()
        };

        let mut dash = dashboard();
        let first = ready(dash.rerun(Some(&up), &params).unwrap());
        let second = ready(dash.rerun(Some(&up), &params).unwrap());
        assert_eq!(dash.cache().misses(), 1);

        let TabView::Scatter(sample) = &first.view else {
            panic!("expected a scatter view");
        };
        assert_eq!(sample.points.len(), 1_000);
        assert_eq!(sample.x_column, "b");
        assert_eq!(sample.y_column, "a");
        assert_eq!(first.view, second.view);
    }

    #[test]
    fn histogram_counts_present_values_of_the_default_column() {
        let params = ViewParams {
            tab: Tab::Histogram,
            ..ViewParams::default()
        };
        let frame = ready(dashboard().rerun(Some(&upload(TEN_ROWS)), &params).unwrap());
        let TabView::Histogram(h) = frame.view else {
            panic!("expected a histogram");
        };
        assert_eq!(h.column, "a");
        assert_eq!(h.counts.len(), 30);
        assert_eq!(h.total(), 8);
    }

    #[test]
    fn unparseable_days_are_reported() {
        let frame = ready(
            dashboard()
                .rerun(
                    Some(&upload("day,v\nyesterday,1\n2024-01-01,2\n")),
                    &ViewParams::default(),
                )
                .unwrap(),
        );
        assert_eq!(frame.report.unparseable_dates, 1);
        assert_eq!(frame.columns[0].kind, ColumnKind::Timestamp);
        assert_eq!(frame.columns[0].non_null, 1);
        assert_eq!(frame.preview.len(), 2);
        assert_eq!(frame.preview[0][1], CellValue::Number(2.0));
        assert_eq!(frame.preview[1][0], CellValue::Null);
    }
}
