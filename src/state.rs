use std::path::Path;

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, Frame};
use crate::data::loader::Upload;
use crate::params::ViewParams;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the last rerun was computed from.
#[derive(Debug, Clone, PartialEq)]
struct RerunKey {
    digest: Option<String>,
    params: ViewParams,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub dashboard: Dashboard,

    /// The current upload (None until the user picks or drops a file).
    pub upload: Option<Upload>,

    /// Widget values of all tabs.
    pub params: ViewParams,

    /// Visible x range of the histogram, driven by the range slider.
    pub histogram_zoom: Option<(f64, f64)>,

    /// Result of the last rerun: a frame, or a parse error message.
    pub frame: Result<Frame, String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    last_key: Option<RerunKey>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dashboard: Dashboard::new(config),
            upload: None,
            params: ViewParams::default(),
            histogram_zoom: None,
            frame: Ok(Frame::AwaitingUpload),
            status_message: None,
            last_key: None,
        }
    }

    /// Make `upload` current. Widget state from a previous file is dropped.
    pub fn set_upload(&mut self, upload: Upload) {
        let same = self
            .upload
            .as_ref()
            .is_some_and(|u| u.digest == upload.digest);
        if !same {
            let tab = self.params.tab;
            self.params = ViewParams {
                tab,
                ..ViewParams::default()
            };
            self.histogram_zoom = None;
        }
        self.upload = Some(upload);
        self.status_message = None;
    }

    /// Read a file from disk and make it current.
    pub fn load_path(&mut self, path: &Path) {
        match Upload::from_path(path) {
            Ok(upload) => self.set_upload(upload),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.params = ViewParams::default();
        self.histogram_zoom = None;
        self.dashboard.forget_upload();
    }

    fn current_key(&self) -> RerunKey {
        RerunKey {
            digest: self.upload.as_ref().map(|u| u.digest.clone()),
            params: self.params.clone(),
        }
    }

    /// Whether the upload or a widget changed since the last rerun.
    pub fn needs_refresh(&self) -> bool {
        self.last_key.as_ref() != Some(&self.current_key())
    }

    /// Rerun the dashboard if the upload or any widget changed since the
    /// last call.
    pub fn refresh(&mut self) {
        if !self.needs_refresh() {
            return;
        }
        let key = self.current_key();

        self.frame = self
            .dashboard
            .rerun(self.upload.as_ref(), &self.params)
            .map_err(|e| {
                log::error!("Rerun failed: {e}");
                e.to_string()
            });
        log::debug!("Rerun done; {} parse(s) so far", self.dashboard.cache().misses());
        self.last_key = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Tab;

    fn upload(text: &str) -> Upload {
        Upload::from_bytes("t.csv", text.as_bytes().to_vec())
    }

    #[test]
    fn refresh_skips_unchanged_inputs() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_upload(upload("a,b\n1,2\n2,3\n3,5\n"));
        assert!(state.needs_refresh());
        state.refresh();
        assert!(!state.needs_refresh());
        state.refresh();
        assert_eq!(state.dashboard.cache().misses(), 1);
        assert!(matches!(state.frame, Ok(Frame::Ready(_))));

        state.params.tab = Tab::Histogram;
        state.refresh();
        assert_eq!(state.dashboard.cache().misses(), 1);
    }

    #[test]
    fn new_upload_resets_widgets_but_keeps_tab() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_upload(upload("a,b\n1,2\n"));
        state.params.tab = Tab::Scatter;
        state.params.scatter.x = Some("a".into());
        state.histogram_zoom = Some((0.0, 1.0));

        state.set_upload(upload("c,d\n1,2\n"));
        assert_eq!(state.params.tab, Tab::Scatter);
        assert_eq!(state.params.scatter.x, None);
        assert_eq!(state.histogram_zoom, None);
    }

    #[test]
    fn parse_errors_become_messages() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_upload(upload("a,b\n1\n"));
        state.refresh();
        assert!(state.frame.as_ref().unwrap_err().starts_with("malformed CSV"));
    }

    #[test]
    fn clearing_returns_to_the_prompt() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_upload(upload("a\n1\n"));
        state.refresh();
        state.clear_upload();
        state.refresh();
        assert_eq!(state.frame, Ok(Frame::AwaitingUpload));
    }
}
