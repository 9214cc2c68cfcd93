use std::path::Path;

use url::Url;

use crate::analysis::client::resolve_asset_url;
use crate::analysis::response::VarianceEntry;
use crate::controller::{PlotSlot, UploadView};
use crate::data::loader::{load_selected_file, preview_csv};
use crate::data::model::{CsvPreview, SelectedFile};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One bar of the explained-variance chart.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceBar {
    pub component: String,
    pub percent: f64,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File chosen via File → Open (None until the user picks one).
    pub selected_file: Option<SelectedFile>,

    /// Local summary of the selected CSV; None if it could not be parsed.
    pub preview: Option<CsvPreview>,

    /// Base URL plot sources are resolved against.
    pub server_url: Url,

    /// Whether the loading indicator is shown.
    pub loading: bool,

    /// Whether the results area is shown.
    pub results_visible: bool,

    /// Image sources as returned by the service, indexed by [`PlotSlot::index`].
    pub plot_sources: [Option<String>; 3],

    /// `"<component>: <value>"` lines, in display order.
    pub variance_lines: Vec<String>,

    /// Chartable subset of the variance summary.
    pub variance_bars: Vec<VarianceBar>,

    /// Notices waiting to be acknowledged, oldest first.
    pub alerts: Vec<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(server_url: Url) -> Self {
        Self {
            selected_file: None,
            preview: None,
            server_url,
            loading: false,
            results_visible: false,
            plot_sources: [None, None, None],
            variance_lines: Vec::new(),
            variance_bars: Vec::new(),
            alerts: Vec::new(),
            status_message: None,
        }
    }

    /// Read a newly picked file and build its preview.
    pub fn select_file(&mut self, path: &Path) {
        match load_selected_file(path) {
            Ok(file) => {
                self.preview = match preview_csv(&file.bytes) {
                    Ok(preview) => {
                        log::info!(
                            "Selected {} ({} rows, columns {:?})",
                            file.name,
                            preview.row_count,
                            preview.headers
                        );
                        Some(preview)
                    }
                    Err(e) => {
                        log::warn!("No preview for {}: {e:#}", file.name);
                        None
                    }
                };
                self.selected_file = Some(file);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Source of a plot, resolved for the image loader.
    pub fn plot_uri(&self, slot: PlotSlot) -> Option<String> {
        self.plot_sources[slot.index()]
            .as_deref()
            .map(|src| resolve_asset_url(&self.server_url, src))
    }

    /// False while a notice is waiting to be acknowledged; picking a file or
    /// starting an analysis is blocked until then.
    pub fn accepts_input(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Drop the oldest notice after the user acknowledged it.
    pub fn dismiss_alert(&mut self) {
        if !self.alerts.is_empty() {
            self.alerts.remove(0);
        }
    }
}

impl UploadView for AppState {
    fn set_loading_visible(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
    }

    fn set_plot_source(&mut self, slot: PlotSlot, src: &str) {
        self.plot_sources[slot.index()] = Some(src.to_string());
    }

    fn clear_variance(&mut self) {
        self.variance_lines.clear();
        self.variance_bars.clear();
    }

    fn push_variance_line(&mut self, line: String) {
        self.variance_lines.push(line);
    }

    fn set_variance_chart(&mut self, entries: &[VarianceEntry]) {
        self.variance_bars = entries
            .iter()
            .filter_map(|e| {
                Some(VarianceBar {
                    component: e.component.clone(),
                    percent: e.value.percent()?,
                })
            })
            .collect();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::response::VarianceValue;
    use std::io::Write;

    fn state() -> AppState {
        AppState::new(Url::parse("http://127.0.0.1:8000").unwrap())
    }

    #[test]
    fn plot_uri_resolves_relative_sources() {
        let mut state = state();
        assert_eq!(state.plot_uri(PlotSlot::Scree), None);

        state.set_plot_source(PlotSlot::Scree, "/static/Scree_1a2b3c4d.png");
        assert_eq!(
            state.plot_uri(PlotSlot::Scree).as_deref(),
            Some("http://127.0.0.1:8000/static/Scree_1a2b3c4d.png")
        );
        assert_eq!(
            state.plot_sources[PlotSlot::Scree.index()].as_deref(),
            Some("/static/Scree_1a2b3c4d.png")
        );
    }

    #[test]
    fn chart_skips_values_that_are_not_numbers() {
        let mut state = state();
        state.set_variance_chart(&[
            VarianceEntry::new("PC1", VarianceValue::Text("61.50%".into())),
            VarianceEntry::new("PC2", VarianceValue::Text("n/a".into())),
            VarianceEntry::new("PC3", VarianceValue::Number(8.0)),
        ]);
        let components: Vec<&str> = state
            .variance_bars
            .iter()
            .map(|b| b.component.as_str())
            .collect();
        assert_eq!(components, ["PC1", "PC3"]);

        state.clear_variance();
        assert!(state.variance_bars.is_empty());
    }

    #[test]
    fn alerts_queue_until_dismissed() {
        let mut state = state();
        state.alert("first");
        state.alert("second");
        state.dismiss_alert();
        assert_eq!(state.alerts, ["second"]);
        state.dismiss_alert();
        state.dismiss_alert();
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn pending_notice_blocks_input() {
        let mut state = state();
        assert!(state.accepts_input());

        state.alert("Please select a CSV file first");
        assert!(!state.accepts_input());

        state.dismiss_alert();
        assert!(state.accepts_input());
    }

    #[test]
    fn selecting_a_file_builds_preview() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"city,temp,rain\nOslo,6.1,763\nLima,19.2,6\n")
            .unwrap();

        let mut state = state();
        state.select_file(file.path());

        assert_eq!(state.selected_file.as_ref().unwrap().mime, "text/csv");
        let preview = state.preview.as_ref().unwrap();
        assert_eq!(preview.row_count, 2);
        assert_eq!(preview.variable_count(), 2);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn unreadable_file_sets_status_and_keeps_previous_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        state.selected_file = Some(SelectedFile::from_bytes("old.csv", b"a\n1\n".to_vec()));

        state.select_file(&dir.path().join("missing.csv"));

        assert_eq!(state.selected_file.as_ref().unwrap().name, "old.csv");
        assert!(state.status_message.as_ref().unwrap().starts_with("Error:"));
    }
}
