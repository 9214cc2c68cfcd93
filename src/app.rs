use std::time::Duration;

use eframe::egui;

use crate::analysis::client::AnalysisService;
use crate::controller::UploadController;
use crate::state::AppState;
use crate::ui::panels::{self, UiAction};
use crate::ui::plot;

/// Repaint interval while a request is in flight, so its outcome is picked up
/// without user input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyPcaApp<S> {
    pub state: AppState,
    pub controller: UploadController<S>,
}

impl<S: AnalysisService + 'static> RustyPcaApp<S> {
    pub fn new(state: AppState, controller: UploadController<S>) -> Self {
        Self { state, controller }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::Analyze => {
                if !self.state.accepts_input() {
                    log::debug!("analyze ignored: a notice is waiting to be acknowledged");
                    return;
                }
                let file = self.state.selected_file.clone();
                match self.controller.submit(file.as_ref(), &mut self.state) {
                    Ok(()) => {}
                    Err(e) if e.is_validation() => log::debug!("upload not started: {e}"),
                    Err(e) => log::warn!("upload could not start: {e}"),
                }
            }
            UiAction::Cancel => {
                self.controller.cancel(&mut self.state);
            }
        }
    }
}

impl<S: AnalysisService + 'static> eframe::App for RustyPcaApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll(&mut self.state);

        // ---- Top panel: menu bar ----
        let busy = self.controller.elapsed();
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state, busy))
            .inner;

        // ---- Left side panel: input file and variance summary ----
        egui::SidePanel::left("input_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::results_panel(ui, &self.state);
        });

        panels::alert_window(ctx, &mut self.state);

        if let Some(action) = action {
            self.handle(action);
        }

        if self.controller.is_busy() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::response::{
        AnalysisReport, AnalysisResult, VarianceEntry, VarianceOrder, VarianceValue,
    };
    use crate::controller::{ControllerOptions, PlotSlot, UploadView};
    use crate::data::model::SelectedFile;
    use crate::error::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;
    use url::Url;

    /// Always answers with the same report and counts its calls.
    struct FixedService {
        calls: Arc<AtomicUsize>,
    }

    impl AnalysisService for FixedService {
        fn analyze(&self, _file: &SelectedFile) -> Result<AnalysisResult, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AnalysisResult::Success(AnalysisReport {
                pca_plot: "/static/PCA_9f8e7d6c.png".into(),
                correlation_plot: "/static/Correlation_9f8e7d6c.png".into(),
                scree_plot: "/static/Scree_9f8e7d6c.png".into(),
                explained_variance: vec![
                    VarianceEntry::new("PC1", VarianceValue::Text("58.30%".into())),
                    VarianceEntry::new("PC2", VarianceValue::Text("27.45%".into())),
                ],
            }))
        }
    }

    fn app() -> (RustyPcaApp<FixedService>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let controller = UploadController::new(
            FixedService {
                calls: Arc::clone(&calls),
            },
            ControllerOptions {
                deadline: Duration::from_secs(5),
                variance_order: VarianceOrder::Server,
            },
        );
        let state = AppState::new(Url::parse("http://127.0.0.1:8000").unwrap());
        (RustyPcaApp::new(state, controller), calls)
    }

    fn settle(app: &mut RustyPcaApp<FixedService>) {
        let give_up = Instant::now() + Duration::from_secs(10);
        while app.controller.poll(&mut app.state).is_none() {
            assert!(Instant::now() < give_up, "analysis never settled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn analyze_without_file_shows_notice() {
        let (mut app, calls) = app();

        app.handle(UiAction::Analyze);

        assert_eq!(app.state.alerts, ["Please select a CSV file first"]);
        assert!(!app.state.loading);
        assert!(!app.controller.is_busy());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn analyze_renders_report_into_state() {
        let (mut app, calls) = app();
        app.state.selected_file = Some(SelectedFile::from_bytes(
            "data.csv",
            b"sample,a,b\nS1,1,2\n".to_vec(),
        ));

        app.handle(UiAction::Analyze);
        assert!(app.state.loading);
        assert!(!app.state.results_visible);
        settle(&mut app);

        assert!(app.state.results_visible);
        assert!(!app.state.loading);
        assert!(app.state.alerts.is_empty());
        assert_eq!(app.state.variance_lines, ["PC1: 58.30%", "PC2: 27.45%"]);
        assert_eq!(
            app.state.plot_uri(PlotSlot::Correlation).as_deref(),
            Some("http://127.0.0.1:8000/static/Correlation_9f8e7d6c.png")
        );
        assert_eq!(app.state.variance_bars.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn analyze_is_ignored_while_a_notice_is_pending() {
        let (mut app, calls) = app();
        app.state.selected_file = Some(SelectedFile::from_bytes("data.csv", b"a\n1\n".to_vec()));
        app.state.alert("Error: Error tokenizing data");

        app.handle(UiAction::Analyze);

        assert!(!app.controller.is_busy());
        assert!(!app.state.loading);
        assert_eq!(app.state.alerts, ["Error: Error tokenizing data"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_settles_running_analysis() {
        let (mut app, _calls) = app();
        app.state.selected_file = Some(SelectedFile::from_bytes("data.csv", b"a\n1\n".to_vec()));

        app.handle(UiAction::Analyze);
        app.handle(UiAction::Cancel);

        assert!(!app.controller.is_busy());
        assert!(!app.state.loading);
        assert!(!app.state.results_visible);
        assert_eq!(app.state.alerts, ["An error occurred: request was cancelled"]);
    }
}
