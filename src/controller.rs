use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::analysis::client::AnalysisService;
use crate::analysis::response::{AnalysisReport, AnalysisResult, VarianceEntry, VarianceOrder};
use crate::data::model::SelectedFile;
use crate::error::{TransportError, UploadError};

// ---------------------------------------------------------------------------
// UploadView – the UI surface the controller drives
// ---------------------------------------------------------------------------

/// Which of the three result images a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotSlot {
    Pca,
    Correlation,
    Scree,
}

impl PlotSlot {
    pub const ALL: [PlotSlot; 3] = [PlotSlot::Pca, PlotSlot::Correlation, PlotSlot::Scree];

    pub fn title(self) -> &'static str {
        match self {
            PlotSlot::Pca => "PCA Biplot",
            PlotSlot::Correlation => "Correlation Matrix",
            PlotSlot::Scree => "Scree Plot",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlotSlot::Pca => 0,
            PlotSlot::Correlation => 1,
            PlotSlot::Scree => 2,
        }
    }
}

/// Ports the controller writes to. Implemented by the application state and
/// by recording fakes in tests.
pub trait UploadView {
    fn set_loading_visible(&mut self, visible: bool);
    fn set_results_visible(&mut self, visible: bool);
    /// Source is passed through verbatim.
    fn set_plot_source(&mut self, slot: PlotSlot, src: &str);
    fn clear_variance(&mut self);
    fn push_variance_line(&mut self, line: String);
    /// Numeric form of the variance summary, for views that chart it.
    fn set_variance_chart(&mut self, _entries: &[VarianceEntry]) {}
    /// Blocking notice to the user.
    fn alert(&mut self, message: &str);
}

// ---------------------------------------------------------------------------
// UploadController
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Longest a request may stay in flight before it is abandoned.
    pub deadline: Duration,
    pub variance_order: VarianceOrder,
}

type Outcome = Result<AnalysisResult, TransportError>;

struct InFlight {
    id: u64,
    file_name: String,
    started: Instant,
    rx: Receiver<Outcome>,
}

/// Runs one upload-analyze-render cycle at a time.
///
/// `submit` starts the request on a worker thread, `poll` renders its
/// outcome once it arrives. Both run on the UI thread.
pub struct UploadController<S> {
    service: Arc<S>,
    options: ControllerOptions,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl<S: AnalysisService + 'static> UploadController<S> {
    pub fn new(service: S, options: ControllerOptions) -> Self {
        Self {
            service: Arc::new(service),
            options,
            in_flight: None,
            next_id: 1,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Time since the current request started, if any.
    pub fn elapsed(&self) -> Option<Duration> {
        self.in_flight.as_ref().map(|f| f.started.elapsed())
    }

    /// Validate and start an analysis of `file`.
    ///
    /// Validation failures are alerted and returned without touching the
    /// loading/results toggles.
    pub fn submit(
        &mut self,
        file: Option<&SelectedFile>,
        view: &mut dyn UploadView,
    ) -> Result<(), UploadError> {
        let Some(file) = file else {
            return Err(reject(UploadError::NoFileSelected, view));
        };
        if let Some(current) = &self.in_flight {
            log::info!(
                "ignoring upload of {}: request #{} for {} still running",
                file.name,
                current.id,
                current.file_name
            );
            return Err(reject(UploadError::Busy, view));
        }

        view.set_loading_visible(true);
        view.set_results_visible(false);

        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let upload = file.clone();
        let spawned = thread::Builder::new()
            .name(format!("pca-upload-{id}"))
            .spawn(move || {
                let outcome = service.analyze(&upload);
                if tx.send(outcome).is_err() {
                    log::debug!("request #{id} finished after it was abandoned");
                }
            });

        if let Err(err) = spawned {
            log::error!("failed to start upload worker: {err}");
            return self.finish(Err(TransportError::WorkerLost), view);
        }

        log::info!("request #{id}: uploading {} ({} bytes)", file.name, file.len());
        self.in_flight = Some(InFlight {
            id,
            file_name: file.name.clone(),
            started: Instant::now(),
            rx,
        });
        Ok(())
    }

    /// Render the outcome of the in-flight request if it has settled.
    ///
    /// Returns `None` while nothing settled.
    pub fn poll(&mut self, view: &mut dyn UploadView) -> Option<Result<(), UploadError>> {
        let flight = self.in_flight.as_ref()?;

        let outcome = match flight.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Disconnected) => Err(TransportError::WorkerLost),
            Err(TryRecvError::Empty) => {
                if flight.started.elapsed() < self.options.deadline {
                    return None;
                }
                Err(TransportError::Timeout(self.options.deadline))
            }
        };

        Some(self.finish(outcome, view))
    }

    /// Abandon the in-flight request; a late answer is discarded.
    pub fn cancel(&mut self, view: &mut dyn UploadView) -> Option<Result<(), UploadError>> {
        self.in_flight.as_ref()?;
        Some(self.finish(Err(TransportError::Cancelled), view))
    }

    fn finish(&mut self, outcome: Outcome, view: &mut dyn UploadView) -> Result<(), UploadError> {
        let flight = self.in_flight.take();
        let (id, elapsed) = flight
            .as_ref()
            .map_or((0, Duration::ZERO), |f| (f.id, f.started.elapsed()));

        let settled = match outcome {
            Ok(AnalysisResult::Success(report)) => {
                self.render_report(report, view);
                Ok(())
            }
            Ok(AnalysisResult::Failure { error }) => Err(UploadError::Service(error)),
            Err(err) => Err(UploadError::Transport(err)),
        };

        match &settled {
            Ok(()) => log::info!("request #{id}: results rendered after {elapsed:?}"),
            Err(err @ UploadError::Service(_)) => {
                log::warn!("request #{id}: analysis failed: {err}");
                view.alert(&err.alert_text());
            }
            Err(err) => {
                log::error!("request #{id}: {err}");
                view.alert(&err.alert_text());
            }
        }

        view.set_loading_visible(false);
        settled
    }

    fn render_report(&self, report: AnalysisReport, view: &mut dyn UploadView) {
        view.set_plot_source(PlotSlot::Pca, &report.pca_plot);
        view.set_plot_source(PlotSlot::Correlation, &report.correlation_plot);
        view.set_plot_source(PlotSlot::Scree, &report.scree_plot);

        let mut entries = report.explained_variance;
        self.options.variance_order.apply(&mut entries);

        view.clear_variance();
        for entry in &entries {
            view.push_variance_line(entry.display_line());
        }
        view.set_variance_chart(&entries);

        view.set_results_visible(true);
    }
}

fn reject(err: UploadError, view: &mut dyn UploadView) -> UploadError {
    view.alert(&err.alert_text());
    err
}
