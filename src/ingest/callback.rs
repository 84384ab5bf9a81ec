//! Caller-facing callback interface for streamed uploads

use super::report::ReportArtifact;

/// Receives the progress and outcome of one upload.
///
/// `on_progress` fires zero or more times, then exactly one of `on_error`
/// or `on_complete`.
pub trait IngestionCallback: Send {
    /// `percent` is within `0..=100`
    fn on_progress(&mut self, percent: u8, message: &str);

    fn on_error(&mut self, message: &str);

    /// `None` when the job finished but no report could be downloaded.
    fn on_complete(&mut self, report: Option<ReportArtifact>);
}

impl<T: IngestionCallback + ?Sized> IngestionCallback for &mut T {
    fn on_progress(&mut self, percent: u8, message: &str) {
        (**self).on_progress(percent, message)
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message)
    }

    fn on_complete(&mut self, report: Option<ReportArtifact>) {
        (**self).on_complete(report)
    }
}

impl<T: IngestionCallback + ?Sized> IngestionCallback for Box<T> {
    fn on_progress(&mut self, percent: u8, message: &str) {
        (**self).on_progress(percent, message)
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message)
    }

    fn on_complete(&mut self, report: Option<ReportArtifact>) {
        (**self).on_complete(report)
    }
}

type ProgressFn = Box<dyn FnMut(u8, &str) + Send>;
type ErrorFn = Box<dyn FnMut(&str) + Send>;
type CompleteFn = Box<dyn FnMut(Option<ReportArtifact>) + Send>;

/// Closure-based [`IngestionCallback`]; unset hooks do nothing.
#[derive(Default)]
pub struct IngestionCallbacks {
    on_progress: Option<ProgressFn>,
    on_error: Option<ErrorFn>,
    on_complete: Option<CompleteFn>,
}

impl IngestionCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, f: impl FnMut(u8, &str) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn with_error(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn with_complete(mut self, f: impl FnMut(Option<ReportArtifact>) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl IngestionCallback for IngestionCallbacks {
    fn on_progress(&mut self, percent: u8, message: &str) {
        if let Some(f) = self.on_progress.as_mut() {
            f(percent, message);
        }
    }

    fn on_error(&mut self, message: &str) {
        if let Some(f) = self.on_error.as_mut() {
            f(message);
        }
    }

    fn on_complete(&mut self, report: Option<ReportArtifact>) {
        if let Some(f) = self.on_complete.as_mut() {
            f(report);
        }
    }
}
