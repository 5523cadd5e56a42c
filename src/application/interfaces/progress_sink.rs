/// Receives human-readable status updates while a use case runs.
///
/// Called synchronously from the task doing the work, so implementations
/// should return quickly. Any `Fn(&str)` closure is a sink.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, status: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, status: &str) {
        self(status)
    }
}

/// Forward `status` to the sink when one is attached.
pub fn report(progress: Option<&dyn ProgressSink>, status: &str) {
    if let Some(sink) = progress {
        sink.notify(status);
    }
}
