use std::sync::atomic::{AtomicU8, Ordering};

/// Maps heterogeneous sub-stage progress onto one 0-100 scale.
///
/// The download phase owns the [0, 50] half; transcription has no partial
/// signal and jumps straight to 100 on completion. Values forwarded to the
/// callback never decrease within a run, except for an explicit `reset`.
pub struct ProgressReporter {
    callback: Box<dyn Fn(u8) + Send + Sync>,
    floor: AtomicU8,
}

impl ProgressReporter {
    pub fn new(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            floor: AtomicU8::new(0),
        }
    }

    /// Reports bytes downloaded against the best available total, scaled to
    /// [0, 50]. Emits nothing when no total or estimate is known.
    pub fn downloading(&self, downloaded_bytes: u64, total_bytes: Option<u64>) {
        let Some(total) = total_bytes.filter(|t| *t > 0) else {
            return;
        };
        let scaled = (downloaded_bytes.min(total) as f64 / total as f64 * 50.0) as u8;
        self.emit(scaled.min(50));
    }

    /// Terminal value once transcription has returned.
    pub fn finished(&self) {
        self.emit(100);
    }

    /// Drops back to zero. Used at the start of every acquisition and when
    /// acquisition fails, so a stale non-terminal value is never left behind.
    pub fn reset(&self) {
        self.floor.store(0, Ordering::SeqCst);
        (self.callback)(0);
    }

    fn emit(&self, value: u8) {
        let previous = self.floor.fetch_max(value, Ordering::SeqCst);
        if value > previous {
            (self.callback)(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording_reporter() -> (ProgressReporter, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::new(move |value| sink.lock().unwrap().push(value));
        (reporter, seen)
    }

    #[test]
    fn download_phase_never_exceeds_fifty() {
        let (reporter, seen) = recording_reporter();
        reporter.downloading(10, Some(100));
        reporter.downloading(100, Some(100));
        reporter.downloading(500, Some(100));
        assert!(seen.lock().unwrap().iter().all(|v| *v <= 50));
    }

    #[test]
    fn values_are_monotonic_within_a_run() {
        let (reporter, seen) = recording_reporter();
        reporter.downloading(40, Some(100));
        reporter.downloading(20, Some(100));
        reporter.downloading(80, Some(100));
        reporter.finished();
        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![20, 40, 100]);
    }

    #[test]
    fn no_emission_without_a_total() {
        let (reporter, seen) = recording_reporter();
        reporter.downloading(1024, None);
        reporter.downloading(2048, Some(0));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn reset_reports_zero_and_drops_the_floor() {
        let (reporter, seen) = recording_reporter();
        reporter.downloading(50, Some(100));
        reporter.reset();
        reporter.downloading(10, Some(100));
        assert_eq!(*seen.lock().unwrap(), vec![25, 0, 5]);
    }
}
