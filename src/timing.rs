//! Named-interval timing for pairing steps.

use std::time::{Duration, Instant};

/// A finished interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Label passed to [`TimingLogger::start`].
    pub label: String,
    /// Nesting depth at the time the interval was started.
    pub depth: usize,
    /// Elapsed time between start and end.
    pub elapsed: Duration,
}

/// Records nested, named intervals and reports them through `log`.
#[derive(Debug)]
pub struct TimingLogger {
    name: String,
    open: Vec<(String, Instant)>,
    finished: Vec<Interval>,
}

impl TimingLogger {
    /// Create a logger whose reports are prefixed with `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Start a new interval nested inside any interval still open.
    pub fn start(&mut self, label: impl Into<String>) {
        self.open.push((label.into(), Instant::now()));
    }

    /// End the most recently started interval.
    ///
    /// Returns `None` when no interval is open.
    pub fn end(&mut self) -> Option<Duration> {
        let (label, started) = self.open.pop()?;
        let elapsed = started.elapsed();
        self.finished.push(Interval {
            label,
            depth: self.open.len(),
            elapsed,
        });
        Some(elapsed)
    }

    /// Time `f` as one interval.
    pub fn time<T>(&mut self, label: impl Into<String>, f: impl FnOnce() -> T) -> T {
        self.start(label);
        let result = f();
        self.end();
        result
    }

    /// Intervals finished so far, in the order they ended.
    pub fn intervals(&self) -> &[Interval] {
        &self.finished
    }

    /// Log every finished interval at debug level and return them.
    pub fn dump(&self) -> &[Interval] {
        for interval in &self.finished {
            log::debug!(
                "{}: {}{} {} ms",
                self.name,
                "  ".repeat(interval.depth),
                interval.label,
                interval.elapsed.as_millis()
            );
        }
        if !self.open.is_empty() {
            log::debug!("{}: {} interval(s) still open", self.name, self.open.len());
        }
        &self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_intervals() {
        let mut timer = TimingLogger::new("pairing");

        timer.start("handshake");
        timer.start("ecdh");
        assert!(timer.end().is_some());
        timer.start("account key");
        assert!(timer.end().is_some());
        let total = timer.end().unwrap();

        let intervals = timer.intervals();
        let labels: Vec<_> = intervals.iter().map(|i| (i.label.as_str(), i.depth)).collect();
        assert_eq!(labels, vec![("ecdh", 1), ("account key", 1), ("handshake", 0)]);
        assert!(intervals[0].elapsed <= total);
    }

    #[test]
    fn test_end_without_start() {
        let mut timer = TimingLogger::new("pairing");
        assert_eq!(timer.end(), None);
        assert!(timer.intervals().is_empty());
    }

    #[test]
    fn test_time_closure_and_dump() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut timer = TimingLogger::new("codec");
        let value = timer.time("encode", || 40 + 2);
        assert_eq!(value, 42);

        timer.start("unfinished");
        let dumped = timer.dump();
        assert_eq!(dumped.len(), 1);
        assert_eq!(dumped[0].label, "encode");
    }
}
