//! On-screen message log, fed by the app itself and by `log` records.
//!
//! The terminal is in raw mode on the alternate screen, so records emitted
//! through the `log` facade are queued by [`LogSink`] and drained into the
//! [`MessageLog`] on the next update instead of being printed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Style of a log entry, mapped to display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    Normal,
    Info,
    Warn,
    Error,
}

impl From<Level> for LogStyle {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Self::Error,
            Level::Warn => Self::Warn,
            Level::Info => Self::Info,
            Level::Debug | Level::Trace => Self::Normal,
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub style: LogStyle,
    pub dups: u32,
}

impl LogEntry {
    /// The entry as displayed, with a repeat count when it was deduplicated.
    pub fn display(&self) -> String {
        if self.dups > 0 {
            format!("{} ({}x)", self.text, self.dups + 1)
        } else {
            self.text.clone()
        }
    }
}

const MAX_ENTRIES: usize = 1000;

/// The message log shown under the pages.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message with a given style.
    pub fn log_styled(&mut self, text: &str, style: LogStyle) {
        let text = uppercase_first(text);

        if let Some(last) = self.entries.last_mut() {
            if last.text == text && last.style == style {
                last.dups += 1;
                return;
            }
        }

        self.entries.push(LogEntry {
            text,
            style,
            dups: 0,
        });

        if self.entries.len() > MAX_ENTRIES {
            self.entries.drain(0..MAX_ENTRIES / 10);
        }
    }

    pub fn log(&mut self, text: &str) {
        self.log_styled(text, LogStyle::Normal);
    }

    pub fn error(&mut self, text: &str) {
        self.log_styled(text, LogStyle::Error);
    }

    /// Move every queued record into the log.
    pub fn pull(&mut self, queue: &LogQueue) {
        for (level, text) in queue.drain() {
            self.log_styled(&text, level.into());
        }
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Records waiting to be shown, shared between [`LogSink`] and the model.
#[derive(Debug, Clone, Default)]
pub struct LogQueue {
    inner: Arc<Mutex<VecDeque<(Level, String)>>>,
}

impl LogQueue {
    pub fn push(&self, level: Level, text: String) {
        if let Ok(mut q) = self.inner.lock() {
            q.push_back((level, text));
            // Nobody is draining: drop the oldest.
            if q.len() > MAX_ENTRIES {
                q.pop_front();
            }
        }
    }

    pub fn drain(&self) -> Vec<(Level, String)> {
        match self.inner.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// A `log` backend that queues records from the pathstep crates.
pub struct LogSink {
    queue: LogQueue,
    level: LevelFilter,
}

impl LogSink {
    pub fn new(queue: LogQueue, level: LevelFilter) -> Self {
        Self { queue, level }
    }

    /// Install as the global logger and return the queue it feeds.
    pub fn install(level: LevelFilter) -> Result<LogQueue, log::SetLoggerError> {
        let queue = LogQueue::default();
        log::set_boxed_logger(Box::new(Self::new(queue.clone(), level)))?;
        log::set_max_level(level);
        Ok(queue)
    }
}

impl Log for LogSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("pathstep")
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.queue.push(record.level(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_duplicates_are_folded() {
        let mut log = MessageLog::new();
        log.log("no path found");
        log.log("no path found");
        log.error("no path found");
        assert_eq!(log.len(), 2);
        assert_eq!(log.recent(2)[0].display(), "No path found (2x)");
        assert_eq!(log.recent(1)[0].style, LogStyle::Error);
    }

    #[test]
    fn recent_returns_newest_in_order() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.log(&format!("m{i}"));
        }
        let texts: Vec<_> = log.recent(3).iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["M2", "M3", "M4"]);
        assert_eq!(log.recent(10).len(), 5);
    }

    #[test]
    fn sink_filters_by_level_and_target() {
        let queue = LogQueue::default();
        let sink = LogSink::new(queue.clone(), LevelFilter::Info);
        let record = |level, target, msg| {
            sink.log(
                &Record::builder()
                    .level(level)
                    .target(target)
                    .args(format_args!("{msg}"))
                    .build(),
            );
        };
        record(Level::Info, "pathstep_search::grid", "grid BFS finished");
        record(Level::Debug, "pathstep_search::grid", "set up");
        record(Level::Warn, "crossterm", "ignored");

        let mut log = MessageLog::new();
        log.pull(&queue);
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(1)[0].text, "Grid BFS finished");
        assert_eq!(log.recent(1)[0].style, LogStyle::Info);
        assert!(queue.drain().is_empty());
    }
}
