use std::sync::Mutex;

/// Narrow logging collaborator. Side-effect only; implementations must
/// never fail or influence the caller's control flow.
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str);
}

/// Forwards to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn debug(&self, message: &str) {
        log::debug!(target: "hmi_core", "{}", message);
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
