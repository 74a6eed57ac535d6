//! Destination of the script-visible `log(...)` command.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

pub trait LogSink: Send + Sync {
    fn log(&self, instance_id: &str, question_id: &str, message: &str);
}

/// Forwards script log lines to `tracing` under the `csl::script` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, instance_id: &str, question_id: &str, message: &str) {
        tracing::info!(
            target: "csl::script",
            instance = instance_id,
            question = question_id,
            "{}",
            message
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub instance_id: String,
    pub question_id: String,
    pub message: String,
}

/// Keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, instance_id: &str, question_id: &str, message: &str) {
        tracing::debug!(instance = instance_id, question = question_id, "{}", message);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                instance_id: instance_id.to_string(),
                question_id: question_id.to_string(),
                message: message.to_string(),
            });
    }
}
