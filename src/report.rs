//! The reporting capability the marshaling layer calls into.
//!
//! Messages, warnings and errors are not printed here; they are handed to a
//! `Reporter` supplied by the host. `LogReporter` forwards to the `log` facade,
//! `MemoryReporter` keeps everything for the host (or a test) to inspect.

use serde::Serialize;
use std::sync::Mutex;

use crate::error::MarshalError;

/// Which outer-boundary handler produced a report.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    OutOfMemory,
    Toolkit,
    Marshal,
    Panic,
}

/// A failure as the host runtime gets to see it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub kind: ReportKind,
    pub message: String,
    /// 1-based position of the offending argument, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl HostReport {
    pub fn from_error(err: &MarshalError) -> Self {
        let kind = match err {
            MarshalError::OutOfMemory { .. } => ReportKind::OutOfMemory,
            MarshalError::InternalToolkit(_) => ReportKind::Toolkit,
            _ => ReportKind::Marshal,
        };
        let message = match kind {
            ReportKind::OutOfMemory => "Out of memory error.".to_string(),
            _ => err.to_string(),
        };
        Self {
            kind,
            message,
            position: err.position(),
        }
    }

    pub fn panic() -> Self {
        Self {
            kind: ReportKind::Panic,
            message: "Returning from toolkit in error.".to_string(),
            position: None,
        }
    }

    pub fn to_json(&self) -> Result<String, MarshalError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub trait Reporter: Send + Sync {
    fn message(&self, text: &str);
    fn warning(&self, text: &str);
    fn error(&self, report: &HostReport);
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn message(&self, text: &str) {
        log::info!("{}", text);
    }

    fn warning(&self, text: &str) {
        log::warn!("{}", text);
    }

    fn error(&self, report: &HostReport) {
        log::error!("[{:?}] {}", report.kind, report.message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    Message(String),
    Warning(String),
    Error(HostReport),
}

/// Records every report in order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<ReportEntry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ReportEntry> {
        self.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                ReportEntry::Warning(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<HostReport> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                ReportEntry::Error(report) => Some(report.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, entry: ReportEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEntry>> {
        // A poisoned lock still holds every entry recorded before the panic.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn message(&self, text: &str) {
        self.push(ReportEntry::Message(text.to_string()));
    }

    fn warning(&self, text: &str) {
        self.push(ReportEntry::Warning(text.to_string()));
    }

    fn error(&self, report: &HostReport) {
        self.push(ReportEntry::Error(report.clone()));
    }
}
