use chrono::Local;
use serde::Serialize;

const BYTES_PER_MB: f64 = 1_048_576.0;
const REPORT_TAIL: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfEntry {
    pub label: String,
    /// Milliseconds since the monitor was created.
    pub elapsed_ms: f64,
    pub heap_bytes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfReport {
    pub total_ms: f64,
    pub event_count: usize,
    pub memory_mb: Option<f64>,
    pub recent: Vec<PerfEntry>,
}

/// Append-only timing log for one page session.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    started_at: f64,
    entries: Vec<PerfEntry>,
}

impl PerformanceMonitor {
    pub fn new(now: f64) -> Self {
        Self { started_at: now, entries: Vec::new() }
    }

    pub fn record(&mut self, label: impl Into<String>, now: f64, heap_bytes: Option<f64>) {
        self.entries.push(PerfEntry {
            label: label.into(),
            elapsed_ms: now - self.started_at,
            heap_bytes,
        });
    }

    pub fn entries(&self) -> &[PerfEntry] {
        &self.entries
    }

    pub fn report(&self, now: f64, heap_bytes: Option<f64>) -> PerfReport {
        let skip = self.entries.len().saturating_sub(REPORT_TAIL);
        PerfReport {
            total_ms: now - self.started_at,
            event_count: self.entries.len(),
            memory_mb: heap_bytes.map(|bytes| bytes / BYTES_PER_MB),
            recent: self.entries[skip..].to_vec(),
        }
    }
}

impl PerfReport {
    pub fn log(&self) {
        log::info!("Performance report (statistics) at {}", Local::now().format("%H:%M:%S"));
        log::info!("Total time: {:.2} ms", self.total_ms);
        log::info!("Recorded events: {}", self.event_count);
        if let Some(mb) = self.memory_mb {
            log::info!("Memory used: {:.2} MB", mb);
        }
        for entry in &self.recent {
            log::info!("  {:>10.2} ms  {}", entry.elapsed_ms, entry.label);
        }
    }
}
