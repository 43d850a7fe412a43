use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    documents_processed: AtomicU64,
    pages_processed: AtomicU64,
    empty_pages: AtomicU64,
    chunks_created: AtomicU64,
    total_processing_time_ms: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                documents_processed: AtomicU64::new(0),
                pages_processed: AtomicU64::new(0),
                empty_pages: AtomicU64::new(0),
                chunks_created: AtomicU64::new(0),
                total_processing_time_ms: AtomicU64::new(0),
            }),
        }
    }

    pub fn increment_documents_processed(&self) {
        self.inner.documents_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_pages_processed(&self, count: u64) {
        self.inner.pages_processed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_empty_pages(&self) {
        self.inner.empty_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_chunks_created(&self, count: u64) {
        self.inner.chunks_created.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_processing_time(&self, duration: Duration) {
        self.inner
            .total_processing_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn get_documents_processed(&self) -> u64 {
        self.inner.documents_processed.load(Ordering::Relaxed)
    }

    pub fn get_pages_processed(&self) -> u64 {
        self.inner.pages_processed.load(Ordering::Relaxed)
    }

    pub fn get_empty_pages(&self) -> u64 {
        self.inner.empty_pages.load(Ordering::Relaxed)
    }

    pub fn get_chunks_created(&self) -> u64 {
        self.inner.chunks_created.load(Ordering::Relaxed)
    }

    pub fn get_total_processing_time_ms(&self) -> u64 {
        self.inner.total_processing_time_ms.load(Ordering::Relaxed)
    }

    pub fn get_average_processing_time_ms(&self) -> f64 {
        let processed = self.get_documents_processed();
        if processed == 0 {
            return 0.0;
        }

        self.get_total_processing_time_ms() as f64 / processed as f64
    }

    pub fn get_average_chunks_per_document(&self) -> f64 {
        let processed = self.get_documents_processed();
        if processed == 0 {
            return 0.0;
        }

        self.get_chunks_created() as f64 / processed as f64
    }

    pub fn log_summary(&self) {
        info!(
            documents = self.get_documents_processed(),
            pages = self.get_pages_processed(),
            empty_pages = self.get_empty_pages(),
            chunks = self.get_chunks_created(),
            avg_chunks_per_document = self.get_average_chunks_per_document(),
            avg_processing_ms = self.get_average_processing_time_ms(),
            "Chunking metrics summary"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer helper to measure a processing run
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
