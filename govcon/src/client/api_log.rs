use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::OffsetDateTime;

pub const DEFAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiLogKind {
    Request,
    Response,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiLogEntry {
    pub timestamp: OffsetDateTime,
    pub kind: ApiLogKind,
    pub method: String,
    pub url: String,
    pub status: Option<u16>,
    pub duration: Option<Duration>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiLogStats {
    pub total: usize,
    pub errors: usize,
    pub average_duration: Option<Duration>,
}

/// Bounded, shared record of recent API traffic. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct ApiLog {
    entries: Arc<Mutex<VecDeque<ApiLogEntry>>>,
    capacity: usize,
}

impl Default for ApiLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ApiLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, entry: ApiLogEntry) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn request(&self, method: &str, url: &str) {
        self.push(ApiLogEntry {
            timestamp: OffsetDateTime::now_utc(),
            kind: ApiLogKind::Request,
            method: method.to_string(),
            url: url.to_string(),
            status: None,
            duration: None,
            error: None,
        });
    }

    pub fn response(&self, method: &str, url: &str, status: u16, duration: Duration) {
        self.push(ApiLogEntry {
            timestamp: OffsetDateTime::now_utc(),
            kind: ApiLogKind::Response,
            method: method.to_string(),
            url: url.to_string(),
            status: Some(status),
            duration: Some(duration),
            error: None,
        });
    }

    pub fn error(
        &self,
        method: &str,
        url: &str,
        status: Option<u16>,
        duration: Duration,
        error: impl Into<String>,
    ) {
        self.push(ApiLogEntry {
            timestamp: OffsetDateTime::now_utc(),
            kind: ApiLogKind::Error,
            method: method.to_string(),
            url: url.to_string(),
            status,
            duration: Some(duration),
            error: Some(error.into()),
        });
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ApiLogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> ApiLogStats {
        let Ok(entries) = self.entries.lock() else {
            return ApiLogStats::default();
        };
        let durations: Vec<Duration> = entries.iter().filter_map(|e| e.duration).collect();
        let average_duration = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<Duration>() / durations.len() as u32)
        };
        ApiLogStats {
            total: entries.len(),
            errors: entries
                .iter()
                .filter(|e| e.kind == ApiLogKind::Error)
                .count(),
            average_duration,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_drops_oldest_entries() {
        let log = ApiLog::with_capacity(3);
        for i in 0..5 {
            log.request("GET", &format!("/api/Contract/{}", i));
        }
        let recent = log.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].url, "/api/Contract/4");
        assert_eq!(recent[2].url, "/api/Contract/2");
    }

    #[test]
    fn stats_count_errors_and_average_durations() {
        let log = ApiLog::default();
        log.request("GET", "/api/LCAT");
        log.response("GET", "/api/LCAT", 200, Duration::from_millis(100));
        log.error(
            "GET",
            "/api/Resource",
            Some(500),
            Duration::from_millis(300),
            "boom",
        );

        let stats = log.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.average_duration, Some(Duration::from_millis(200)));
    }

    #[test]
    fn clones_share_the_buffer() {
        let log = ApiLog::default();
        let other = log.clone();
        other.request("DELETE", "/api/Contract/1");
        assert_eq!(log.len(), 1);
        log.clear();
        assert!(other.is_empty());
    }
}
