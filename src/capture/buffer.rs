use crate::media::CaptureRecord;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Per-session store of capture records
///
/// Cloning shares the same underlying buffer, so listener closures and the
/// owning session see one list. Each extraction session creates its own.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<BufferState>>,
}

#[derive(Debug)]
struct BufferState {
    records: Vec<CaptureRecord>,
    last_activity: Instant,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufferState {
                records: Vec::new(),
                last_activity: Instant::now(),
            })),
        }
    }

    // A listener that panicked mid-push must not take the session down with it
    fn state(&self) -> MutexGuard<'_, BufferState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, record: CaptureRecord) {
        self.state().records.push(record);
    }

    pub fn extend(&self, records: impl IntoIterator<Item = CaptureRecord>) {
        self.state().records.extend(records);
    }

    /// Record network activity now
    pub fn touch(&self) {
        self.state().last_activity = Instant::now();
    }

    /// Time since the last network activity
    pub fn idle_for(&self) -> Duration {
        self.state().last_activity.elapsed()
    }

    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take all records collected so far, in arrival order
    pub fn drain(&self) -> Vec<CaptureRecord> {
        std::mem::take(&mut self.state().records)
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_records() {
        let buffer = CaptureBuffer::new();
        let listener_side = buffer.clone();

        listener_side.push(CaptureRecord::new("https://a.example/1.png", "fetch"));
        listener_side.extend(vec![
            CaptureRecord::new("https://a.example/2.png", "fetch"),
            CaptureRecord::new("https://a.example/3.png", "fetch"),
        ]);

        assert_eq!(buffer.len(), 3);
        let drained = buffer.drain();
        assert_eq!(drained[0].url, "https://a.example/1.png");
        assert_eq!(drained[2].url, "https://a.example/3.png");
        assert!(listener_side.is_empty());
    }

    #[test]
    fn test_separate_buffers_are_isolated() {
        let first = CaptureBuffer::new();
        let second = CaptureBuffer::new();
        first.push(CaptureRecord::new("https://a.example/1.png", "fetch"));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_touch_resets_idle_clock() {
        let buffer = CaptureBuffer::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(buffer.idle_for() >= Duration::from_millis(20));
        buffer.touch();
        assert!(buffer.idle_for() < Duration::from_millis(20));
    }
}
