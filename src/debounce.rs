use std::time::{Duration, Instant};

/// Coalesces rapid reconfiguration into a single render request.
///
/// The owner calls [`request`](Self::request) on every configuration
/// change and polls [`take_ready`](Self::take_ready) from its event loop;
/// only the last request within `delay` fires. The value lives inside the
/// owning component, so dropping the component drops any pending request
/// with it; there is no shared timer handle and no background thread.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debounce window starting at `now`.
    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the window has elapsed; consumes the pending request.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Discard any pending request.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.request(t0);
        assert!(d.is_pending());
        assert!(!d.take_ready(t0 + Duration::from_millis(99)));
        assert!(d.take_ready(t0 + Duration::from_millis(100)));
        assert!(!d.is_pending());
    }

    #[test]
    fn rearming_extends_the_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.request(t0);
        d.request(t0 + Duration::from_millis(80));
        assert!(!d.take_ready(t0 + Duration::from_millis(150)));
        assert!(d.take_ready(t0 + Duration::from_millis(180)));
    }

    #[test]
    fn take_ready_consumes_the_request() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.request(t0);
        assert!(d.take_ready(t0 + Duration::from_millis(10)));
        assert!(!d.take_ready(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn cancel_discards_pending_request() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.request(t0);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.take_ready(t0 + Duration::from_secs(1)));
    }
}
