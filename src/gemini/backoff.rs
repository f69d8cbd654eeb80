use std::time::Duration;

/// Exponential backoff between attempts: `base * 2^attempt`.
///
/// The default base is one second so the waits go 1s, 2s, 4s, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
        }
    }
}

impl Backoff {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    /// How long to wait after `attempt` (zero based) before trying
    /// again.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor)
    }
}
