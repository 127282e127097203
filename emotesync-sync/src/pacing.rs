//! Pacing between remote mutations.
//!
//! The remote API enforces a workspace-wide rate limit on emote mutations.
//! The engine calls [`Pacer::pause`] after every successful create; the
//! default policy is a static delay that ignores any rate-limit metadata.

use std::time::Duration;

/// Delay inserted after each successful emote creation.
pub const PACING_INTERVAL: Duration = Duration::from_secs(2);

/// Policy deciding how long to wait between mutations.
pub trait Pacer {
    fn pause(&mut self);
}

/// Sleep the current thread for a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(PACING_INTERVAL)
    }
}

impl Pacer for FixedDelay {
    fn pause(&mut self) {
        tracing::debug!("pacing: sleeping {:?}", self.0);
        std::thread::sleep(self.0);
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self) {
        (**self).pause();
    }
}
