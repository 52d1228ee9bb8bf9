//! Scan cancellation.
//!
//! A scan observes one [`CancelSignal`] before admitting each candidate.
//! Raising it never interrupts probes already in flight.

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// A settable-once cancellation flag shared between a scan and whoever may
/// stop it (normally the Ctrl-C handler).
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    /// Create an unraised signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Raising it again has no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the signal has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once the signal is raised.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Raise this signal on the first Ctrl-C; a second Ctrl-C exits.
    ///
    /// Must be called from within a tokio runtime.
    pub fn cancel_on_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            warn!("interrupt received, finishing in-flight probes (Ctrl-C again to quit)");
            signal.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_sticky_and_shared() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        assert!(!signal.is_cancelled());

        clone.cancel();
        clone.cancel();
        assert!(signal.is_cancelled());
        tokio_test::block_on(signal.cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves() {
        let signal = CancelSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        signal.cancel();
        handle.await.unwrap();
    }
}
