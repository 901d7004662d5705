//! Deferred release of values on the event loop
//!
//! Some values are handed to callers that may still look at them for a short
//! while after the owner is done. Instead of dropping them right away they are
//! parked on the runtime and dropped after a delay. This is advisory cleanup:
//! nothing tracks outstanding users, so a use after the delay has expired is
//! still possible.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Delay used when callers have no better value
pub const DEFAULT_RELEASE_DELAY: Duration = Duration::from_secs(10);

/// Drop `value` after `delay` on the current tokio runtime.
///
/// Returns a handle that releases the value immediately when aborted. Outside
/// of a runtime the value is dropped on the spot and `None` is returned.
pub fn defer_release<T>(value: T, delay: Duration) -> Option<AbortHandle>
where
    T: Send + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        tracing::trace!("No runtime available, releasing immediately");
        return None;
    };

    let task = handle.spawn(async move {
        tokio::time::sleep(delay).await;
        drop(value);
    });

    Some(task.abort_handle())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_released_after_delay() {
        let dropped = Arc::new(AtomicBool::new(false));
        defer_release(DropFlag(dropped.clone()), DEFAULT_RELEASE_DELAY).unwrap();

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(!dropped.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_releases_early() {
        let dropped = Arc::new(AtomicBool::new(false));
        let handle = defer_release(DropFlag(dropped.clone()), DEFAULT_RELEASE_DELAY).unwrap();

        handle.abort();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_without_runtime_drops_immediately() {
        let dropped = Arc::new(AtomicBool::new(false));
        assert!(defer_release(DropFlag(dropped.clone()), DEFAULT_RELEASE_DELAY).is_none());
        assert!(dropped.load(Ordering::SeqCst));
    }
}
