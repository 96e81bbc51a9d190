//! Save policies and the background save worker.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Controls when a bound table writes itself to its backing file.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Only write when you call `flush()` or `save()` yourself.
    #[default]
    Manual,
    /// Write after every mutation. Safest, but most I/O.
    Immediate,
    /// Worker thread writes on a timer and whenever the table changes, plus
    /// once more when the table is dropped.
    Background(Duration),
}

impl SavePolicy {
    /// `true` for policies that write without being asked.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        !matches!(self, SavePolicy::Manual)
    }
}

/// Thread that runs a save closure on a timer or when nudged through the
/// channel. The table owns the sender; dropping it disconnects the channel,
/// which makes the worker save one last time and exit.
pub(crate) struct BackgroundSaver {
    join_handle: Option<thread::JoinHandle<()>>,
}

impl BackgroundSaver {
    pub(crate) fn spawn<F>(interval: Duration, save: F, nudges: Receiver<()>) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let join_handle = thread::spawn(move || loop {
            match nudges.recv_timeout(interval) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => save(),
                Err(RecvTimeoutError::Disconnected) => {
                    save();
                    break;
                }
            }
        });

        Self {
            join_handle: Some(join_handle),
        }
    }
}

/// Channel for change nudges. Capacity one: a nudge sent while another is
/// pending is dropped, the pending one already covers it.
pub(crate) fn nudge_channel() -> (mpsc::SyncSender<()>, Receiver<()>) {
    mpsc::sync_channel(1)
}

impl Drop for BackgroundSaver {
    // Only joins: the sender must already be gone or this blocks forever.
    fn drop(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn disconnect_triggers_final_save() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let (tx, rx) = nudge_channel();
        let worker = BackgroundSaver::spawn(
            Duration::from_secs(60),
            move || {
                seen.fetch_add(1, Ordering::SeqCst);
            },
            rx,
        );
        drop(tx);
        drop(worker);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn manual_is_default_and_not_automatic() {
        assert_eq!(SavePolicy::default(), SavePolicy::Manual);
        assert!(!SavePolicy::Manual.is_automatic());
        assert!(SavePolicy::Immediate.is_automatic());
        assert!(SavePolicy::Background(Duration::from_millis(5)).is_automatic());
    }
}
