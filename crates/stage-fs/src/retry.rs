//! Destination removal with retry
//!
//! Deleting a freshly built tree can fail with permission-denied while a
//! virus scanner or indexer still holds files open. Only that failure class
//! is retried; everything else fails immediately.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use backoff::backoff::Backoff;

use crate::diagnostics::Diagnostics;
use crate::{Error, Result};

/// Knobs for [`remove_dir_all_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay unit; the wait after attempt `n` (0-based) is `base_delay * (n + 2)`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps; used by tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff::new(*self)
    }
}

/// Linearly increasing delays, bounded by an attempt count.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    policy: RetryPolicy,
    failed: u32,
}

impl LinearBackoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, failed: 0 }
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.failed = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        let attempt = self.failed;
        self.failed += 1;
        if self.failed >= self.policy.max_attempts {
            return None;
        }
        Some(self.policy.base_delay * (attempt + 2))
    }
}

/// Recursively delete `path`, retrying permission-denied failures.
pub fn remove_dir_all_with_retry(
    path: &Path,
    policy: RetryPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    remove_with_retry(path, policy, diagnostics, |p| std::fs::remove_dir_all(p))
}

pub(crate) fn remove_with_retry<F>(
    path: &Path,
    policy: RetryPolicy,
    diagnostics: &mut Diagnostics,
    mut remove: F,
) -> Result<()>
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut attempts = 0u32;
    let operation = || {
        attempts += 1;
        remove(path).map_err(|e| {
            if e.kind() == ErrorKind::PermissionDenied {
                backoff::Error::transient(e)
            } else {
                backoff::Error::permanent(e)
            }
        })
    };
    let notify = |err: std::io::Error, wait: Duration| {
        tracing::warn!(path = %path.display(), ?wait, error = %err, "Removal denied, retrying");
        diagnostics.line(format_args!(
            "PermissionError removing '{}' retrying after {:?}",
            path.display(),
            wait
        ));
    };

    match backoff::retry_notify(policy.backoff(), operation, notify) {
        Ok(()) => {
            diagnostics.line(format_args!("rmtree {}", path.display()));
            Ok(())
        }
        Err(backoff::Error::Permanent(e)) => Err(Error::io(path, e)),
        Err(backoff::Error::Transient { err, .. }) => {
            diagnostics.line(format_args!(
                "rmtree failed after {attempts} attempts, failing"
            ));
            Err(Error::RemoveRetriesExhausted {
                path: path.to_path_buf(),
                attempts,
                source: err,
            })
        }
    }
}
