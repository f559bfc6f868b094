use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEADLINE_POLLING_PERIOD: usize = 256;

/// A cooperative cancellation token for the search of extensions.
///
/// The search polls the token at each node it explores.
/// It is cancelled when the shared flag is raised (see [`CancellationToken::cancel`]),
/// when the deadline is reached or when the number of explored nodes reaches the node limit.
///
/// Clones of a token share the same flag.
///
/// # Example
///
/// ```
/// # use wabasolver::solvers::CancellationToken;
/// # use std::time::Duration;
/// let token = CancellationToken::default().with_timeout(Duration::from_secs(60));
/// let clone = token.clone();
/// assert!(!token.is_cancelled());
/// clone.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
    node_limit: Option<usize>,
}

impl CancellationToken {
    /// Builds a token sharing the provided flag.
    pub fn new_with_flag(flag: Arc<AtomicBool>) -> Self {
        CancellationToken {
            flag,
            ..Default::default()
        }
    }

    /// Sets a deadline after which the search is cancelled.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to the current instant.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets the maximal number of search nodes.
    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    /// Raises the cancellation flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` iff the cancellation flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Checks whether the search must stop, given the number of nodes explored so far.
    ///
    /// The deadline is checked periodically.
    pub(crate) fn is_reached(&self, n_nodes: usize) -> bool {
        if self.is_cancelled() {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if n_nodes >= limit {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if n_nodes % DEADLINE_POLLING_PERIOD == 0 && Instant::now() >= deadline {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_never_cancels() {
        let token = CancellationToken::default();
        assert!(!token.is_reached(0));
        assert!(!token.is_reached(1_000_000));
    }

    #[test]
    fn test_node_limit() {
        let token = CancellationToken::default().with_node_limit(10);
        assert!(!token.is_reached(9));
        assert!(token.is_reached(10));
    }

    #[test]
    fn test_past_deadline() {
        let token = CancellationToken::default().with_deadline(Instant::now());
        assert!(token.is_reached(0));
    }

    #[test]
    fn test_shared_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let token = CancellationToken::new_with_flag(Arc::clone(&flag));
        assert!(!token.is_reached(0));
        flag.store(true, Ordering::Relaxed);
        assert!(token.is_reached(0));
    }
}
