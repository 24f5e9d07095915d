//! Cooperative cancellation of a running compilation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::TrellisError;

/// A clonable flag a host sets to stop a compilation.
///
/// All clones share one flag. The compiler polls it between the evaluation
/// and composition stages and between sibling nodes while composing.
///
/// ```
/// use trellis::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns [`TrellisError::Cancelled`] once cancellation was requested.
    pub(crate) fn check(&self) -> Result<(), TrellisError> {
        if self.is_cancelled() {
            Err(TrellisError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        clone.cancel();

        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(TrellisError::Cancelled)));
    }
}
