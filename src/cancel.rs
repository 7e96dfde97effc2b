use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{NavoptError, Result};

/// Cooperative cancellation flag shared between a bake and its caller.
///
/// Clones observe the same flag. The pipeline polls it between iterations of
/// its outer loops and unwinds with [`NavoptError::Canceled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that has not been canceled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`CancelToken::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Cancellation checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`NavoptError::Canceled`] if cancellation was requested.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_canceled() {
            Err(NavoptError::Canceled)
        } else {
            Ok(())
        }
    }
}
