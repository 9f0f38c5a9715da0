use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{MiningError, Result};

/// Cooperative cancellation flag shared between a caller and a running mine.
///
/// Engines poll it at every level or recursion boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(MiningError::Cancelled)
        } else {
            Ok(())
        }
    }
}
