//! Cooperative cancellation for the sync loop and recompute batches.
//!
//! Nothing is interrupted mid-page or mid-batch: loops poll the token at
//! their boundaries, so every committed unit of work stays whole.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::PipelineError;

pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn cancel(&self);

    /// `Err(PipelineError::Cancelled)` once cancellation was requested.
    fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Shared flag; every clone observes the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        if !self.0.swap(true, Ordering::AcqRel) {
            tracing::info!("cancellation requested");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let worker = token.clone();
        assert!(worker.check().is_ok());
        token.cancel();
        assert!(worker.is_cancelled());
        assert!(matches!(worker.check(), Err(PipelineError::Cancelled)));
    }
}
