use std::sync::Arc;

use tokio::sync::watch;

use crate::state::params::{CompositionParams, initialize};
use crate::state::patch::{ParamsPatch, apply_patch};

/// Shared, cloneable handle to the current [`CompositionParams`].
///
/// Every clone refers to the same state. Subscribers receive a [`watch::Receiver`] that always
/// yields the most recent version, so a burst of patches collapses into one observed change.
#[derive(Clone, Debug)]
pub struct StateStore {
    tx: Arc<watch::Sender<Arc<CompositionParams>>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Store seeded with the documented defaults.
    pub fn new() -> Self {
        Self::with_params(initialize())
    }

    /// Store seeded with explicit parameters.
    pub fn with_params(params: CompositionParams) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(params));
        Self { tx: Arc::new(tx) }
    }

    /// Current parameter version.
    pub fn snapshot(&self) -> Arc<CompositionParams> {
        self.tx.borrow().clone()
    }

    /// Apply `patch` to the current version, publish the result and return it.
    pub fn apply(&self, patch: &ParamsPatch) -> Arc<CompositionParams> {
        let mut published = None;
        self.tx.send_modify(|current| {
            let next = Arc::new(apply_patch(current, patch));
            *current = next.clone();
            published = Some(next);
        });
        tracing::debug!(
            empty = patch.is_empty(),
            receivers = self.tx.receiver_count(),
            "state patch applied"
        );
        published.unwrap_or_else(|| self.snapshot())
    }

    /// Replace the whole parameter set.
    pub fn replace(&self, params: CompositionParams) -> Arc<CompositionParams> {
        let next = Arc::new(params);
        self.tx.send_replace(next.clone());
        next
    }

    /// Subscribe to parameter changes.
    ///
    /// The returned receiver starts with the current version marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CompositionParams>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
