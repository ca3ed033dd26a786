use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::{
    events::DocumentAction,
    reducer::reduce,
    state::{DocumentsState, OrderingPolicy},
};

const ACTION_CHANNEL_CAPACITY: usize = 256;

/// Owns the canonical [`DocumentsState`]. All mutation goes through
/// [`DocumentStore::dispatch`], which runs the reducer inside the watch channel's
/// critical section so readers only ever see whole transitions.
pub struct DocumentStore {
    state: watch::Sender<DocumentsState>,
    actions: broadcast::Sender<DocumentAction>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_state(DocumentsState::default())
    }

    pub fn with_ordering(ordering: OrderingPolicy) -> Self {
        Self::with_state(DocumentsState::new(ordering))
    }

    pub fn with_state(initial: DocumentsState) -> Self {
        let (state, _) = watch::channel(initial);
        let (actions, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);
        Self { state, actions }
    }

    pub fn dispatch(&self, action: DocumentAction) {
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = reduce(current, &action);
        });
        debug!(
            kind = action.kind().map(|kind| kind.as_str()),
            phase = action.phase(),
            request = action.request().map(|request| request.0),
            "applied document action"
        );
        let _ = self.actions.send(action);
    }

    pub fn reset(&self) {
        self.dispatch(DocumentAction::Reset);
    }

    /// Surfaces a non-network error through the same `error` field.
    pub fn set_error(&self, message: impl Into<String>) {
        self.dispatch(DocumentAction::SetError(message.into()));
    }

    pub fn snapshot(&self) -> DocumentsState {
        self.state.borrow().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state_ref<R>(&self, f: impl FnOnce(&DocumentsState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<DocumentsState> {
        self.state.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<DocumentsState> {
        WatchStream::new(self.state.subscribe())
    }

    pub fn subscribe_actions(&self) -> broadcast::Receiver<DocumentAction> {
        self.actions.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
