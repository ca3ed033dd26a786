pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod reducer;
pub mod state;
pub mod store;
pub mod transport;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use config::{load_settings, normalize_server_url, ClientSettings};
pub use dispatcher::{DispatchResult, DocumentDispatcher};
pub use error::{Rejection, TransportError};
pub use events::{DocumentAction, Fulfilled};
pub use reducer::reduce;
pub use state::{
    DocumentsState, KindMap, OperationKind, OperationStatus, OrderingPolicy, RequestId, StatusMap,
};
pub use store::DocumentStore;
pub use transport::{DocumentTransport, HttpTransport};

use std::sync::Arc;

/// Wires an HTTP transport and a fresh store from `settings`.
pub fn connect(settings: &ClientSettings) -> Result<DocumentDispatcher, TransportError> {
    let transport = HttpTransport::from_settings(settings)?;
    let store = Arc::new(DocumentStore::with_ordering(settings.ordering));
    Ok(DocumentDispatcher::new(Arc::new(transport), store))
}
