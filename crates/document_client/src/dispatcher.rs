//! Turns document intents into lifecycle events around a transport call.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::{Document, DocumentId},
    protocol::{CreateDocumentRequest, DocumentPage, ListDocumentsQuery, UpdateDocumentRequest},
};
use tracing::{info, warn};

use crate::{
    error::{Rejection, TransportError},
    events::{DocumentAction, Fulfilled},
    state::{OperationKind, RequestId},
    store::DocumentStore,
    transport::DocumentTransport,
};

pub type DispatchResult<T> = std::result::Result<T, Rejection>;

/// Each operation's pending event is applied on the first poll of its future,
/// not when the method is called; an unpolled future leaves the store untouched.
pub struct DocumentDispatcher {
    transport: Arc<dyn DocumentTransport>,
    store: Arc<DocumentStore>,
    next_request: AtomicU64,
}

impl DocumentDispatcher {
    pub fn new(transport: Arc<dyn DocumentTransport>, store: Arc<DocumentStore>) -> Self {
        Self {
            transport,
            store,
            next_request: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub async fn create(&self, input: CreateDocumentRequest) -> DispatchResult<Document> {
        let request = self.begin(OperationKind::Create);
        let result = self.transport.create(&input).await.map(|created| created.data);
        self.settle(OperationKind::Create, request, result, Fulfilled::Create)
    }

    pub async fn update(&self, input: UpdateDocumentRequest) -> DispatchResult<Document> {
        let request = self.begin(OperationKind::Update);
        let result = self.transport.update(&input).await;
        self.settle(OperationKind::Update, request, result, Fulfilled::Update)
    }

    /// Resolves to the id echoed by the server, which may differ from `id`.
    pub async fn remove(&self, id: DocumentId) -> DispatchResult<DocumentId> {
        let request = self.begin(OperationKind::Remove);
        let result = self.transport.remove(&id).await.map(|removed| removed.id);
        self.settle(OperationKind::Remove, request, result, Fulfilled::Remove)
    }

    pub async fn list(&self, page_number: u32, keyword: &str) -> DispatchResult<DocumentPage> {
        let query = ListDocumentsQuery::page(page_number).with_keyword(keyword);
        self.list_with(query).await
    }

    pub async fn list_with(&self, query: ListDocumentsQuery) -> DispatchResult<DocumentPage> {
        let request = self.begin(OperationKind::FetchAll);
        let result = self.transport.list(&query).await;
        self.settle(OperationKind::FetchAll, request, result, Fulfilled::List)
    }

    pub async fn get_by_id(&self, id: DocumentId) -> DispatchResult<Document> {
        let request = self.begin(OperationKind::FetchOne);
        let result = self.transport.get_by_id(&id).await;
        self.settle(OperationKind::FetchOne, request, result, Fulfilled::GetById)
    }

    /// Allocates a request id and applies the pending event before any I/O starts.
    fn begin(&self, kind: OperationKind) -> RequestId {
        let request = RequestId(self.next_request.fetch_add(1, Ordering::Relaxed));
        self.store.dispatch(DocumentAction::pending(kind, request));
        request
    }

    fn settle<T: Clone>(
        &self,
        kind: OperationKind,
        request: RequestId,
        result: Result<T, TransportError>,
        outcome: impl FnOnce(T) -> Fulfilled,
    ) -> DispatchResult<T> {
        match result {
            Ok(value) => {
                info!(operation = kind.as_str(), %request, "document operation fulfilled");
                self.store
                    .dispatch(DocumentAction::fulfilled(request, outcome(value.clone())));
                Ok(value)
            }
            Err(error) => {
                let message = error.rejection_message();
                warn!(
                    operation = kind.as_str(),
                    %request,
                    %error,
                    %message,
                    "document operation rejected"
                );
                self.store
                    .dispatch(DocumentAction::rejected(kind, request, message.clone()));
                Err(Rejection::new(kind, message))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
