//! Pure state transitions for document lifecycle events.

use shared::domain::{Document, DocumentId};

use crate::{
    events::{DocumentAction, Fulfilled},
    state::{DocumentsState, OperationKind, OperationStatus, OrderingPolicy, RequestId, StatusMap},
};

/// Applies `action` to `state` and returns the next state. Never fails and never
/// assumes a terminal event was preceded by its pending event.
pub fn reduce(mut state: DocumentsState, action: &DocumentAction) -> DocumentsState {
    match action {
        DocumentAction::Pending { kind, request } => {
            state.status[*kind] = OperationStatus::Loading;
            let latest = &mut state.latest_requests[*kind];
            if latest.map_or(true, |seen| seen < *request) {
                *latest = Some(*request);
            }
            // Starting any operation hides the previous failure.
            state.error = None;
        }
        DocumentAction::Fulfilled { request, outcome } => {
            if is_stale(&state, outcome.kind(), *request) {
                return state;
            }
            apply_fulfilled(&mut state, outcome);
        }
        DocumentAction::Rejected {
            kind,
            request,
            message,
        } => {
            if is_stale(&state, *kind, *request) {
                return state;
            }
            state.status[*kind] = OperationStatus::Failed;
            if *kind == OperationKind::FetchAll {
                state.documents = None;
            }
            state.error = Some(message.clone());
        }
        DocumentAction::Reset => {
            state.status = StatusMap::default();
            state.error = None;
        }
        DocumentAction::SetError(message) => {
            state.error = Some(message.clone());
        }
    }
    state
}

fn is_stale(state: &DocumentsState, kind: OperationKind, request: RequestId) -> bool {
    match state.ordering {
        OrderingPolicy::ArrivalOrder => false,
        OrderingPolicy::LatestRequestWins => state.latest_requests[kind]
            .map_or(false, |latest| request < latest),
    }
}

fn apply_fulfilled(state: &mut DocumentsState, outcome: &Fulfilled) {
    state.status[outcome.kind()] = OperationStatus::Succeeded;
    match outcome {
        Fulfilled::List(page) => {
            state.documents = Some(page.documents.clone());
            state.page = page.page;
            state.pages = page.pages;
            state.error = None;
        }
        Fulfilled::GetById(document) => {
            state.documents = Some(vec![document.clone()]);
        }
        Fulfilled::Create(document) => {
            state
                .documents
                .get_or_insert_with(Vec::new)
                .push(document.clone());
        }
        Fulfilled::Update(document) => {
            if let Some(documents) = state.documents.as_mut() {
                replace_by_id(documents, document);
            }
            state.error = None;
        }
        Fulfilled::Remove(id) => {
            if let Some(documents) = state.documents.as_mut() {
                remove_by_id(documents, id);
            }
            state.error = None;
        }
    }
}

fn replace_by_id(documents: &mut [Document], updated: &Document) {
    if let Some(slot) = documents.iter_mut().find(|doc| doc.id == updated.id) {
        *slot = updated.clone();
    }
}

fn remove_by_id(documents: &mut Vec<Document>, id: &DocumentId) {
    documents.retain(|doc| &doc.id != id);
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
