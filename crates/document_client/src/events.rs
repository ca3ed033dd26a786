//! Lifecycle events applied to [`DocumentsState`](crate::state::DocumentsState).

use shared::{
    domain::{Document, DocumentId},
    protocol::DocumentPage,
};

use crate::state::{OperationKind, RequestId};

/// Payload of a successful operation, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfilled {
    List(DocumentPage),
    GetById(Document),
    Create(Document),
    Update(Document),
    Remove(DocumentId),
}

impl Fulfilled {
    pub fn kind(&self) -> OperationKind {
        match self {
            Fulfilled::List(_) => OperationKind::FetchAll,
            Fulfilled::GetById(_) => OperationKind::FetchOne,
            Fulfilled::Create(_) => OperationKind::Create,
            Fulfilled::Update(_) => OperationKind::Update,
            Fulfilled::Remove(_) => OperationKind::Remove,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentAction {
    Pending {
        kind: OperationKind,
        request: RequestId,
    },
    Fulfilled {
        request: RequestId,
        outcome: Fulfilled,
    },
    Rejected {
        kind: OperationKind,
        request: RequestId,
        message: String,
    },
    Reset,
    SetError(String),
}

impl DocumentAction {
    pub fn pending(kind: OperationKind, request: RequestId) -> Self {
        DocumentAction::Pending { kind, request }
    }

    pub fn fulfilled(request: RequestId, outcome: Fulfilled) -> Self {
        DocumentAction::Fulfilled { request, outcome }
    }

    pub fn rejected(kind: OperationKind, request: RequestId, message: impl Into<String>) -> Self {
        DocumentAction::Rejected {
            kind,
            request,
            message: message.into(),
        }
    }

    /// Operation kind the event belongs to; `None` for the synchronous actions.
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            DocumentAction::Pending { kind, .. } | DocumentAction::Rejected { kind, .. } => {
                Some(*kind)
            }
            DocumentAction::Fulfilled { outcome, .. } => Some(outcome.kind()),
            DocumentAction::Reset | DocumentAction::SetError(_) => None,
        }
    }

    pub fn request(&self) -> Option<RequestId> {
        match self {
            DocumentAction::Pending { request, .. }
            | DocumentAction::Fulfilled { request, .. }
            | DocumentAction::Rejected { request, .. } => Some(*request),
            DocumentAction::Reset | DocumentAction::SetError(_) => None,
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            DocumentAction::Pending { .. } => "pending",
            DocumentAction::Fulfilled { .. } => "fulfilled",
            DocumentAction::Rejected { .. } => "rejected",
            DocumentAction::Reset => "reset",
            DocumentAction::SetError(_) => "set_error",
        }
    }
}
