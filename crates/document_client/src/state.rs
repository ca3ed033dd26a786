//! Local mirror of the remote document collection.

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use shared::domain::{Document, DocumentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    FetchAll,
    FetchOne,
    Create,
    Update,
    Remove,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::FetchAll,
        OperationKind::FetchOne,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Remove,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::FetchAll => "fetchAll",
            OperationKind::FetchOne => "fetchOne",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// One value per [`OperationKind`]. Having a field per kind keeps the mapping
/// total; there is no way to represent a missing kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindMap<T> {
    pub fetch_all: T,
    pub fetch_one: T,
    pub create: T,
    pub update: T,
    pub remove: T,
}

impl<T> KindMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &T)> + '_ {
        OperationKind::ALL.into_iter().map(move |kind| (kind, &self[kind]))
    }
}

impl<T> Index<OperationKind> for KindMap<T> {
    type Output = T;

    fn index(&self, kind: OperationKind) -> &T {
        match kind {
            OperationKind::FetchAll => &self.fetch_all,
            OperationKind::FetchOne => &self.fetch_one,
            OperationKind::Create => &self.create,
            OperationKind::Update => &self.update,
            OperationKind::Remove => &self.remove,
        }
    }
}

impl<T> IndexMut<OperationKind> for KindMap<T> {
    fn index_mut(&mut self, kind: OperationKind) -> &mut T {
        match kind {
            OperationKind::FetchAll => &mut self.fetch_all,
            OperationKind::FetchOne => &mut self.fetch_one,
            OperationKind::Create => &mut self.create,
            OperationKind::Update => &mut self.update,
            OperationKind::Remove => &mut self.remove,
        }
    }
}

pub type StatusMap = KindMap<OperationStatus>;

/// Per-invocation token handed out by the dispatcher, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How terminal events of the same kind are reconciled when they settle out of
/// call order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Apply every terminal event as it arrives; the last response to land wins.
    #[default]
    ArrivalOrder,
    /// Drop terminal events older than the newest pending request of their kind.
    ///
    /// Staleness is tracked per kind, not per record: of two overlapping
    /// `create`s (or `remove`s of different ids) only the later call's result
    /// reaches local state, and the earlier record is neither appended nor dropped.
    LatestRequestWins,
}

impl FromStr for OrderingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "arrival_order" | "arrival" => Ok(OrderingPolicy::ArrivalOrder),
            "latest_request_wins" | "latest_wins" | "latest" => {
                Ok(OrderingPolicy::LatestRequestWins)
            }
            other => Err(format!("unknown ordering policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentsState {
    pub documents: Option<Vec<Document>>,
    pub status: StatusMap,
    pub error: Option<String>,
    pub page: u32,
    pub pages: u32,
    #[serde(skip)]
    pub(crate) ordering: OrderingPolicy,
    #[serde(skip)]
    pub(crate) latest_requests: KindMap<Option<RequestId>>,
}

impl Default for DocumentsState {
    fn default() -> Self {
        Self::new(OrderingPolicy::default())
    }
}

impl DocumentsState {
    pub fn new(ordering: OrderingPolicy) -> Self {
        Self {
            documents: Some(Vec::new()),
            status: StatusMap::default(),
            error: None,
            page: 1,
            pages: 0,
            ordering,
            latest_requests: KindMap::default(),
        }
    }

    /// Seeds the document list, leaving everything else at its initial value.
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn status_of(&self, kind: OperationKind) -> OperationStatus {
        self.status[kind]
    }

    pub fn is_loading(&self, kind: OperationKind) -> bool {
        self.status[kind] == OperationStatus::Loading
    }

    pub fn any_loading(&self) -> bool {
        self.status
            .iter()
            .any(|(_, status)| *status == OperationStatus::Loading)
    }

    pub fn documents(&self) -> &[Document] {
        self.documents.as_deref().unwrap_or_default()
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents().iter().find(|document| &document.id == id)
    }
}
