//! In-process `/documents` server used by transport and dispatcher tests.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{Document, DocumentFields, DocumentId},
    protocol::{
        CreatedDocument, DocumentPage, ListDocumentsQuery, RemovedDocument, UpdateDocumentRequest,
    },
};
use tokio::{net::TcpListener, sync::Mutex};

pub(crate) const PAGE_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeenRequest {
    pub method: &'static str,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub(crate) struct ServerInner {
    pub documents: Vec<Document>,
    pub next_id: u64,
    pub seen: Vec<SeenRequest>,
    pub last_query: Option<ListDocumentsQuery>,
    pub last_update: Option<UpdateDocumentRequest>,
    pub fail_with: Option<(StatusCode, String)>,
}

#[derive(Clone, Default)]
pub(crate) struct ServerState {
    pub inner: Arc<Mutex<ServerInner>>,
}

impl ServerState {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let state = Self::default();
        state
            .inner
            .try_lock()
            .expect("fresh state is unlocked")
            .documents = documents;
        state
    }

    pub async fn fail_next(&self, status: StatusCode, body: impl Into<String>) {
        self.inner.lock().await.fail_with = Some((status, body.into()));
    }
}

pub(crate) fn named(id: &str, name: &str) -> Document {
    Document::new(id).with_field("name", name)
}

pub(crate) async fn spawn_document_server(state: ServerState) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/documents", get(list_documents).post(create_document))
        .route(
            "/api/documents/:id",
            get(get_document).put(update_document).delete(remove_document),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

/// Base url nothing listens on.
pub(crate) async fn unreachable_server_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/api"))
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": "not_found", "message": "document not found"})),
    )
        .into_response()
}

async fn record(state: &ServerState, method: &'static str, headers: &HeaderMap) -> Option<Response> {
    let mut inner = state.inner.lock().await;
    inner.seen.push(SeenRequest {
        method,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    inner
        .fail_with
        .take()
        .map(|(status, body)| (status, body).into_response())
}

async fn list_documents(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<ListDocumentsQuery>,
) -> Response {
    if let Some(failure) = record(&state, "GET", &headers).await {
        return failure;
    }
    let mut inner = state.inner.lock().await;
    inner.last_query = Some(query.clone());

    let matching: Vec<Document> = inner
        .documents
        .iter()
        .filter(|doc| {
            query.keyword.is_empty()
                || doc
                    .field("name")
                    .and_then(|v| v.as_str())
                    .is_some_and(|name| name.contains(&query.keyword))
        })
        .cloned()
        .collect();
    let pages = matching.len().div_ceil(PAGE_SIZE) as u32;
    let page = query.page_number.max(1);
    let documents = matching
        .into_iter()
        .skip((page as usize - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Json(DocumentPage {
        documents,
        page,
        pages,
    })
    .into_response()
}

async fn get_document(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(failure) = record(&state, "GET", &headers).await {
        return failure;
    }
    let inner = state.inner.lock().await;
    match inner.documents.iter().find(|doc| doc.id.as_str() == id) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_document(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(fields): Json<DocumentFields>,
) -> Response {
    if let Some(failure) = record(&state, "POST", &headers).await {
        return failure;
    }
    let mut inner = state.inner.lock().await;
    inner.next_id += 1;
    let data = Document {
        id: DocumentId(format!("doc-{}", inner.next_id)),
        fields,
    };
    inner.documents.push(data.clone());
    (StatusCode::CREATED, Json(CreatedDocument { data })).into_response()
}

async fn update_document(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Response {
    if let Some(failure) = record(&state, "PUT", &headers).await {
        return failure;
    }
    let mut inner = state.inner.lock().await;
    inner.last_update = Some(body.clone());
    let Some(doc) = inner.documents.iter_mut().find(|doc| doc.id.as_str() == id) else {
        return not_found();
    };
    doc.fields.extend(body.fields);
    Json(doc.clone()).into_response()
}

async fn remove_document(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(failure) = record(&state, "DELETE", &headers).await {
        return failure;
    }
    let mut inner = state.inner.lock().await;
    let Some(index) = inner.documents.iter().position(|doc| doc.id.as_str() == id) else {
        return not_found();
    };
    let removed = inner.documents.remove(index);
    Json(RemovedDocument { id: removed.id }).into_response()
}
