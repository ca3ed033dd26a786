//! HTTP collaborator for the `/documents` resource.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Document, DocumentId},
    error::ErrorBody,
    protocol::{
        CreateDocumentRequest, CreatedDocument, DocumentPage, ListDocumentsQuery,
        RemovedDocument, UpdateDocumentRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::TransportError};

type TransportResult<T> = std::result::Result<T, TransportError>;

#[async_trait]
pub trait DocumentTransport: Send + Sync {
    async fn create(&self, input: &CreateDocumentRequest) -> TransportResult<CreatedDocument>;
    async fn update(&self, input: &UpdateDocumentRequest) -> TransportResult<Document>;
    async fn remove(&self, id: &DocumentId) -> TransportResult<RemovedDocument>;
    async fn list(&self, query: &ListDocumentsQuery) -> TransportResult<DocumentPage>;
    async fn get_by_id(&self, id: &DocumentId) -> TransportResult<Document>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> TransportResult<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(base_url)?,
            auth_token: None,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> TransportResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: parse_base_url(&settings.server_url)?,
            auth_token: settings.auth_token.clone(),
        })
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn collection_url(&self) -> TransportResult<Url> {
        Ok(self.base_url.join("documents")?)
    }

    fn document_url(&self, id: &DocumentId) -> TransportResult<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| TransportError::Other("base url cannot carry a path".to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    /// Attaches credentials for requests that change remote state.
    fn private(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn parse_base_url(raw: &str) -> TransportResult<Url> {
    // `Url::join` drops the last segment unless the base ends with a slash.
    let raw = raw.trim_end_matches('/');
    Ok(Url::parse(&format!("{raw}/"))?)
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> TransportResult<T> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();
        debug!(status = status.as_u16(), has_body = body.is_some(), "request failed");
        return Err(TransportError::status(status.as_u16(), body));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DocumentTransport for HttpTransport {
    async fn create(&self, input: &CreateDocumentRequest) -> TransportResult<CreatedDocument> {
        let url = self.collection_url()?;
        send_json(self.private(self.http.post(url).json(input))).await
    }

    async fn update(&self, input: &UpdateDocumentRequest) -> TransportResult<Document> {
        let url = self.document_url(&input.id)?;
        send_json(self.private(self.http.put(url).json(input))).await
    }

    async fn remove(&self, id: &DocumentId) -> TransportResult<RemovedDocument> {
        let url = self.document_url(id)?;
        send_json(self.private(self.http.delete(url))).await
    }

    async fn list(&self, query: &ListDocumentsQuery) -> TransportResult<DocumentPage> {
        let url = self.collection_url()?;
        send_json(self.http.get(url).query(query)).await
    }

    async fn get_by_id(&self, id: &DocumentId) -> TransportResult<Document> {
        let url = self.document_url(id)?;
        send_json(self.http.get(url)).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
