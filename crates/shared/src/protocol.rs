use serde::{Deserialize, Serialize};

use crate::domain::{Document, DocumentFields, DocumentId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(flatten)]
    pub fields: DocumentFields,
}

impl CreateDocumentRequest {
    pub fn new(fields: DocumentFields) -> Self {
        Self { fields }
    }
}

/// PUT body. The id travels both in the path and in the body; an `id` entry in
/// `fields` is dropped so the body never carries a second, conflicting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: DocumentFields,
}

impl UpdateDocumentRequest {
    pub fn new(id: impl Into<DocumentId>, mut fields: DocumentFields) -> Self {
        fields.remove("id");
        Self {
            id: id.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    #[serde(default)]
    pub keyword: String,
    pub page_number: u32,
}

impl ListDocumentsQuery {
    pub fn page(page_number: u32) -> Self {
        Self {
            keyword: String::new(),
            page_number,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }
}

/// `POST /documents` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedDocument {
    pub data: Document,
}

/// `DELETE /documents/{id}` response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
}

/// `GET /documents` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub page: u32,
    pub pages: u32,
}
