//! In-process document repository
//!
//! Keeps documents in a map and applies CouchDB's revision rules: every
//! write bumps the generation, update and delete must name the current
//! revision, and a stale revision leaves the stored document untouched.
//! Used when `application.dry_run` is set and as a test double.

use super::traits::{DocumentRepository, StoreOperation};
use crate::adapters::couchdb::WriteResult;
use crate::core::OperationContext;
use crate::domain::{
    DocumentId, PharmaDetails, ResponseEnvelope, Revision, StoreFault, UpdatePharmaDetails,
};
use crate::log_store_outcome;
use async_trait::async_trait;
use rand::Rng;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;

type Outcome = std::result::Result<String, StoreFault>;

#[derive(Debug, Clone)]
struct StoredDocument {
    rev: Revision,
    fields: Map<String, Value>,
}

impl StoredDocument {
    fn body(&self, id: &str) -> Value {
        let mut body = self.fields.clone();
        body.insert("_id".to_string(), Value::String(id.to_string()));
        body.insert("_rev".to_string(), Value::String(self.rev.to_string()));
        Value::Object(body)
    }
}

/// Repository that keeps documents in memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    documents: Mutex<HashMap<String, StoredDocument>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }

    /// Current revision of a document, if it exists
    pub async fn revision_of(&self, id: &DocumentId) -> Option<Revision> {
        self.documents
            .lock()
            .await
            .get(id.as_str())
            .map(|doc| doc.rev.clone())
    }

    async fn run<F>(
        &self,
        ctx: &OperationContext,
        operation: StoreOperation,
        path: &str,
        fut: F,
    ) -> ResponseEnvelope
    where
        F: std::future::Future<Output = Outcome>,
    {
        let envelope = ResponseEnvelope::from(ctx.run(fut).await);
        log_store_outcome!(operation, path, &envelope);
        envelope
    }

    async fn insert(&self, doc: &PharmaDetails) -> Outcome {
        let fields = to_fields(doc)?;
        let id = random_hex();
        let rev = next_revision(None);

        let mut documents = self.documents.lock().await;
        documents.insert(id.clone(), StoredDocument { rev: rev.clone(), fields });
        write_result(id, &rev)
    }

    async fn fetch(&self, id: &DocumentId) -> Outcome {
        let documents = self.documents.lock().await;
        let doc = documents.get(id.as_str()).ok_or_else(not_found)?;
        Ok(doc.body(id.as_str()).to_string())
    }

    async fn replace(&self, update: &UpdatePharmaDetails) -> Outcome {
        let fields = to_fields(&update.mutable_fields())?;

        let mut documents = self.documents.lock().await;
        let doc = documents.get_mut(update.id.as_str()).ok_or_else(not_found)?;
        if doc.rev != update.rev {
            return Err(conflict());
        }

        let rev = next_revision(Some(&doc.rev));
        *doc = StoredDocument { rev: rev.clone(), fields };
        write_result(update.id.to_string(), &rev)
    }

    async fn remove(&self, id: &DocumentId, rev: &Revision) -> Outcome {
        let mut documents = self.documents.lock().await;
        let doc = documents.get(id.as_str()).ok_or_else(not_found)?;
        if &doc.rev != rev {
            return Err(conflict());
        }

        let tombstone = next_revision(Some(&doc.rev));
        documents.remove(id.as_str());
        write_result(id.to_string(), &tombstone)
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        doc: &PharmaDetails,
    ) -> ResponseEnvelope {
        self.run(ctx, StoreOperation::Create, "/", self.insert(doc))
            .await
    }

    async fn get_document(&self, ctx: &OperationContext, id: &DocumentId) -> ResponseEnvelope {
        let path = format!("/{id}");
        self.run(ctx, StoreOperation::Read, &path, self.fetch(id))
            .await
    }

    async fn update_document(
        &self,
        ctx: &OperationContext,
        update: &UpdatePharmaDetails,
    ) -> ResponseEnvelope {
        let path = format!("/{}", update.id);
        self.run(ctx, StoreOperation::Update, &path, self.replace(update))
            .await
    }

    async fn delete_document(
        &self,
        ctx: &OperationContext,
        id: &DocumentId,
        rev: &Revision,
    ) -> ResponseEnvelope {
        let path = format!("/{id}");
        self.run(ctx, StoreOperation::Delete, &path, self.remove(id, rev))
            .await
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

fn to_fields<T: Serialize>(value: &T) -> std::result::Result<Map<String, Value>, StoreFault> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreFault::Serialization(format!(
            "document must serialize to a JSON object, got {other}"
        ))),
    }
}

fn write_result(id: String, rev: &Revision) -> Outcome {
    let result = WriteResult {
        ok: true,
        id,
        rev: rev.to_string(),
    };
    Ok(serde_json::to_string(&result)?)
}

fn random_hex() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

/// `{generation}-{hex}`, one generation past `current`
fn next_revision(current: Option<&Revision>) -> Revision {
    let generation = current.and_then(Revision::generation).unwrap_or(0) + 1;
    Revision::from_parts(generation, &random_hex())
}

fn status_fault(status: StatusCode) -> StoreFault {
    StoreFault::HttpStatus {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

fn not_found() -> StoreFault {
    status_fault(StatusCode::NOT_FOUND)
}

fn conflict() -> StoreFault {
    StoreFault::ConcurrencyConflict {
        reason: StatusCode::CONFLICT
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}
