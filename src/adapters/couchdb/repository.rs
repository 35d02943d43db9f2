//! CouchDB implementation of [`DocumentRepository`]
//!
//! Each operation builds a fresh client from the [`ClientFactory`], sends
//! exactly one request, and folds the outcome into a [`ResponseEnvelope`].
//! Nothing is retried; a 409 on update or delete surfaces as a concurrency
//! conflict for the caller to resolve.

use super::client::{redact_url, ClientFactory};
use super::models::ErrorBody;
use crate::adapters::database::{DocumentRepository, StoreOperation};
use crate::config::CouchDbConfig;
use crate::core::OperationContext;
use crate::domain::{
    DocumentId, PharmaDetails, ResponseEnvelope, Result, Revision, StoreFault,
    UpdatePharmaDetails,
};
use crate::{log_store_dispatch, log_store_outcome};
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use url::Url;

/// Repository backed by a CouchDB database over HTTP
///
/// # Example
///
/// ```no_run
/// use pharmastore::adapters::couchdb::CouchRepository;
/// use pharmastore::adapters::database::DocumentRepository;
/// use pharmastore::config::{secret_string, CouchDbConfig};
/// use pharmastore::core::OperationContext;
/// use pharmastore::domain::PharmaDetails;
///
/// # async fn example() -> pharmastore::domain::Result<()> {
/// let config = CouchDbConfig {
///     password: Some(secret_string("secret".to_string())),
///     ..Default::default()
/// };
/// let repository = CouchRepository::new(&config)?;
///
/// let doc = PharmaDetails::builder().name("Aspirin").build().unwrap();
/// let envelope = repository
///     .create_document(&OperationContext::background(), &doc)
///     .await;
/// println!("{}", serde_json::to_string(&envelope).unwrap());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CouchRepository {
    factory: ClientFactory,
}

impl CouchRepository {
    /// Create a repository from CouchDB configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the factory cannot be built.
    pub fn new(config: &CouchDbConfig) -> Result<Self> {
        Ok(Self::with_factory(ClientFactory::new(config)?))
    }

    /// Create a repository around an existing factory
    pub fn with_factory(factory: ClientFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// Sends one request and maps the outcome to an envelope
    async fn dispatch(
        &self,
        ctx: &OperationContext,
        operation: StoreOperation,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> ResponseEnvelope {
        let path = url.path().to_string();
        log_store_dispatch!(operation, path);

        let result = ctx
            .run(self.execute(ctx, operation, method, url, body))
            .await;

        let envelope = ResponseEnvelope::from(result);
        log_store_outcome!(operation, path, &envelope);
        envelope
    }

    async fn execute(
        &self,
        ctx: &OperationContext,
        operation: StoreOperation,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<String, StoreFault> {
        let client = self.factory.create_client()?;
        let mut request = client.request(method, url);

        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining.min(self.factory.timeout()));
        }

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(transport_fault)?;
        read_response(operation, response).await
    }

    /// Failure envelope for faults raised before any request is sent
    fn reject(&self, operation: StoreOperation, path: &str, fault: StoreFault) -> ResponseEnvelope {
        let envelope = ResponseEnvelope::failure(&fault);
        log_store_outcome!(operation, path, &envelope);
        envelope
    }
}

#[async_trait]
impl DocumentRepository for CouchRepository {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        doc: &PharmaDetails,
    ) -> ResponseEnvelope {
        let url = self.factory.collection_url();
        match encode(doc) {
            Ok(body) => {
                self.dispatch(ctx, StoreOperation::Create, Method::POST, url, Some(body))
                    .await
            }
            Err(fault) => self.reject(StoreOperation::Create, url.path(), fault),
        }
    }

    async fn get_document(&self, ctx: &OperationContext, id: &DocumentId) -> ResponseEnvelope {
        let url = self.factory.document_url(id);
        self.dispatch(ctx, StoreOperation::Read, Method::GET, url, None)
            .await
    }

    async fn update_document(
        &self,
        ctx: &OperationContext,
        update: &UpdatePharmaDetails,
    ) -> ResponseEnvelope {
        let url = self.factory.revision_url(&update.id, &update.rev);
        match encode(&update.mutable_fields()) {
            Ok(body) => {
                self.dispatch(ctx, StoreOperation::Update, Method::PUT, url, Some(body))
                    .await
            }
            Err(fault) => self.reject(StoreOperation::Update, url.path(), fault),
        }
    }

    async fn delete_document(
        &self,
        ctx: &OperationContext,
        id: &DocumentId,
        rev: &Revision,
    ) -> ResponseEnvelope {
        let url = self.factory.revision_url(id, rev);
        self.dispatch(ctx, StoreOperation::Delete, Method::DELETE, url, None)
            .await
    }

    fn describe(&self) -> String {
        format!(
            "couchdb {}{}",
            redact_url(self.factory.base_url().as_str()),
            self.factory.database()
        )
    }
}

fn encode<T: Serialize>(value: &T) -> std::result::Result<Vec<u8>, StoreFault> {
    serde_json::to_vec(value).map_err(StoreFault::from)
}

fn transport_fault(err: reqwest::Error) -> StoreFault {
    if err.is_timeout() {
        StoreFault::Timeout(err.to_string())
    } else {
        StoreFault::Network(err.to_string())
    }
}

/// 2xx yields the body; anything else yields the store's reason text
async fn read_response(
    operation: StoreOperation,
    response: Response,
) -> std::result::Result<String, StoreFault> {
    let status = response.status();
    if status.is_success() {
        return response.text().await.map_err(transport_fault);
    }

    let reason = reason_text(&response);

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(error) => tracing::debug!(
            operation = %operation,
            status = status.as_u16(),
            error = %error.error,
            detail = %error.reason,
            "Document store returned an error status"
        ),
        Err(_) => tracing::debug!(
            operation = %operation,
            status = status.as_u16(),
            body = %body,
            "Document store returned an error status"
        ),
    }

    if status == StatusCode::CONFLICT && operation.is_revisioned() {
        Err(StoreFault::ConcurrencyConflict { reason })
    } else {
        Err(StoreFault::HttpStatus {
            status: status.as_u16(),
            reason,
        })
    }
}

/// Reason phrase from the status line
///
/// hyper only keeps the phrase when it differs from the canonical one, so
/// the canonical text stands in otherwise, then the bare code.
fn reason_text(response: &Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.as_str().to_string())
}
