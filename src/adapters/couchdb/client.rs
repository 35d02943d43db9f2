//! HTTP client factory for the CouchDB document store
//!
//! The factory captures the base address and credentials once, at
//! construction, and hands out a freshly built [`reqwest::Client`] on every
//! call. Nothing mutable is shared between clients, so a client can never
//! carry headers left over from an earlier call.

use crate::config::{AuthScheme, CouchDbConfig};
use crate::domain::{DocumentId, PharmaError, Result, Revision, StoreFault};
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// `raw` with any userinfo removed, for logs and console output
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

/// Builds clients for one CouchDB database
///
/// # Example
///
/// ```no_run
/// use pharmastore::adapters::couchdb::ClientFactory;
/// use pharmastore::config::{secret_string, CouchDbConfig};
///
/// # fn example() -> pharmastore::domain::Result<()> {
/// let config = CouchDbConfig {
///     password: Some(secret_string("secret".to_string())),
///     ..Default::default()
/// };
/// let factory = ClientFactory::new(&config)?;
/// assert_eq!(factory.base_url().as_str(), "http://localhost:5984/");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientFactory {
    /// Store address, always ending in `/`
    base_url: Url,

    /// Database name (first path segment of every request)
    database: String,

    /// Precomputed `Authorization` value, marked sensitive
    authorization: HeaderValue,

    /// Upper bound for a single request
    timeout: Duration,

    /// Verify TLS certificates
    tls_verify: bool,
}

impl ClientFactory {
    /// Create a factory from CouchDB configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL cannot be parsed or cannot
    /// carry a path, or if the credentials do not form a valid header value.
    pub fn new(config: &CouchDbConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.url).map_err(|e| {
            PharmaError::Configuration(format!("Invalid couchdb.url '{}': {e}", config.url))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(PharmaError::Configuration(format!(
                "couchdb.url '{}' cannot be used as a base address",
                config.url
            )));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut authorization = HeaderValue::from_str(&basic_authorization(config)?)
            .map_err(|e| {
                PharmaError::Configuration(format!("Invalid credentials for Authorization: {e}"))
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            base_url,
            database: config.database.clone(),
            authorization,
            timeout: Duration::from_secs(config.timeout_seconds),
            tls_verify: config.tls_verify,
        })
    }

    /// Store base address
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// `Authorization` header value sent with every request
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds a new client with only the `Authorization` default header
    ///
    /// # Errors
    ///
    /// Returns [`StoreFault::Network`] if the TLS backend cannot be
    /// initialised.
    pub fn create_client(&self) -> std::result::Result<Client, StoreFault> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());

        let mut builder = ClientBuilder::new()
            .default_headers(headers)
            .timeout(self.timeout)
            .connect_timeout(self.timeout.min(Duration::from_secs(10)));

        if !self.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| StoreFault::Network(format!("Failed to build HTTP client: {e}")))
    }

    /// `/{db}`
    pub fn collection_url(&self) -> Url {
        self.url_for(&[self.database.as_str()])
    }

    /// `/{db}/{id}`
    pub fn document_url(&self, id: &DocumentId) -> Url {
        self.url_for(&[self.database.as_str(), id.as_str()])
    }

    /// `/{db}/{id}?rev={rev}`
    pub fn revision_url(&self, id: &DocumentId, rev: &Revision) -> Url {
        let mut url = self.document_url(id);
        url.query_pairs_mut().append_pair("rev", rev.as_str());
        url
    }

    /// Appends each segment percent-encoded, so an id containing `/` stays
    /// one path segment.
    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// `Basic base64(credential)` for the configured scheme
fn basic_authorization(config: &CouchDbConfig) -> Result<String> {
    use secrecy::ExposeSecret;

    let credential = match config.auth_scheme {
        AuthScheme::Basic => {
            let password = config.password.as_ref().ok_or_else(|| {
                PharmaError::Configuration(
                    "couchdb.password is required when auth_scheme is 'basic'".to_string(),
                )
            })?;
            let password: &str = password.expose_secret().as_ref();
            format!("{}:{password}", config.username)
        }
        AuthScheme::UsernameOnly => config.username.clone(),
    };

    let encoded = general_purpose::STANDARD.encode(credential.as_bytes());
    Ok(format!("Basic {encoded}"))
}
