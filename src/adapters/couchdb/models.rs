//! CouchDB wire models

use serde::{Deserialize, Serialize};

/// Body CouchDB returns for a successful write (`POST`, `PUT`, `DELETE`)
///
/// ```json
/// {"ok":true,"id":"6e1295ed6c29495e54cc05947f18c8af","rev":"1-2902191555"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

impl WriteResult {
    /// Parses a write result out of an envelope body, if it is one
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Error body CouchDB returns alongside a non-2xx status
///
/// ```json
/// {"error":"conflict","reason":"Document update conflict."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub reason: String,
}
