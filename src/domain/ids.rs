//! Document identifier types with validation
//!
//! Newtype wrappers for the two opaque tokens the document store hands out:
//! the document id and the revision token used for optimistic concurrency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document identifier newtype wrapper
///
/// Assigned by the store on create. Treated as opaque; any non-blank string
/// is accepted.
///
/// # Examples
///
/// ```
/// use pharmastore::domain::ids::DocumentId;
/// use std::str::FromStr;
///
/// let id = DocumentId::from_str("a3f1c9e0b2").unwrap();
/// assert_eq!(id.as_str(), "a3f1c9e0b2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from a string
    ///
    /// Returns `Err` if the id is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the document ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Revision token newtype wrapper
///
/// CouchDB revisions look like `{generation}-{hash}`, but the value is only
/// ever echoed back to the store, so no format is enforced beyond non-blank.
///
/// # Examples
///
/// ```
/// use pharmastore::domain::ids::Revision;
///
/// let rev = Revision::new("1-967a00dff5e02add41819138abb3284d").unwrap();
/// assert_eq!(rev.generation(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(String);

impl Revision {
    /// Creates a new Revision from a string
    ///
    /// Returns `Err` if the revision is empty or whitespace only.
    pub fn new(rev: impl Into<String>) -> Result<Self, String> {
        let rev = rev.into();
        if rev.trim().is_empty() {
            return Err("Revision cannot be empty".to_string());
        }
        Ok(Self(rev))
    }

    /// Returns the revision as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a `{generation}-{hash}` revision
    pub fn from_parts(generation: u64, hash: &str) -> Self {
        Self(format!("{generation}-{hash}"))
    }

    /// Generation counter (the part before the first `-`), if numeric
    pub fn generation(&self) -> Option<u64> {
        self.0.split('-').next().and_then(|g| g.parse().ok())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_valid() {
        let id = DocumentId::new("6e1295ed6c29495e54cc05947f18c8af").unwrap();
        assert_eq!(id.as_str(), "6e1295ed6c29495e54cc05947f18c8af");
        assert_eq!(id.to_string(), "6e1295ed6c29495e54cc05947f18c8af");
    }

    #[test]
    fn test_document_id_empty() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("   ").is_err());
    }

    #[test]
    fn test_document_id_from_str() {
        let id: DocumentId = "aspirin-lot-7".parse().unwrap();
        assert_eq!(id.into_inner(), "aspirin-lot-7");
    }

    #[test]
    fn test_revision_generation() {
        assert_eq!(Revision::new("3-abc").unwrap().generation(), Some(3));
        assert_eq!(Revision::new("opaque").unwrap().generation(), None);
        assert_eq!(Revision::from_parts(2, "b").as_str(), "2-b");
    }

    #[test]
    fn test_revision_empty() {
        assert!(Revision::new("").is_err());
        assert!("\t".parse::<Revision>().is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = DocumentId::new("1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");

        let rev: Revision = serde_json::from_str("\"1-a\"").unwrap();
        assert_eq!(rev.as_str(), "1-a");
    }
}
