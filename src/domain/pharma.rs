//! Pharmaceutical batch record models
//!
//! Field names on the wire use PascalCase so documents written by this crate
//! line up with batch records already held in the store.

use super::ids::{DocumentId, Revision};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Creation payload for a batch record
///
/// Carries no identifier or revision; the store assigns both on create and
/// returns them in the response body.
///
/// # Examples
///
/// ```
/// use pharmastore::domain::pharma::PharmaDetails;
/// use chrono::NaiveDate;
///
/// let details = PharmaDetails::builder()
///     .name("Aspirin")
///     .batch_number("ASP-2025-001")
///     .expired_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(details.name, "Aspirin");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PharmaDetails {
    /// Drug name
    pub name: String,

    /// Manufacturer batch or lot number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    /// Manufacturer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Units in the batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Date the batch was manufactured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufactured_on: Option<NaiveDate>,

    /// Expiry date of the batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_on: Option<NaiveDate>,

    /// When the record was created
    pub created_on: DateTime<Utc>,
}

impl PharmaDetails {
    /// Creates a new builder for constructing PharmaDetails
    pub fn builder() -> PharmaDetailsBuilder {
        PharmaDetailsBuilder::default()
    }
}

/// Builder for constructing PharmaDetails instances
#[derive(Debug, Default)]
pub struct PharmaDetailsBuilder {
    name: Option<String>,
    batch_number: Option<String>,
    manufacturer: Option<String>,
    quantity: Option<u32>,
    manufactured_on: Option<NaiveDate>,
    expired_on: Option<NaiveDate>,
    created_on: Option<DateTime<Utc>>,
}

impl PharmaDetailsBuilder {
    /// Creates a new PharmaDetailsBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the drug name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the batch number
    pub fn batch_number(mut self, batch_number: impl Into<String>) -> Self {
        self.batch_number = Some(batch_number.into());
        self
    }

    /// Sets the manufacturer
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Sets the quantity
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the manufacture date
    pub fn manufactured_on(mut self, date: NaiveDate) -> Self {
        self.manufactured_on = Some(date);
        self
    }

    /// Sets the expiry date
    pub fn expired_on(mut self, date: NaiveDate) -> Self {
        self.expired_on = Some(date);
        self
    }

    /// Sets the creation timestamp (defaults to now)
    pub fn created_on(mut self, created_on: DateTime<Utc>) -> Self {
        self.created_on = Some(created_on);
        self
    }

    /// Builds the PharmaDetails
    ///
    /// # Errors
    ///
    /// Returns an error if the name is missing or blank, or if the expiry
    /// date precedes the manufacture date.
    pub fn build(self) -> Result<PharmaDetails, String> {
        let name = self.name.ok_or("name is required")?;
        if name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }

        if let (Some(made), Some(expires)) = (self.manufactured_on, self.expired_on) {
            if expires < made {
                return Err(format!(
                    "expiry date {expires} precedes manufacture date {made}"
                ));
            }
        }

        Ok(PharmaDetails {
            name,
            batch_number: self.batch_number,
            manufacturer: self.manufacturer,
            quantity: self.quantity,
            manufactured_on: self.manufactured_on,
            expired_on: self.expired_on,
            created_on: self.created_on.unwrap_or_else(Utc::now),
        })
    }
}

/// Update request for an existing batch record
///
/// `id` and `rev` select the target document and are never serialized into
/// the request body; see [`UpdatePharmaDetails::mutable_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePharmaDetails {
    /// Target document
    pub id: DocumentId,

    /// Revision the caller last read
    pub rev: Revision,

    /// New drug name
    pub name: String,

    /// New expiry date
    pub expired_on: NaiveDate,

    /// When this update was made
    pub updated_on: DateTime<Utc>,
}

/// The subset of an update that is sent as the request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateBody<'a> {
    pub name: &'a str,
    pub expired_on: NaiveDate,
    pub updated_on: DateTime<Utc>,
}

impl UpdatePharmaDetails {
    /// Creates an update stamped with the current time
    pub fn new(id: DocumentId, rev: Revision, name: impl Into<String>, expired_on: NaiveDate) -> Self {
        Self {
            id,
            rev,
            name: name.into(),
            expired_on,
            updated_on: Utc::now(),
        }
    }

    /// Overrides the update timestamp
    pub fn with_updated_on(mut self, updated_on: DateTime<Utc>) -> Self {
        self.updated_on = updated_on;
        self
    }

    /// Borrowed view of the fields that go into the PUT body
    pub fn mutable_fields(&self) -> UpdateBody<'_> {
        UpdateBody {
            name: &self.name,
            expired_on: self.expired_on,
            updated_on: self.updated_on,
        }
    }
}

/// Drug summary written to the audit trail
///
/// Both fields are kept as the caller supplied them; the audit line is
/// built from them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugDetails {
    pub drug_name: String,
    pub drug_expired_on: String,
}

impl DrugDetails {
    pub fn new(drug_name: impl Into<String>, drug_expired_on: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            drug_expired_on: drug_expired_on.into(),
        }
    }
}
