//! Audit trail for drug records
//!
//! Independent of the document store: records go to a local append-only
//! file through [`AuditWriter`], one base64 block per record.

pub mod writer;

pub use writer::{decode_record, encode_record, AuditWriter, SUCCESS_MARKER};
