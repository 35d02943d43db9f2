//! CouchDB document store adapter
//!
//! [`ClientFactory`] owns the base address and credentials;
//! [`CouchRepository`] maps repository operations onto CouchDB's HTTP API:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | Create | `POST` | `/{db}` |
//! | Read | `GET` | `/{db}/{id}` |
//! | Update | `PUT` | `/{db}/{id}?rev={rev}` |
//! | Delete | `DELETE` | `/{db}/{id}?rev={rev}` |

pub mod client;
pub mod models;
pub mod repository;

pub use client::{redact_url, ClientFactory};
pub use models::{ErrorBody, WriteResult};
pub use repository::CouchRepository;
