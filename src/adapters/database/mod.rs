//! Repository abstraction layer
//!
//! This module provides the trait every document store backend implements,
//! the in-memory backend, and the factory that picks one from configuration.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_repository;
pub use memory::InMemoryRepository;
pub use traits::{DocumentRepository, StoreOperation};
