//! Configuration, error taxonomy, and object store backends for SignGate.
//!
//! This crate holds everything the HTTP layer needs besides the signature
//! scheme itself:
//!
//! - [`config`] - [`GateConfig`], loaded from environment variables
//! - [`error`] - [`GateError`] (request failures and their status codes),
//!   [`StoreError`] and [`ConfigError`]
//! - [`store`] - the [`ObjectStore`] trait with in-memory and filesystem
//!   implementations

pub mod config;
pub mod error;
pub mod store;

pub use config::GateConfig;
pub use error::{ConfigError, ErrorKind, GateError, StoreError};
pub use store::{
    ByteStream, FsObjectStore, InMemoryObjectStore, ObjectMetadata, ObjectStore, StoredObject,
};
