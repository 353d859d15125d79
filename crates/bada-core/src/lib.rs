//! Core abstractions for the BADA operations API client.
//!
//! This crate provides the fundamental building blocks:
//! - `Envelope` / `ApiResult` - Request and normalized response shapes
//! - `Session` / `User` / `Role` / `Branch` - Authenticated user model
//! - `ApiConfig` - Endpoint, storage keys and transport selection
//! - Transport, key-value storage and navigation traits

pub mod branch;
pub mod config;
pub mod envelope;
pub mod session;
pub mod traits;

pub use branch::Branch;
pub use config::{ApiConfig, ConfigError, TransportKind};
pub use envelope::{ApiResult, Envelope, Payload};
pub use session::{Role, Session, User, UserId};
pub use traits::{KeyValueStore, Navigator, StorageError, Transport, TransportError};
