//! Persistent session store for the BADA operations API client.
//!
//! Provides:
//! - `SessionStore` - Token + user lifecycle over key-value storage
//! - Storage implementations (memory, JSON file)

pub mod store;
pub mod storage;

pub use store::SessionStore;
