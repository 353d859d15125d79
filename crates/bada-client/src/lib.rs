//! API client for the BADA operations backend.
//!
//! Provides:
//! - `ApiClient` - Single dispatch point with session-expiry handling
//! - Named feature calls (auth, announcements, attendance, purchases)
//! - Login / restore / logout flows over the session store
//! - Navigator implementations for the UI layer

pub mod auth;
pub mod dispatcher;
pub mod features;
pub mod navigation;

#[cfg(test)]
mod testing;

pub use auth::LoginOutcome;
pub use dispatcher::{ApiClient, ApiError, CallResult, SESSION_EXPIRED_MESSAGE, is_session_expired};
pub use features::PurchaseFilter;
pub use navigation::{ChannelNavigator, NoopNavigator};
