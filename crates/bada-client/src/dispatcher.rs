//! Single dispatch point for every backend call.

use std::sync::Arc;

use bada_core::{
    ApiConfig, ApiResult, Envelope, KeyValueStore, Navigator, Payload, StorageError, Transport,
    TransportError, envelope::SESSION_EXPIRED_CODE,
};
use bada_session::SessionStore;
use thiserror::Error;

use crate::navigation::NoopNavigator;

/// Failure message substring the backend uses to signal an expired session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Invalid or expired session";

/// API client error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport failed; the cause is logged, not shown.
    #[error("Failed to connect to server. Please check your connection.")]
    Connection(#[source] TransportError),
    /// Session storage could not be updated.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// The backend answered with an unusable payload.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Outcome of a dispatched call.
///
/// `Ok(None)` means the session had expired and the client already cleared
/// it and redirected; callers should do nothing further.
pub type CallResult = Result<Option<ApiResult>, ApiError>;

/// Whether `result` is the backend's expired-session signal.
///
/// Matches a failure whose message contains [`SESSION_EXPIRED_MESSAGE`]
/// (case-sensitive), or whose error code is `SESSION_EXPIRED`. Successful
/// results never match.
#[must_use]
pub fn is_session_expired(result: &ApiResult) -> bool {
    match result {
        ApiResult::Ok { .. } => false,
        ApiResult::Fail {
            message,
            error_code,
        } => {
            message.contains(SESSION_EXPIRED_MESSAGE)
                || error_code.as_deref() == Some(SESSION_EXPIRED_CODE)
        }
    }
}

/// API client: builds envelopes, sends them, and handles session expiry.
pub struct ApiClient<K> {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore<K>>,
    navigator: Arc<dyn Navigator>,
    pub(crate) login_page: String,
    pub(crate) dashboard_page: String,
}

impl<K> ApiClient<K>
where
    K: KeyValueStore,
{
    /// Create a client with default pages and a logging-only navigator.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore<K>>) -> Self {
        let defaults = ApiConfig::default();
        Self {
            transport,
            session,
            navigator: Arc::new(NoopNavigator),
            login_page: defaults.login_page,
            dashboard_page: defaults.dashboard_page,
        }
    }

    /// Create a client using the transport and pages selected by `config`.
    ///
    /// # Errors
    /// Returns error if the transport cannot be built.
    pub fn from_config(
        config: &ApiConfig,
        session: Arc<SessionStore<K>>,
    ) -> Result<Self, TransportError> {
        let transport = bada_transport::from_config(config)?;
        Ok(Self::new(transport, session).with_pages(&config.login_page, &config.dashboard_page))
    }

    /// Set the navigator receiving redirects.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Set the login and dashboard pages.
    #[must_use]
    pub fn with_pages(mut self, login_page: &str, dashboard_page: &str) -> Self {
        self.login_page = login_page.to_string();
        self.dashboard_page = dashboard_page.to_string();
        self
    }

    /// Session store shared with the UI.
    #[must_use]
    pub fn session(&self) -> &SessionStore<K> {
        &self.session
    }

    pub(crate) fn navigate(&self, page: &str) {
        self.navigator.redirect(page);
    }

    /// Send `action` with `data` and the current token.
    ///
    /// On the expired-session signal the stored session is cleared, the
    /// navigator is sent to the login page and `Ok(None)` is returned.
    /// Application failures are returned as `ApiResult::Fail`.
    ///
    /// # Errors
    /// Returns [`ApiError::Connection`] if the transport fails.
    pub async fn call(&self, action: &str, data: Payload) -> CallResult {
        let token = self.session.token().await;
        let envelope = Envelope::new(action, data, token);
        tracing::debug!(action, authenticated = envelope.token.is_some(), "API call");

        let result = self.transport.send(&envelope).await.map_err(|e| {
            tracing::error!(action, "API Error: {e}");
            ApiError::Connection(e)
        })?;

        if is_session_expired(&result) {
            tracing::info!(action, "Session expired, signing out");
            if let Err(e) = self.session.clear().await {
                tracing::error!("Failed to clear session: {e}");
            }
            self.navigate(&self.login_page);
            return Ok(None);
        }

        Ok(Some(result))
    }
}
