//! Login, session restore and logout flows.

use bada_core::{ApiResult, KeyValueStore, Session, User};
use serde_json::Value;

use crate::{ApiClient, dispatcher::ApiError};

/// Shown when the backend rejects a login without a message.
pub const DEFAULT_LOGIN_FAILURE: &str = "Invalid email or password";

/// Result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Credentials accepted; the session has been stored.
    LoggedIn(Session),
    /// Credentials rejected, with the message to show.
    Rejected(String),
}

fn rejection(data: Option<&Value>, fallback: Option<&str>) -> LoginOutcome {
    let message = data
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
        .or(fallback)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_LOGIN_FAILURE);
    LoginOutcome::Rejected(message.to_string())
}

impl<K> ApiClient<K>
where
    K: KeyValueStore,
{
    /// Log in and persist the session.
    ///
    /// The backend wraps the login outcome inside `data`: a call can succeed
    /// while `data.success` is `false`. A missing inner flag counts as
    /// success. On success the token and user are stored and the navigator
    /// is sent to the dashboard.
    ///
    /// # Errors
    /// Returns error if the transport fails, the payload lacks a token or
    /// user, or the session cannot be stored.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let Some(result) = self.login(email, password).await? else {
            return Ok(LoginOutcome::Rejected(DEFAULT_LOGIN_FAILURE.to_string()));
        };

        let data = match &result {
            ApiResult::Ok { data } => data,
            ApiResult::Fail { message, .. } => return Ok(rejection(None, Some(message.as_str()))),
        };

        let accepted = data.get("success").and_then(Value::as_bool).unwrap_or(true);
        if !accepted {
            return Ok(rejection(Some(data), None));
        }

        let token = data
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::InvalidResponse("login response has no token".to_string()))?;
        let user: User = data
            .get("user")
            .cloned()
            .ok_or_else(|| ApiError::InvalidResponse("login response has no user".to_string()))
            .and_then(|u| {
                serde_json::from_value(u).map_err(|e| ApiError::InvalidResponse(e.to_string()))
            })?;

        self.session().set(token, &user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Login successful");
        self.navigate(&self.dashboard_page);

        Ok(LoginOutcome::LoggedIn(Session::new(token, user)))
    }

    /// Re-validate a stored session at startup.
    ///
    /// With no stored token nothing is sent. A valid session with a readable
    /// user sends the navigator to the dashboard and is returned; anything
    /// else clears the stored session.
    pub async fn restore_session(&self) -> Option<Session> {
        if self.session().token().await.is_none() {
            return None;
        }

        match self.validate_session().await {
            Ok(Some(result)) if result.is_ok() => {
                if let Some(session) = self.session().get().await {
                    self.navigate(&self.dashboard_page);
                    return Some(session);
                }
                tracing::warn!("Stored token has no readable user profile");
            }
            Ok(_) => tracing::info!("Stored session is no longer valid"),
            Err(e) => tracing::error!("Session validation error: {e}"),
        }

        if let Err(e) = self.session().clear().await {
            tracing::error!("Failed to clear session: {e}");
        }
        None
    }

    /// Current session for pages that need one.
    ///
    /// Without a readable session the navigator is sent to the login page.
    pub async fn require_session(&self) -> Option<Session> {
        let session = self.session().get().await;
        if session.is_none() {
            self.navigate(&self.login_page);
        }
        session
    }

    /// Log out.
    ///
    /// Notifies the backend (failures are logged), then always clears the
    /// stored session and sends the navigator to the login page.
    ///
    /// # Errors
    /// Returns error if the stored session cannot be cleared.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        if let Err(e) = self.logout().await {
            tracing::warn!("Logout request failed: {e}");
        }
        self.session().clear().await?;
        tracing::info!("Logged out");
        self.navigate(&self.login_page);
        Ok(())
    }
}
