//! Session lifecycle over key-value storage.

use bada_core::{
    ApiConfig, KeyValueStore, Session, StorageError, User,
    config::{TOKEN_KEY, USER_KEY},
};

/// Persistent session store.
///
/// Keeps the auth token and the serialized user profile under two fixed
/// keys. Both are written and removed in a single storage operation.
pub struct SessionStore<K> {
    storage: K,
    token_key: String,
    user_key: String,
}

impl<K> SessionStore<K>
where
    K: KeyValueStore,
{
    /// Create a store using the default `bada_auth_token` / `bada_user` keys.
    #[must_use]
    pub fn new(storage: K) -> Self {
        Self::with_keys(storage, TOKEN_KEY, USER_KEY)
    }

    /// Create a store using the keys from `config`.
    #[must_use]
    pub fn from_config(storage: K, config: &ApiConfig) -> Self {
        Self::with_keys(storage, &config.token_key, &config.user_key)
    }

    /// Create a store using custom keys.
    #[must_use]
    pub fn with_keys(storage: K, token_key: &str, user_key: &str) -> Self {
        Self {
            storage,
            token_key: token_key.to_string(),
            user_key: user_key.to_string(),
        }
    }

    /// Underlying storage.
    pub const fn storage(&self) -> &K {
        &self.storage
    }

    /// Current auth token, if any.
    ///
    /// Storage failures are logged and read as "no token".
    pub async fn token(&self) -> Option<String> {
        match self.storage.get(&self.token_key).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read auth token: {e}");
                None
            }
        }
    }

    /// Current session.
    ///
    /// Returns `None` unless both token and a parseable user profile are
    /// stored. Malformed profiles and storage failures are logged, never
    /// returned.
    pub async fn get(&self) -> Option<Session> {
        let token = self.token().await?;

        let raw = match self.storage.get(&self.user_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read user profile: {e}");
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!("Failed to parse user data: {e}");
                None
            }
        }
    }

    /// Store a new session.
    ///
    /// # Errors
    /// Returns error if the profile cannot be serialized or storage fails.
    pub async fn set(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let profile = serde_json::to_string(user)?;
        self.storage
            .set_many(vec![
                (self.token_key.clone(), token.to_string()),
                (self.user_key.clone(), profile),
            ])
            .await
    }

    /// Remove token and user profile.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .remove_many(&[self.token_key.as_str(), self.user_key.as_str()])
            .await
    }
}
