//! Bridge transport for hosts where direct cross-origin calls are blocked.
//!
//! Each call registers a uniquely named one-shot callback, then loads a
//! script from `<api_url>?callback=<name>&payload=<envelope JSON>`. The
//! backend answers with `<name>({...})`, which is routed to the waiting call
//! by name. The callback registration and the loader task are torn down when
//! the call finishes, fails, or times out.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use bada_core::{ApiResult, Envelope, Transport, TransportError};
use reqwest::Client;
use serde_json::Value;
use tokio::{sync::oneshot, task::AbortHandle};
use url::Url;
use uuid::Uuid;

use crate::protocol::{encode_envelope, parse_callback};

/// Prefix of generated callback names.
pub const CALLBACK_PREFIX: &str = "bada_cb_";

/// Loads callback scripts.
///
/// Implement this trait to plug in another loading mechanism (e.g. a
/// browser script element); `HttpScriptLoader` fetches over HTTP.
#[async_trait]
pub trait ScriptLoader: Send + Sync + 'static {
    /// Fetch the script at `url`.
    async fn load(&self, url: Url) -> Result<String, TransportError>;
}

/// Script loader using an HTTP GET.
#[derive(Debug, Clone, Default)]
pub struct HttpScriptLoader {
    client: Client,
}

impl HttpScriptLoader {
    /// Create a loader using an existing HTTP client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScriptLoader for HttpScriptLoader {
    async fn load(&self, url: Url) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Transport(format!("script load failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Transport(format!(
                "script load failed: {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Transport(format!("script load failed: {e}")))
    }
}

type Pending = Mutex<HashMap<String, oneshot::Sender<Value>>>;

struct Shared<L> {
    loader: L,
    pending: Pending,
}

impl<L> Shared<L> {
    /// Run a script loaded for `callback`.
    ///
    /// Only the callback the script was requested for can be resolved by it;
    /// a script naming any other callback is ignored.
    fn execute(&self, callback: &str, script: &str) -> Result<(), TransportError> {
        let (name, value) = parse_callback(script)?;
        if name != callback {
            tracing::warn!(expected = %callback, got = %name, "Ignoring script for another callback");
            return Ok(());
        }

        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name);

        match sender {
            Some(tx) => {
                // The receiver may already be gone if the call just timed out.
                let _ = tx.send(value);
            }
            None => tracing::debug!(callback = %name, "Ignoring response for unknown callback"),
        }
        Ok(())
    }
}

/// Removes the callback registration and stops the loader when dropped.
struct Teardown<'a> {
    pending: &'a Pending,
    name: String,
    loader: Option<AbortHandle>,
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
        if let Some(loader) = self.loader.take() {
            loader.abort();
        }
    }
}

/// Callback-bound script transport.
pub struct BridgeTransport<L = HttpScriptLoader> {
    api_url: Url,
    timeout: Duration,
    shared: Arc<Shared<L>>,
}

impl BridgeTransport<HttpScriptLoader> {
    /// Create a transport for `api_url` loading scripts over HTTP.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;
        Self::with_loader(api_url, timeout, HttpScriptLoader::new(client))
    }
}

impl<L> BridgeTransport<L>
where
    L: ScriptLoader,
{
    /// Create a transport with a custom script loader.
    ///
    /// # Errors
    /// Returns error if the URL is invalid.
    pub fn with_loader(api_url: &str, timeout: Duration, loader: L) -> Result<Self, TransportError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| TransportError::Transport(format!("invalid API URL: {e}")))?;
        Ok(Self {
            api_url,
            timeout,
            shared: Arc::new(Shared {
                loader,
                pending: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Number of calls still waiting for their callback.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn request_url(&self, callback: &str, envelope: &Envelope) -> Result<Url, TransportError> {
        let payload = encode_envelope(envelope)?;
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("callback", callback)
            .append_pair("payload", &payload);
        Ok(url)
    }
}

#[async_trait]
impl<L> Transport for BridgeTransport<L>
where
    L: ScriptLoader,
{
    async fn send(&self, envelope: &Envelope) -> Result<ApiResult, TransportError> {
        let name = format!("{CALLBACK_PREFIX}{}", Uuid::new_v4().simple());
        let url = self.request_url(&name, envelope)?;

        let (tx, rx) = oneshot::channel();
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), tx);

        let mut teardown = Teardown {
            pending: &self.shared.pending,
            name,
            loader: None,
        };

        let shared = Arc::clone(&self.shared);
        let callback = teardown.name.clone();
        let task = tokio::spawn(async move {
            let script = shared.loader.load(url).await?;
            shared.execute(&callback, &script)
        });
        teardown.loader = Some(task.abort_handle());

        // A loaded script that does not invoke our callback leaves the call
        // waiting until the timeout, like an orphaned script element.
        let load_failed = async move {
            match task.await {
                Ok(Ok(())) => std::future::pending::<Result<Value, TransportError>>().await,
                Ok(Err(e)) => Err(e),
                Err(e) => Err(TransportError::Transport(e.to_string())),
            }
        };

        let outcome = tokio::time::timeout(self.timeout, async {
            tokio::select! {
                biased;
                delivered = rx => delivered
                    .map_err(|_| TransportError::Transport("callback was torn down".to_string())),
                failed = load_failed => failed,
            }
        })
        .await;

        drop(teardown);

        match outcome {
            Ok(Ok(value)) => Ok(ApiResult::from_value(value)),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}
