//! Test doubles for the dispatcher and feature calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bada_core::{ApiResult, Envelope, Role, Transport, TransportError, User, UserId};
use bada_session::{SessionStore, storage::MemoryStore};
use tokio::sync::mpsc;

use crate::{ApiClient, navigation::ChannelNavigator};

type Handler = dyn Fn(&Envelope) -> Result<ApiResult, TransportError> + Send + Sync;

/// Transport that records envelopes and answers from a handler.
#[derive(Clone)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<Envelope>>>,
    handler: Arc<Handler>,
}

impl MockTransport {
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&Envelope) -> Result<ApiResult, TransportError> + Send + Sync + 'static,
    {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            handler: Arc::new(handler),
        }
    }

    pub fn replying(result: ApiResult) -> Self {
        Self::with_handler(move |_| Ok(result.clone()))
    }

    pub fn failing(error: TransportError) -> Self {
        Self::with_handler(move |_| Err(error.clone()))
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Envelope {
        self.sent().pop().expect("no envelope sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, envelope: &Envelope) -> Result<ApiResult, TransportError> {
        self.sent.lock().unwrap().push(envelope.clone());
        (self.handler)(envelope)
    }
}

pub fn client_with(
    transport: MockTransport,
) -> (ApiClient<MemoryStore>, mpsc::UnboundedReceiver<String>) {
    let (navigator, rx) = ChannelNavigator::new();
    let session = Arc::new(SessionStore::new(MemoryStore::new()));
    let client = ApiClient::new(Arc::new(transport), session).with_navigator(Arc::new(navigator));
    (client, rx)
}

pub fn staff_user() -> User {
    User {
        id: UserId::Number(1),
        name: "Ari".into(),
        role: Role::Staff,
        branch: "BR001".into(),
        ..User::default()
    }
}
