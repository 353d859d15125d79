//! Transport layer for the BADA operations API.
//!
//! Provides:
//! - Wire protocol (JSON envelope, callback scripts, base64 images)
//! - Direct POST transport (feature: direct)
//! - Callback-bound bridge transport (feature: bridge)

use std::sync::Arc;

use bada_core::{ApiConfig, Transport, TransportError, TransportKind};

pub mod protocol;

#[cfg(feature = "direct")]
pub mod direct;

#[cfg(feature = "bridge")]
pub mod bridge;

#[cfg(feature = "bridge")]
pub use bridge::{BridgeTransport, HttpScriptLoader, ScriptLoader};
#[cfg(feature = "direct")]
pub use direct::DirectTransport;

/// Build the transport selected by `config`.
///
/// # Errors
/// Returns error if the selected strategy was not compiled in or cannot be
/// constructed.
pub fn from_config(config: &ApiConfig) -> Result<Arc<dyn Transport>, TransportError> {
    tracing::debug!(transport = ?config.transport, "Building transport");
    match config.transport {
        #[cfg(feature = "direct")]
        TransportKind::Direct => Ok(Arc::new(DirectTransport::new(config.api_url.clone())?)),
        #[cfg(feature = "bridge")]
        TransportKind::Bridge => Ok(Arc::new(BridgeTransport::new(
            &config.api_url,
            config.bridge_timeout(),
        )?)),
        #[allow(unreachable_patterns)]
        other => Err(TransportError::Transport(format!(
            "transport {other:?} is not enabled in this build"
        ))),
    }
}
