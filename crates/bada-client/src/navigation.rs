//! Navigation hooks for the UI layer.

use bada_core::Navigator;
use tokio::sync::mpsc;

/// Navigator that only logs redirects.
#[derive(Debug, Default, Clone)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, page: &str) {
        tracing::debug!(page, "Redirect requested");
    }
}

/// Navigator that forwards redirects over a channel.
///
/// The UI side owns the receiver and performs the actual page change.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiver for its redirects.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn redirect(&self, page: &str) {
        if self.tx.send(page.to_string()).is_err() {
            tracing::warn!(page, "Redirect dropped: no UI listening");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_navigator_forwards() {
        let (nav, mut rx) = ChannelNavigator::new();
        nav.redirect("index.html");
        assert_eq!(rx.try_recv().unwrap(), "index.html");
    }

    #[test]
    fn test_channel_navigator_without_listener() {
        let (nav, rx) = ChannelNavigator::new();
        drop(rx);
        nav.redirect("index.html");
    }
}
