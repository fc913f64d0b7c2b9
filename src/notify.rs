//! Notification collaborator facade
//!
//! Fire-and-forget message delivery. Failures are logged and never roll
//! back the state transition that triggered them; no delivery guarantee is
//! offered or implied.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Whatsapp,
    Email,
}

/// Outbound message facade
pub struct Notifier {
    sent: AtomicUsize,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            sent: AtomicUsize::new(0),
        }
    }

    /// Hand a message to the delivery collaborator and return immediately
    pub fn send_message(&self, channel: Channel, address: &str, text: &str) {
        self.sent.fetch_add(1, Ordering::Relaxed);

        let address = address.to_string();
        let text = text.to_string();
        tokio::spawn(async move {
            // Delivery transport lives outside this core; hand-off is the
            // whole contract here.
            match deliver(channel, &address, &text).await {
                Ok(()) => debug!("Dispatched {:?} message to {}", channel, address),
                Err(e) => error!("Failed to dispatch {:?} message to {}: {}", channel, address, e),
            }
        });
    }

    /// Messages handed off since startup
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

async fn deliver(_channel: Channel, _address: &str, _text: &str) -> Result<(), String> {
    // External collaborator boundary; the in-process build accepts
    // everything it is handed.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_message_is_fire_and_forget() {
        let notifier = Notifier::new();
        notifier.send_message(Channel::Whatsapp, "+5215512345678", "hello");
        notifier.send_message(Channel::Email, "parent@example.com", "hello");
        assert_eq!(notifier.sent_count(), 2);
    }
}
