//! Background image resolution as an observable value.
//!
//! The document owns the sending half of a `tokio::sync::watch` channel and
//! publishes a [`ResolvedBackground`] whenever an image finishes loading.
//! The view holds a [`BackgroundSubscription`] and polls it from its single
//! UI thread; nothing in the engine ever waits on the channel.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use url::Url;

use crate::Size;

/// A background image that has finished loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBackground {
    /// The locator the image was fetched from.
    pub reference: Url,
    /// Pixel size of the decoded image.
    pub size: Size,
}

/// Sending half, owned by the document.
pub type BackgroundSender = watch::Sender<Option<ResolvedBackground>>;

/// Create a channel holding no image yet.
#[must_use]
pub fn background_channel() -> BackgroundSender {
    watch::Sender::new(None)
}

/// Receiving half, owned by the view for its lifetime.
#[derive(Debug)]
pub struct BackgroundSubscription {
    receiver: watch::Receiver<Option<ResolvedBackground>>,
    delivered_initial: bool,
}

impl BackgroundSubscription {
    /// Subscribe to a document's background channel.
    #[must_use]
    pub fn new(sender: &BackgroundSender) -> Self {
        Self {
            receiver: sender.subscribe(),
            delivered_initial: false,
        }
    }

    /// Take the latest value if it changed since the previous poll.
    ///
    /// The first poll always yields the current value so a view opened on an
    /// already loaded document fits it immediately. A closed channel never
    /// reports a change.
    pub fn poll(&mut self) -> Option<Option<ResolvedBackground>> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }

    /// The current value without marking it seen.
    #[must_use]
    pub fn current(&self) -> Option<ResolvedBackground> {
        self.receiver.borrow().clone()
    }
}

/// A locator is set but its image has not arrived yet.
#[must_use]
pub fn is_loading(reference: Option<&Url>, resolved: Option<&ResolvedBackground>) -> bool {
    reference.is_some() && resolved.is_none()
}
