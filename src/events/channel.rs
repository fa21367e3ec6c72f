//! Event channel backed by crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends grouping events to whoever is listening
///
/// Cloneable and `Send`, so the receiving side can live on another thread.
#[derive(Clone)]
pub struct EventSender {
    inner: Option<Sender<Event>>,
}

impl EventSender {
    /// Send an event
    ///
    /// Dropped receivers are not an error; progress reporting is optional.
    pub fn send(&self, event: Event) {
        if let Some(sender) = &self.inner {
            let _ = sender.send(event);
        }
    }

    /// Whether events go anywhere
    pub fn is_connected(&self) -> bool {
        self.inner.is_some()
    }
}

/// Receives grouping events
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, `None` once all senders are gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Iterate until all senders are dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Creates connected sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender {
                inner: Some(sender),
            },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender that discards everything
pub fn null_sender() -> EventSender {
    EventSender { inner: None }
}
