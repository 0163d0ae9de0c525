//! Session feed
//!
//! Stands in for the roster client, the viewport and the decoder. Each one
//! publishes snapshots through its own single-shot notifier; the session
//! arms the notifiers and drains what they deliver.

use tokio::sync::mpsc;

use vgrid_layout::SnapshotNotifier;
use vgrid_protocol::{Participant, Viewport};

/// A snapshot delivered to the session
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Roster(Vec<Participant>),
    Viewport(Viewport),
    DecodeReady(bool),
}

#[derive(Debug)]
pub struct SessionFeed {
    roster: SnapshotNotifier<Vec<Participant>>,
    viewport: SnapshotNotifier<Viewport>,
    decode_ready: SnapshotNotifier<bool>,
    tx: mpsc::UnboundedSender<FeedEvent>,
    rx: mpsc::UnboundedReceiver<FeedEvent>,
}

impl SessionFeed {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            roster: SnapshotNotifier::new(),
            viewport: SnapshotNotifier::new(),
            decode_ready: SnapshotNotifier::new(),
            tx,
            rx,
        }
    }

    /// Returns whether a listener was armed; otherwise the snapshot waits
    pub fn publish_roster(&mut self, roster: Vec<Participant>) -> bool {
        self.roster.notify(&roster)
    }

    pub fn publish_viewport(&mut self, viewport: Viewport) -> bool {
        self.viewport.notify(&viewport)
    }

    pub fn publish_decode_ready(&mut self, ready: bool) -> bool {
        self.decode_ready.notify(&ready)
    }

    /// Register a callback on every notifier that has none.
    ///
    /// Each callback is single-shot, so this runs again after every delivery.
    pub fn arm(&mut self) {
        if !self.roster.is_registered() {
            let tx = self.tx.clone();
            self.roster.register(move |roster| {
                let _ = tx.send(FeedEvent::Roster(roster.clone()));
            });
        }
        if !self.viewport.is_registered() {
            let tx = self.tx.clone();
            self.viewport.register(move |viewport| {
                let _ = tx.send(FeedEvent::Viewport(*viewport));
            });
        }
        if !self.decode_ready.is_registered() {
            let tx = self.tx.clone();
            self.decode_ready.register(move |ready| {
                let _ = tx.send(FeedEvent::DecodeReady(*ready));
            });
        }
    }

    /// Next delivered snapshot, if any
    pub fn next_event(&mut self) -> Option<FeedEvent> {
        self.rx.try_recv().ok()
    }
}

impl Default for SessionFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_delivered_before_arming() {
        let mut feed = SessionFeed::new();
        assert!(!feed.publish_viewport(Viewport::new(640, 480)));
        assert_eq!(feed.next_event(), None);

        feed.arm();
        assert_eq!(feed.next_event(), Some(FeedEvent::Viewport(Viewport::new(640, 480))));
        assert_eq!(feed.next_event(), None);
    }

    #[test]
    fn second_change_needs_a_new_arm() {
        let mut feed = SessionFeed::new();
        feed.arm();
        assert!(feed.publish_decode_ready(true));
        assert!(!feed.publish_decode_ready(false));

        assert_eq!(feed.next_event(), Some(FeedEvent::DecodeReady(true)));
        assert_eq!(feed.next_event(), None);
        feed.arm();
        assert_eq!(feed.next_event(), Some(FeedEvent::DecodeReady(false)));
    }
}
