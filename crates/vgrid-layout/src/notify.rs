//! Single-shot change notification
//!
//! A collaborator (roster, viewport, decoder) owns one of these and fires it
//! when its snapshot changes. Whoever wants the next change registers again
//! after each delivery, so control flow stays with the caller.

type Callback<T> = Box<dyn FnOnce(&T) + Send>;

pub struct SnapshotNotifier<T> {
    pending: Option<Callback<T>>,
    /// Latest snapshot published while nobody was registered
    missed: Option<T>,
}

impl<T: Clone> SnapshotNotifier<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            missed: None,
        }
    }

    /// Register the callback for the next change, replacing any pending one.
    ///
    /// A change published since the last delivery fires the callback right
    /// away, so re-registering after each delivery never loses the latest
    /// snapshot.
    pub fn register<F>(&mut self, callback: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        if let Some(snapshot) = self.missed.take() {
            callback(&snapshot);
            return;
        }
        if self.pending.replace(Box::new(callback)).is_some() {
            tracing::debug!("Replaced pending snapshot callback");
        }
    }

    pub fn is_registered(&self) -> bool {
        self.pending.is_some()
    }

    /// Deliver a snapshot to the pending callback, or hold it for the next
    /// registration. Returns whether a callback fired.
    pub fn notify(&mut self, snapshot: &T) -> bool {
        match self.pending.take() {
            Some(callback) => {
                callback(snapshot);
                true
            }
            None => {
                self.missed = Some(snapshot.clone());
                false
            }
        }
    }
}

impl<T: Clone> Default for SnapshotNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SnapshotNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotNotifier")
            .field("registered", &self.pending.is_some())
            .field("missed", &self.missed.is_some())
            .finish()
    }
}
