//! Explicit change notification.
//!
//! The engines mutate their own state and fire a single "changed" signal
//! once per completed step or recompute. There is no implicit binding:
//! callers either subscribe a callback or compare [`ChangeNotifier::revision`]
//! between frames.

/// Observer list plus a monotonic revision counter.
///
/// Listeners are invoked synchronously, in subscription order, with no
/// payload. The revision counter increments once per notification and
/// never wraps in practice (u64).
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Box<dyn FnMut() + Send>>,
    revision: u64,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked on every notification.
    pub fn subscribe<F: FnMut() + Send + 'static>(&mut self, listener: F) {
        self.listeners.push(Box::new(listener));
    }

    /// Fire the changed signal: bump the revision and run all listeners.
    pub fn notify(&mut self) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener();
        }
    }

    /// Number of notifications fired since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
