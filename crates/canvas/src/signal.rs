use std::fmt;

/// Handle returned by [`ChangeSignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Passed to listeners on every store change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    /// Monotonic counter, bumped once per notification.
    pub revision: u64,
}

type Listener = Box<dyn FnMut(StoreChange)>;

/// Synchronous change notification for a store.
///
/// Listeners run inline and receive only the revision; they cannot reach
/// back into the store while it is being mutated.
#[derive(Default)]
pub struct ChangeSignal {
    revision: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn emit(&mut self) {
        self.revision += 1;
        let change = StoreChange {
            revision: self.revision,
        };
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }
}

impl fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
