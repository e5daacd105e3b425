//! Observer primitive used for state notifications and collaborator signals.
//!
//! An [`EventSource`] keeps an ordered list of listeners. Emitting takes a
//! snapshot of the list first, so a listener may unsubscribe itself (or any
//! other listener) from inside its own callback; the change applies from the
//! next emission on.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Token returned by [`EventSource::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<E>)>,
}

/// Synchronous multicast event.
///
/// Listeners run on the emitting thread, in subscription order. A panicking
/// listener propagates into the emitter.
///
/// # Example
///
/// ```rust
/// use combat_fsm::events::EventSource;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let on_hit: EventSource<u32> = EventSource::new();
///
/// let counter = Arc::clone(&hits);
/// let id = on_hit.subscribe(move |damage| {
///     counter.fetch_add(*damage as usize, Ordering::Relaxed);
/// });
///
/// on_hit.emit(&2);
/// on_hit.unsubscribe(id);
/// on_hit.emit(&5);
///
/// assert_eq!(hits.load(Ordering::Relaxed), 2);
/// ```
pub struct EventSource<E> {
    listeners: Mutex<Listeners<E>>,
}

impl<E> EventSource<E> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Register a listener; it receives every later emission until removed.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    /// Deliver `event` to every listener subscribed at the time of the call.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    pub fn clear(&self) {
        self.listeners.lock().entries.clear();
    }
}

impl EventSource<()> {
    /// Emit a payload-less event.
    pub fn notify(&self) {
        self.emit(&());
    }
}

impl<E> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Subscriptions held by one owner and released together.
///
/// States fill this in `on_enter` and call [`release`](Self::release) in
/// `on_exit`. Anything still watched is released on drop.
#[derive(Default)]
pub struct Subscriptions {
    releases: Vec<Box<dyn FnOnce() + Send>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to the event `source` selects on `owner`.
    pub fn watch<T, E, F>(&mut self, owner: &Arc<T>, source: fn(&T) -> &EventSource<E>, listener: F)
    where
        T: Send + Sync + 'static,
        E: 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = source(owner).subscribe(listener);
        let owner = Arc::clone(owner);
        self.releases.push(Box::new(move || {
            source(&owner).unsubscribe(id);
        }));
    }

    /// Unsubscribe everything watched so far.
    pub fn release(&mut self) {
        for release in self.releases.drain(..) {
            release();
        }
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("active", &self.releases.len())
            .finish()
    }
}
