//! Cloneable handle for requesting state switches from inside states and
//! event listeners.

use crate::core::StateId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A switch queued through a [`MachineHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request<K> {
    /// Make `K` the current state.
    Switch(K),
    /// Exit the current state and leave the machine empty.
    Clear,
}

/// Queue of switch requests shared by a machine and everything that talks
/// to it.
///
/// States receive a handle at construction instead of a reference to the
/// machine. Requests are applied by the machine in FIFO order before its
/// current entry point returns, so a switch requested from `on_enter` or from
/// an event listener takes effect within the same tick.
pub struct MachineHandle<K: StateId> {
    queue: Arc<Mutex<VecDeque<Request<K>>>>,
}

impl<K: StateId> MachineHandle<K> {
    pub(crate) fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Ask the machine to switch to `state`.
    ///
    /// An unregistered key is reported and ignored when the request is
    /// applied.
    pub fn request(&self, state: K) {
        self.queue.lock().push_back(Request::Switch(state));
    }

    /// Ask the machine to clear its current state.
    pub fn request_clear(&self) {
        self.queue.lock().push_back(Request::Clear);
    }

    /// Number of requests waiting to be applied.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    pub(crate) fn pop(&self) -> Option<Request<K>> {
        self.queue.lock().pop_front()
    }

    pub(crate) fn discard(&self) -> usize {
        let mut queue = self.queue.lock();
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

impl<K: StateId> Clone for MachineHandle<K> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<K: StateId> std::fmt::Debug for MachineHandle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_id! {
        enum TestState { Idle, Moving }
    }

    #[test]
    fn clones_share_one_queue() {
        let handle = MachineHandle::new();
        let clone = handle.clone();

        handle.request(TestState::Moving);
        clone.request_clear();

        assert_eq!(handle.pending(), 2);
        assert_eq!(clone.pop(), Some(Request::Switch(TestState::Moving)));
        assert_eq!(handle.pop(), Some(Request::Clear));
        assert_eq!(handle.pop(), None);
    }

    #[test]
    fn discard_empties_the_queue() {
        let handle = MachineHandle::new();
        handle.request(TestState::Idle);
        handle.request(TestState::Moving);

        assert_eq!(handle.discard(), 2);
        assert_eq!(handle.pending(), 0);
    }
}
