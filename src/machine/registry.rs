//! Registry of the states a machine knows about.

use super::error::FsmError;
use super::node::StateNode;
use crate::core::{State, StateId};
use std::collections::HashMap;

/// Maps each key to its [`StateNode`].
///
/// Registration is unique per key: a second registration under the same key
/// fails and leaves the registry untouched.
pub struct StateRegistry<K: StateId> {
    nodes: HashMap<K, StateNode<K>>,
    order: Vec<K>,
}

impl<K: StateId> StateRegistry<K> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Attach `state` to `key`.
    ///
    /// Transitions already declared for `key` are kept.
    pub fn register_state(&mut self, key: K, state: Box<dyn State>) -> Result<(), FsmError> {
        let node = self.nodes.entry(key).or_insert_with(StateNode::declared);
        if node.has_state() {
            return Err(FsmError::DuplicateState {
                state: key.name().to_string(),
            });
        }
        node.attach(state);
        self.order.push(key);
        Ok(())
    }

    /// Whether a state is attached to `key`.
    pub fn is_registered(&self, key: K) -> bool {
        self.nodes.get(&key).is_some_and(StateNode::has_state)
    }

    /// Node for `key`, including declared-only nodes.
    pub fn get_node(&self, key: K) -> Option<&StateNode<K>> {
        self.nodes.get(&key)
    }

    /// Node for `key`, creating an empty declared node if none exists.
    ///
    /// Lets transitions mention keys before their states are registered.
    pub fn check_and_declare(&mut self, key: K) -> &mut StateNode<K> {
        self.nodes.entry(key).or_insert_with(StateNode::declared)
    }

    pub(crate) fn state_mut(&mut self, key: K) -> Option<&mut (dyn State + 'static)> {
        self.nodes.get_mut(&key)?.state_mut()
    }

    /// Registered keys in registration order.
    pub fn get_states(&self) -> Vec<K> {
        self.order.clone()
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: StateId> Default for StateRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
