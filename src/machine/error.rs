//! Errors raised while configuring or driving a state machine.

use thiserror::Error;

/// Errors that can occur when registering or switching states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("State '{state}' is not registered")]
    InvalidState { state: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_state() {
        let err = FsmError::DuplicateState {
            state: "Idle".to_string(),
        };
        assert_eq!(err.to_string(), "State 'Idle' is already registered");
    }
}
