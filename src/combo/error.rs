//! Combo table errors.

use thiserror::Error;

/// A single problem found while validating a combo table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComboViolation {
    #[error("Combo table is empty")]
    EmptyComboTable,

    #[error("Combo {index} ({name:?}) has no attacks")]
    EmptyCombo { index: usize, name: String },

    #[error("Combo cooldown must be finite and greater than zero (got {0})")]
    NonPositiveCooldown(f32),
}

/// Errors raised while constructing a [`ComboManager`](super::ComboManager).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComboError {
    #[error("Invalid combo configuration: {}", format_violations(.violations))]
    InvalidConfig { violations: Vec<ComboViolation> },
}

fn format_violations(violations: &[ComboViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
