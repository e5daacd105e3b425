//! Combo table validation.
//!
//! Uses `Validation` to report every problem in a table at once, so a
//! designer fixing a broken asset sees all of them in one pass.

use super::data::ComboConfig;
use super::error::ComboViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ComboViolation>>;

/// Check that the table is non-empty, every combo has attacks and the
/// cooldown is a positive finite number.
pub fn validate(config: &ComboConfig) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(if config.cooldown.is_finite() && config.cooldown > 0.0 {
        Validation::success(())
    } else {
        Validation::fail(ComboViolation::NonPositiveCooldown(config.cooldown))
    });

    if config.combos.is_empty() {
        checks.push(Validation::fail(ComboViolation::EmptyComboTable));
    }

    for (index, combo) in config.combos.iter().enumerate() {
        checks.push(if combo.is_empty() {
            Validation::fail(ComboViolation::EmptyCombo {
                index,
                name: combo.name.clone(),
            })
        } else {
            Validation::success(())
        });
    }

    Validation::all_vec(checks).map(|_| ())
}
