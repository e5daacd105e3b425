//! Attack sequencing: combo tables and the cursor that walks them.

mod data;
mod error;
mod manager;
mod validation;

pub use data::{Attack, Combo, ComboConfig};
pub use error::{ComboError, ComboViolation};
pub use manager::ComboManager;
pub use validation::validate;
