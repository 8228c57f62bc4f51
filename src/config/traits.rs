use crate::error::DrawbiasError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), DrawbiasError>;
}

/// Shared check for values that must lie in [0, 1]
pub(crate) fn ensure_unit_interval(section: &str, field: &str, value: f64) -> Result<(), DrawbiasError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DrawbiasError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, field, value
        )));
    }
    Ok(())
}
