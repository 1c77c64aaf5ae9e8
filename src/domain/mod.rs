pub mod estimate;
pub mod geometry;

pub use estimate::*;
pub use geometry::*;

use validator::ValidationError;

/// NaN compares false against every bound, so `range` attributes alone
/// cannot reject it; boundary fields pair their ranges with this check.
fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}
