//! Out-of-range classification against a normal range.

use airwatch_types::NormalRange;

/// Whether `value` falls outside the normal range.
///
/// Below `min` is always abnormal. Above `max` is abnormal only when the
/// range has an effective ceiling; percentage metrics carry the 100
/// sentinel that disables the upper check (their practical range is
/// one-sided). An absent value carries no signal and is never classified.
pub fn is_abnormal(value: Option<f64>, range: &NormalRange) -> Option<bool> {
    let value = value?;
    Some(value < range.min || (range.has_ceiling() && value > range.max))
}
