//! Pixel values used by ground-truth labels and segmentations.

/// Outside the breast area. Excluded from every confusion count.
pub const OUTSIDE_BREAST: i64 = 0;

/// Breast tissue, the background class.
pub const BREAST_TISSUE: i64 = 127;

/// Mass, the foreground class.
pub const MASS: i64 = 255;

/// Returns `true` for the three values a label may contain.
pub const fn is_admissible(value: i64) -> bool {
    matches!(value, OUTSIDE_BREAST | BREAST_TISSUE | MASS)
}
