//! Worst-case output size estimation
//!
//! The writer is allocation-free, so capacity has to be provable
//! before any byte is written. The estimate is a flat allowance per
//! structural unit rather than an exact bound: each allowance is
//! sized comfortably above the worst case for fields within their
//! declared limits, trading a few hundred bytes of slack for a bound
//! that is trivially safe.

/// Fixed allowance for the top-level object: brackets, gateway keys,
/// gateway text fields at maximum length and full-width integers.
pub const BASE_OVERHEAD: usize = 1024;

/// Flat allowance per device reading: object syntax, keys and all
/// four text fields at maximum length.
pub const PER_DEVICE: usize = 500;

/// Flat allowance per data point: object syntax, keys, both
/// timestamps, the status field and a fixed-point f32 (at most
/// 47 characters with three fractional digits).
pub const PER_DATA_POINT: usize = 200;

/// Upper bound in bytes on the serialized size of any gateway report
/// with `device_count` readings and `total_data_points` data points
/// whose fields respect the limits in [`crate::model`].
///
/// Pure and infallible; performs no validation. Saturates instead of
/// overflowing on targets where the product exceeds `usize`.
pub fn estimate_max_size(device_count: u8, total_data_points: u32) -> usize {
    BASE_OVERHEAD
        .saturating_add(usize::from(device_count) * PER_DEVICE)
        .saturating_add((total_data_points as usize).saturating_mul(PER_DATA_POINT))
}
