//! Local parameter bounds for the generator methods.
//!
//! These mirror the limits the service enforces, so an out-of-range call
//! fails without a round trip.

use std::fmt::Display;

use crate::error::{RandomError, Result};

/// Maximum count for integers, fractions, Gaussians and strings.
pub const MAX_COUNT: u32 = 10_000;
/// Maximum count for UUIDs.
pub const MAX_UUID_COUNT: u32 = 1_000;
/// Maximum count for blobs.
pub const MAX_BLOB_COUNT: u32 = 100;

/// Absolute bound for integer `min`/`max`.
pub const INTEGER_BOUND: i64 = 1_000_000_000;
/// Allowed decimal places for fractions.
pub const DECIMAL_PLACES: (u32, u32) = (1, 20);
/// Absolute bound for Gaussian mean and standard deviation.
pub const GAUSSIAN_BOUND: f64 = 1_000_000.0;
/// Allowed significant digits for Gaussians.
pub const SIGNIFICANT_DIGITS: (u32, u32) = (2, 20);
/// Allowed string length.
pub const STRING_LENGTH: (u32, u32) = (1, 20);
/// Allowed alphabet size, in characters.
pub const CHARACTERS_LENGTH: (usize, usize) = (1, 80);
/// Maximum blob size in bits.
pub const MAX_BLOB_SIZE: u32 = 1_048_576;

/// Checks `min <= value <= max`. NaN is always rejected.
pub(crate) fn check_range<T>(parameter: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(RandomError::validation(
            parameter,
            format!("must be in [{min}, {max}], got {value}"),
        ))
    }
}

pub(crate) fn check_count(n: u32, max: u32) -> Result<()> {
    check_range("n", n, 1, max)
}

pub(crate) fn check_integer_bounds(min: i64, max: i64) -> Result<()> {
    check_range("min", min, -INTEGER_BOUND, INTEGER_BOUND)?;
    check_range("max", max, -INTEGER_BOUND, INTEGER_BOUND)?;
    if min > max {
        return Err(RandomError::validation(
            "min",
            format!("must not exceed max ({min} > {max})"),
        ));
    }
    Ok(())
}

pub(crate) fn check_characters(characters: &str) -> Result<()> {
    let count = characters.chars().count();
    check_range("characters", count, CHARACTERS_LENGTH.0, CHARACTERS_LENGTH.1)
}

pub(crate) fn check_blob_size(size: u32) -> Result<()> {
    check_range("size", size, 1, MAX_BLOB_SIZE)?;
    if size % 8 != 0 {
        return Err(RandomError::validation(
            "size",
            format!("must be a multiple of 8, got {size}"),
        ));
    }
    Ok(())
}
