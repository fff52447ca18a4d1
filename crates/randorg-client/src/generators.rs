//! Typed generator methods.
//!
//! Each method validates its parameters locally, sends one request through
//! [`RandomClient::request_command`] and converts the returned values to the
//! declared element type.

use randorg_proto::{
    BlobParams, DecimalFractionParams, GaussianParams, IntegerParams, Method, StringParams,
    UuidParams,
};
use serde_json::Value;
use uuid::Uuid;

use crate::client::RandomClient;
use crate::error::{RandomError, Result};
use crate::transport::Transport;
use crate::validation::{
    DECIMAL_PLACES, GAUSSIAN_BOUND, MAX_BLOB_COUNT, MAX_COUNT, MAX_UUID_COUNT,
    SIGNIFICANT_DIGITS, STRING_LENGTH, check_blob_size, check_characters, check_count,
    check_integer_bounds, check_range,
};

/// A scalar that can be read from one element of the `data` array.
pub trait FromRandomValue: Sized {
    /// Name used in type-mismatch errors.
    const EXPECTED: &'static str;

    /// Converts `value`, or returns `None` if it has the wrong shape.
    fn from_random_value(value: &Value) -> Option<Self>;
}

impl FromRandomValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_random_value(value: &Value) -> Option<Self> {
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= 9.0e15)
                .map(|f| f as Self)
        })
    }
}

impl FromRandomValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_random_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromRandomValue for String {
    const EXPECTED: &'static str = "string";

    fn from_random_value(value: &Value) -> Option<Self> {
        value.as_str().map(ToOwned::to_owned)
    }
}

impl FromRandomValue for Uuid {
    const EXPECTED: &'static str = "UUID string";

    fn from_random_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(|s| Self::parse_str(s).ok())
    }
}

/// Converts every element of `values`, failing on the first mismatch.
///
/// # Errors
///
/// Returns `RandomError::TypeMismatch` naming the first offending element.
pub fn coerce<T: FromRandomValue>(values: Vec<Value>) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            T::from_random_value(&value).ok_or_else(|| RandomError::TypeMismatch {
                index,
                expected: T::EXPECTED,
                found: value.to_string(),
            })
        })
        .collect()
}

fn check_len(values: &[Value], n: u32) -> Result<()> {
    if values.len() == n as usize {
        Ok(())
    } else {
        Err(RandomError::format(format!(
            "expected {n} values, service returned {}",
            values.len()
        )))
    }
}

impl<T: Transport> RandomClient<T> {
    async fn generate<P, V>(&self, method: Method, params: &P, n: u32) -> Result<Vec<V>>
    where
        P: serde::Serialize + Sync,
        V: FromRandomValue,
    {
        let values = self.request_command(method.as_str(), params).await?;
        check_len(&values, n)?;
        coerce(values)
    }

    /// Generates `n` integers in `[min, max]`.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 10000]`, `min` and `max` are in
    /// `[-1e9, 1e9]` and `min <= max`; otherwise any request error.
    pub async fn generate_integers(&self, n: u32, min: i64, max: i64) -> Result<Vec<i64>> {
        check_count(n, MAX_COUNT)?;
        check_integer_bounds(min, max)?;
        self.generate(Method::GenerateIntegers, &IntegerParams { n, min, max }, n)
            .await
    }

    /// Generates `n` decimal fractions in `[0, 1)` with `decimal_places` places.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 10000]` and `decimal_places` in
    /// `[1, 20]`; otherwise any request error.
    pub async fn generate_decimal_fractions(
        &self,
        n: u32,
        decimal_places: u32,
    ) -> Result<Vec<f64>> {
        check_count(n, MAX_COUNT)?;
        check_range("decimal_places", decimal_places, DECIMAL_PLACES.0, DECIMAL_PLACES.1)?;
        let params = DecimalFractionParams { n, decimal_places };
        self.generate(Method::GenerateDecimalFractions, &params, n)
            .await
    }

    /// Generates `n` values from a Gaussian distribution.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 10000]`, `mean` and
    /// `standard_deviation` in `[-1e6, 1e6]` and `significant_digits` in
    /// `[2, 20]`; otherwise any request error.
    pub async fn generate_gaussians(
        &self,
        n: u32,
        mean: f64,
        standard_deviation: f64,
        significant_digits: u32,
    ) -> Result<Vec<f64>> {
        check_count(n, MAX_COUNT)?;
        check_range("mean", mean, -GAUSSIAN_BOUND, GAUSSIAN_BOUND)?;
        check_range(
            "standard_deviation",
            standard_deviation,
            -GAUSSIAN_BOUND,
            GAUSSIAN_BOUND,
        )?;
        check_range(
            "significant_digits",
            significant_digits,
            SIGNIFICANT_DIGITS.0,
            SIGNIFICANT_DIGITS.1,
        )?;
        let params = GaussianParams {
            n,
            mean,
            standard_deviation,
            significant_digits,
        };
        self.generate(Method::GenerateGaussians, &params, n).await
    }

    /// Generates `n` strings of `length` characters drawn from `characters`.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 10000]`, `length` in `[1, 20]` and
    /// `characters` has 1 to 80 characters; otherwise any request error.
    pub async fn generate_strings(
        &self,
        n: u32,
        length: u32,
        characters: &str,
    ) -> Result<Vec<String>> {
        check_count(n, MAX_COUNT)?;
        check_range("length", length, STRING_LENGTH.0, STRING_LENGTH.1)?;
        check_characters(characters)?;
        let params = StringParams {
            n,
            length,
            characters: characters.to_string(),
        };
        self.generate(Method::GenerateStrings, &params, n).await
    }

    /// Generates `n` version 4 UUIDs.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 1000]`; otherwise any request error.
    pub async fn generate_uuids(&self, n: u32) -> Result<Vec<Uuid>> {
        check_count(n, MAX_UUID_COUNT)?;
        self.generate(Method::GenerateUuids, &UuidParams { n }, n)
            .await
    }

    /// Generates `n` blobs of `size` bits, returned base64-encoded.
    ///
    /// # Errors
    ///
    /// `Validation` unless `n` is in `[1, 100]` and `size` in `[1, 1048576]`
    /// and a multiple of 8; otherwise any request error.
    pub async fn generate_blobs(&self, n: u32, size: u32) -> Result<Vec<String>> {
        check_count(n, MAX_BLOB_COUNT)?;
        check_blob_size(size)?;
        self.generate(Method::GenerateBlobs, &BlobParams { n, size }, n)
            .await
    }
}
