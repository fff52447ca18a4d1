//! Method names and typed parameter sets.
//!
//! Each struct serializes to the `params` object of one service method. The
//! API key is not part of these structs; the codec injects it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Service methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `generateIntegers`.
    GenerateIntegers,
    /// `generateDecimalFractions`.
    GenerateDecimalFractions,
    /// `generateGaussians`.
    GenerateGaussians,
    /// `generateStrings`.
    GenerateStrings,
    /// `generateUUIDs`.
    GenerateUuids,
    /// `generateBlobs`.
    GenerateBlobs,
    /// `getUsage`.
    GetUsage,
}

impl Method {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GenerateIntegers => "generateIntegers",
            Self::GenerateDecimalFractions => "generateDecimalFractions",
            Self::GenerateGaussians => "generateGaussians",
            Self::GenerateStrings => "generateStrings",
            Self::GenerateUuids => "generateUUIDs",
            Self::GenerateBlobs => "generateBlobs",
            Self::GetUsage => "getUsage",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for `generateIntegers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerParams {
    /// Number of integers.
    pub n: u32,
    /// Lower bound, inclusive.
    pub min: i64,
    /// Upper bound, inclusive.
    pub max: i64,
}

/// Parameters for `generateDecimalFractions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecimalFractionParams {
    /// Number of fractions.
    pub n: u32,
    /// Decimal places per fraction.
    pub decimal_places: u32,
}

/// Parameters for `generateGaussians`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaussianParams {
    /// Number of values.
    pub n: u32,
    /// Distribution mean.
    pub mean: f64,
    /// Distribution standard deviation.
    pub standard_deviation: f64,
    /// Significant digits per value.
    pub significant_digits: u32,
}

/// Parameters for `generateStrings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringParams {
    /// Number of strings.
    pub n: u32,
    /// Length of each string.
    pub length: u32,
    /// Alphabet the strings are drawn from.
    pub characters: String,
}

/// Parameters for `generateUUIDs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidParams {
    /// Number of UUIDs.
    pub n: u32,
}

/// Parameters for `generateBlobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobParams {
    /// Number of blobs.
    pub n: u32,
    /// Blob size in bits.
    pub size: u32,
}

/// `getUsage` takes no parameters besides the API key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageParams {}
