//! Vehicle identification numbers.
//!
//! Only the length is checked: a VIN is accepted when it has exactly
//! seventeen characters. Check digit and character set are not validated.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Required VIN length in characters.
pub const VIN_LENGTH: usize = 17;

// ============================================================================
// Vin
// ============================================================================

/// A length-validated VIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    /// Validates `input` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVin`] unless `input` has exactly
    /// [`VIN_LENGTH`] characters.
    pub fn parse(input: &str) -> Result<Self> {
        if input.chars().count() != VIN_LENGTH {
            return Err(Error::invalid_vin(input));
        }
        Ok(Self(input.to_string()))
    }

    /// Returns the VIN as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Vin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
