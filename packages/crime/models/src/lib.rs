#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime type enumeration and the classifier's numeric label encoding.
//!
//! The aggregation path treats `crime_type` as free text, so any label found
//! in an uploaded dataset is counted. This crate only pins down the fixed set
//! of labels the pre-trained classifier was fitted against, together with the
//! integer codes it emits.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A crime type known to the pre-trained classifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CrimeType {
    /// Physical attack or threat of attack
    Assault = 0,
    /// Unlawful killing
    Murder = 1,
    /// Taking property without consent
    Theft = 2,
    /// Deception for financial gain
    Fraud = 3,
    /// Taking property by force or threat
    Robbery = 4,
}

impl CrimeType {
    /// Returns the classifier label code for this crime type.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a classifier label code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not in the range 0-4.
    pub const fn from_code(code: u8) -> Result<Self, InvalidCrimeCodeError> {
        match code {
            0 => Ok(Self::Assault),
            1 => Ok(Self::Murder),
            2 => Ok(Self::Theft),
            3 => Ok(Self::Fraud),
            4 => Ok(Self::Robbery),
            _ => Err(InvalidCrimeCodeError { code }),
        }
    }

    /// Returns all variants of this enum, ordered by label code.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Assault,
            Self::Murder,
            Self::Theft,
            Self::Fraud,
            Self::Robbery,
        ]
    }
}

/// Error returned when attempting to decode a [`CrimeType`] from an unknown
/// label code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCrimeCodeError {
    /// The code that was provided.
    pub code: u8,
}

impl std::fmt::Display for InvalidCrimeCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid crime label code {}: expected 0-4", self.code)
    }
}

impl std::error::Error for InvalidCrimeCodeError {}
