//! Error types for region registry operations.

use thiserror::Error;

use crate::model::RegionId;

/// Errors raised when creating or mutating regions.
///
/// All variants are recoverable: the registry is left unchanged whenever one
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    /// A region in an incoming batch violates the data model
    #[error("Invalid region '{id}': {reason}")]
    InvalidRegion {
        /// Id of the offending region
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// Mutation targeted an id that is not in the registry
    #[error("Region not found: {0}")]
    RegionNotFound(RegionId),

    /// Color string is not of the form `#RRGGBB`
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
}

impl RegionError {
    /// Create an invalid region error.
    pub fn invalid_region(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
