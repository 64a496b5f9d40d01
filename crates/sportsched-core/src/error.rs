//! Error types for instance loading and catalog construction.

use thiserror::Error;

use crate::constraint::ConstraintFamily;

/// Error raised while reading an instance or building a [`Catalog`](crate::Catalog).
///
/// All of these are fatal: no timetable state is ever built from a catalog
/// that failed validation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Missing element <{0}>")]
    MissingElement(String),

    #[error("Missing attribute `{attribute}` on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Invalid value `{value}` for `{attribute}` on <{element}>")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Unknown team id `{0}`")]
    UnknownTeam(String),

    #[error("Unknown slot id `{0}`")]
    UnknownSlot(String),

    /// The instance uses a feature outside the compact 2RR model.
    #[error("Unsupported instance: {0}")]
    Unsupported(String),

    #[error("Invalid structure: {0}")]
    Structure(String),

    #[error("Invalid {family} constraint #{index}: {reason}")]
    InvalidConstraint {
        family: ConstraintFamily,
        index: usize,
        reason: String,
    },
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
