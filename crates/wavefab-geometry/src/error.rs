//! Errors raised while validating or rasterising geometry.

use thiserror::Error;

/// Errors from shape validation and rasterisation.
///
/// Both variants are configuration errors: they are deterministic and are
/// never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid orientation flag {0}: expected 1, 2, 3 or 4")]
    InvalidOrientation(i64),
}
