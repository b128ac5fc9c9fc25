//! Errors raised while assembling a simulation domain.

use thiserror::Error;
use wavefab_geometry::GeometryError;

/// Errors from domain construction and shape placement.
///
/// Assembly fails fast: no partially assembled domain is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error(
        "Shape '{name}' anchored at {anchor:?} with extent {extent:?} does not fit in domain {domain:?}"
    )]
    OutOfBounds {
        name: String,
        anchor: [i64; 3],
        extent: [usize; 3],
        domain: [usize; 3],
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
