//! # Wavefab Geometry
//!
//! Geometry handling for the Wavefab device builder. This crate provides:
//!
//! - **Coordinate grids** ([`grid`]) — ij-indexed coordinate meshes over a
//!   primitive's bounding footprint.
//! - **Occupancy masks** ([`mask`]) — binary or fractional material coverage
//!   and its conversion to relative permittivity.
//! - **Parametric primitives** ([`primitives`]) — quarter-annulus arcs,
//!   rectangles and linear tapers defined by integer grid parameters.
//! - **Rasterisation** ([`rasterise`]) — turns a named, indexed shape record
//!   into a self-describing permittivity block ready for placement.

pub mod error;
pub mod grid;
pub mod mask;
pub mod primitives;
pub mod rasterise;

pub use error::GeometryError;
pub use grid::{CoordinateGrid, GridSampling};
pub use mask::OccupancyMask;
pub use primitives::{Arc, Orientation, Primitive, Rasterise, Rectangle, Taper};
pub use rasterise::{rasterise_shape, Rasterisation, ShapeRecord};
