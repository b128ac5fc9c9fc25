//! Core types shared across the Wavefab pipeline.
//!
//! This module defines the domain specification handed in by the device
//! description, the options steering assembly, and the bookkeeping records
//! produced while placing shapes.

use serde::{Deserialize, Serialize};
use wavefab_geometry::{GeometryError, GridSampling};

/// Relative permittivity of empty cells.
pub const BACKGROUND_PERMITTIVITY: f64 = 1.0;

/// Size and reference frame of a simulation domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    /// Number of cells along (row, column, depth).
    pub size: [usize; 3],
    /// World position of the domain's origin corner (nm).
    #[serde(default)]
    pub position: [f64; 3],
    /// Edge length of one cubic cell (nm).
    #[serde(default = "default_spacing")]
    pub spacing_nm: f64,
}

fn default_spacing() -> f64 {
    1.0
}

impl DomainSpec {
    /// A domain of the given size at the origin with unit spacing.
    pub fn new(size: [usize; 3]) -> Self {
        Self {
            size,
            position: [0.0; 3],
            spacing_nm: default_spacing(),
        }
    }

    pub fn with_position(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_spacing(mut self, spacing_nm: f64) -> Self {
        self.spacing_nm = spacing_nm;
        self
    }

    /// Check that every extent and the spacing are positive.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.size.iter().any(|&n| n == 0) {
            return Err(GeometryError::InvalidGeometry(format!(
                "domain size must be positive on every axis, got {:?}",
                self.size
            )));
        }
        if !self.spacing_nm.is_finite() || self.spacing_nm <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "domain spacing must be positive, got {} nm",
                self.spacing_nm
            )));
        }
        if self.position.iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidGeometry(format!(
                "domain position must be finite, got {:?}",
                self.position
            )));
        }
        Ok(())
    }

    /// Total number of cells.
    pub fn voxel_count(&self) -> usize {
        self.size.iter().product()
    }
}

/// How a placed block treats cells that an earlier block already wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The whole block, background included, replaces what was there.
    #[default]
    Overwrite,
    /// Only the block's material cells replace what was there; its
    /// background cells leave earlier material intact.
    MaterialOnly,
}

/// Options steering [`assemble`](crate::assembler::assemble).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub sampling: GridSampling,
    pub overlap: OverlapPolicy,
}

/// Record of one block written into the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    /// Domain cell of the block's origin corner.
    pub origin: [usize; 3],
    pub extent: [usize; 3],
    pub occupied_cells: usize,
}

/// Statistics of an assembled permittivity tensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Fraction of cells holding anything but background.
    pub fill_fraction: f64,
    pub voxels: usize,
}
