//! The simulation domain and its solver-facing view.
//!
//! A [`SimulationDomain`] owns the global permittivity tensor. Only the
//! assembler in this crate can write to it; everyone else, the external
//! field solver included, sees it through the read-only [`MaterialMap`]
//! trait.

use ndarray::{Array3, ArrayView3};
use wavefab_geometry::GeometryError;

use crate::types::{DomainSpec, DomainSummary, BACKGROUND_PERMITTIVITY};

/// Read-only material map handed to an electromagnetic solver.
pub trait MaterialMap {
    /// Relative permittivity indexed `[row, column, depth]`.
    fn permittivity(&self) -> ArrayView3<'_, f64>;

    /// Edge length of one cubic cell (nm).
    fn spacing_nm(&self) -> f64;

    /// World position of the origin corner (nm).
    fn position(&self) -> [f64; 3];

    /// Tensor shape as `[rows, columns, depth]`.
    fn shape(&self) -> [usize; 3] {
        let (r, c, d) = self.permittivity().dim();
        [r, c, d]
    }
}

/// The global permittivity tensor plus its reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationDomain {
    spec: DomainSpec,
    permittivity: Array3<f64>,
}

impl SimulationDomain {
    /// Allocate a domain filled with background permittivity.
    pub fn new(spec: DomainSpec) -> Result<Self, GeometryError> {
        spec.validate()?;
        let [r, c, d] = spec.size;
        let permittivity = Array3::from_elem((r, c, d), BACKGROUND_PERMITTIVITY);
        Ok(Self { spec, permittivity })
    }

    pub fn spec(&self) -> &DomainSpec {
        &self.spec
    }

    /// Physical size of the domain along each axis (nm).
    pub fn world_extent(&self) -> [f64; 3] {
        self.spec.size.map(|n| n as f64 * self.spec.spacing_nm)
    }

    /// Statistics over every cell.
    pub fn summary(&self) -> DomainSummary {
        let voxels = self.permittivity.len();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut filled = 0usize;
        for &eps in self.permittivity.iter() {
            min = min.min(eps);
            max = max.max(eps);
            sum += eps;
            if eps != BACKGROUND_PERMITTIVITY {
                filled += 1;
            }
        }
        DomainSummary {
            min,
            max,
            mean: sum / voxels as f64,
            fill_fraction: filled as f64 / voxels as f64,
            voxels,
        }
    }

    /// Consume the domain, keeping only the tensor.
    pub fn into_permittivity(self) -> Array3<f64> {
        self.permittivity
    }

    pub(crate) fn permittivity_mut(&mut self) -> &mut Array3<f64> {
        &mut self.permittivity
    }
}

impl MaterialMap for SimulationDomain {
    fn permittivity(&self) -> ArrayView3<'_, f64> {
        self.permittivity.view()
    }

    fn spacing_nm(&self) -> f64 {
        self.spec.spacing_nm
    }

    fn position(&self) -> [f64; 3] {
        self.spec.position
    }
}
