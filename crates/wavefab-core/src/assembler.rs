//! Placement of rasterised blocks into the simulation domain.
//!
//! Blocks are written in the order they are given. Where two blocks
//! overlap, the later one wins: structural layers are listed bottom-up, so a
//! later layer stands for material lying on top of an earlier one. The
//! [`OverlapPolicy`] decides whether a later block's background cells take
//! part in that overwrite.
//!
//! A block that does not fit entirely inside the domain is rejected with
//! [`AssemblyError::OutOfBounds`]; nothing is clipped and the domain is left
//! untouched.

use ndarray::{s, Zip};
use wavefab_compute::ComputeBackend;
use wavefab_geometry::{Rasterisation, ShapeRecord};

use crate::domain::{MaterialMap, SimulationDomain};
use crate::error::AssemblyError;
use crate::types::{
    AssemblyOptions, DomainSpec, OverlapPolicy, Placement, BACKGROUND_PERMITTIVITY,
};

/// Writes rasterised blocks into a domain it owns.
#[derive(Debug)]
pub struct PermittivityAssembler {
    domain: SimulationDomain,
    policy: OverlapPolicy,
    placements: Vec<Placement>,
}

impl PermittivityAssembler {
    pub fn new(domain: SimulationDomain) -> Self {
        Self {
            domain,
            policy: OverlapPolicy::default(),
            placements: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The domain as assembled so far.
    pub fn domain(&self) -> &SimulationDomain {
        &self.domain
    }

    /// Blocks written so far, in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Write one block at its anchor.
    pub fn place(&mut self, block: &Rasterisation) -> Result<(), AssemblyError> {
        let origin = fit_in_domain(block, self.domain.shape())?;
        let [r0, c0, d0] = origin;
        let extent = block.shape();
        let [nr, nc, nd] = extent;

        let mut target = self
            .domain
            .permittivity_mut()
            .slice_mut(s![r0..r0 + nr, c0..c0 + nc, d0..d0 + nd]);
        match self.policy {
            OverlapPolicy::Overwrite => target.assign(&block.permittivity),
            OverlapPolicy::MaterialOnly => {
                Zip::from(&mut target)
                    .and(&block.permittivity)
                    .for_each(|dst, &src| {
                        if src != BACKGROUND_PERMITTIVITY {
                            *dst = src;
                        }
                    });
            }
        }

        log::debug!(
            "Placed '{}' at {:?} with extent {:?}",
            block.name,
            origin,
            extent
        );
        self.placements.push(Placement {
            name: block.name.clone(),
            origin,
            extent,
            occupied_cells: block.occupied_cells,
        });
        Ok(())
    }

    /// Write several blocks, in iteration order.
    pub fn place_all<'a>(
        &mut self,
        blocks: impl IntoIterator<Item = &'a Rasterisation>,
    ) -> Result<(), AssemblyError> {
        for block in blocks {
            self.place(block)?;
        }
        Ok(())
    }

    /// Hand over the finished domain.
    pub fn finish(self) -> SimulationDomain {
        self.domain
    }
}

/// Domain cell of the block's origin, if the whole block fits.
fn fit_in_domain(block: &Rasterisation, domain: [usize; 3]) -> Result<[usize; 3], AssemblyError> {
    let extent = block.shape();
    let out_of_bounds = || AssemblyError::OutOfBounds {
        name: block.name.clone(),
        anchor: block.anchor,
        extent,
        domain,
    };

    let mut origin = [0usize; 3];
    for axis in 0..3 {
        let start = usize::try_from(block.anchor[axis]).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(extent[axis]).ok_or_else(out_of_bounds)?;
        if end > domain[axis] {
            return Err(out_of_bounds());
        }
        origin[axis] = start;
    }
    Ok(origin)
}

/// Build a domain from a list of shape records.
///
/// Records are rasterised through `backend`, which may do so concurrently,
/// then placed one by one in slice order. The first failing record, in that
/// order, aborts assembly.
pub fn assemble(
    spec: DomainSpec,
    records: &[ShapeRecord],
    backend: &dyn ComputeBackend,
    options: AssemblyOptions,
) -> Result<SimulationDomain, AssemblyError> {
    let domain = SimulationDomain::new(spec)?;
    let mut assembler = PermittivityAssembler::new(domain).with_policy(options.overlap);

    let blocks = backend.rasterise_batch(records, options.sampling);
    for block in blocks {
        assembler.place(&block?)?;
    }

    let domain = assembler.finish();
    let summary = domain.summary();
    log::info!(
        "Assembled {} shapes into {:?} domain (fill fraction {:.4}, eps range [{:.4}, {:.4}])",
        records.len(),
        domain.shape(),
        summary.fill_fraction,
        summary.min,
        summary.max
    );
    Ok(domain)
}
