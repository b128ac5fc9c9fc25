//! # Wavefab Core
//!
//! Composition of rasterised shapes into a single relative-permittivity
//! tensor, and the read-only hand-off of that tensor to an external field
//! solver.
//!
//! ## Architecture
//!
//! Shape records are rasterised independently (possibly in parallel, see
//! `wavefab-compute`) and then placed, strictly in caller order, into a
//! [`domain::SimulationDomain`] by the [`assembler::PermittivityAssembler`].
//! The finished domain is exposed through the [`domain::MaterialMap`] trait
//! and can be persisted with [`archive::Archive`].
//!
//! ## Modules
//!
//! - [`types`] — Domain specification, overlap policy, summaries.
//! - [`domain`] — The simulation domain and solver-facing trait.
//! - [`assembler`] — Placement with last-writer-wins overlap resolution.
//! - [`archive`] — Named real/complex array persistence.
//! - [`error`] — Assembly errors.

pub mod archive;
pub mod assembler;
pub mod domain;
pub mod error;
pub mod types;

pub use assembler::{assemble, PermittivityAssembler};
pub use domain::{MaterialMap, SimulationDomain};
pub use error::AssemblyError;
pub use types::{AssemblyOptions, DomainSpec, DomainSummary, OverlapPolicy, Placement};
