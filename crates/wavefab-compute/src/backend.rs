//! Compute backend trait and device description.
//!
//! Rasterising one shape record touches no shared state, so a batch of
//! records can be processed in any order or in parallel. The [`ComputeBackend`]
//! trait hides that choice from the assembler.

use thiserror::Error;
use wavefab_geometry::{GeometryError, GridSampling, Rasterisation, ShapeRecord};

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Describes a compute backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    pub threads: usize,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Serial,
    Cpu,
}

/// Abstraction over rasterisation backends.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the backend.
    fn device_info(&self) -> DeviceInfo;

    /// Rasterise every record independently.
    ///
    /// The output has one entry per record, in the same order as `records`.
    /// A failing record does not prevent the others from being rasterised.
    fn rasterise_batch(
        &self,
        records: &[ShapeRecord],
        sampling: GridSampling,
    ) -> Vec<Result<Rasterisation, GeometryError>>;
}
