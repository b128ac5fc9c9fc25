//! Single-threaded backend.

use wavefab_geometry::{rasterise_shape, GeometryError, GridSampling, Rasterisation, ShapeRecord};

use crate::backend::{BackendType, ComputeBackend, DeviceInfo};

/// Rasterises records one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialBackend;

impl SerialBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for SerialBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Serial".into(),
            backend_type: BackendType::Serial,
            threads: 1,
        }
    }

    fn rasterise_batch(
        &self,
        records: &[ShapeRecord],
        sampling: GridSampling,
    ) -> Vec<Result<Rasterisation, GeometryError>> {
        records
            .iter()
            .map(|record| rasterise_shape(record, sampling))
            .collect()
    }
}
