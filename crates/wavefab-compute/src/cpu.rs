//! CPU compute backend using Rayon for shared-memory parallelism.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use wavefab_geometry::{rasterise_shape, GeometryError, GridSampling, Rasterisation, ShapeRecord};

use crate::backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};

/// CPU backend that rasterises records across threads via Rayon.
pub struct CpuBackend {
    pool: Option<ThreadPool>,
    num_threads: usize,
}

impl CpuBackend {
    /// Create a new CPU backend on Rayon's global pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            num_threads: rayon::current_num_threads(),
        }
    }

    /// Create a CPU backend with a dedicated pool of `num_threads` threads.
    pub fn with_threads(num_threads: usize) -> Result<Self, ComputeError> {
        if num_threads == 0 {
            return Err(ComputeError::ThreadPool(
                "thread count must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| ComputeError::ThreadPool(e.to_string()))?;
        Ok(Self {
            pool: Some(pool),
            num_threads,
        })
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            backend_type: BackendType::Cpu,
            threads: self.num_threads,
        }
    }

    fn rasterise_batch(
        &self,
        records: &[ShapeRecord],
        sampling: GridSampling,
    ) -> Vec<Result<Rasterisation, GeometryError>> {
        log::debug!(
            "Rasterising {} shapes on {} threads",
            records.len(),
            self.num_threads
        );
        let run = || {
            records
                .par_iter()
                .map(|record| rasterise_shape(record, sampling))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SerialBackend;
    use wavefab_geometry::{Arc, Primitive, Rectangle};

    fn records() -> Vec<ShapeRecord> {
        (0..24)
            .map(|i| {
                let primitive = if i % 3 == 0 {
                    Primitive::Rectangle(Rectangle { rows: 2 + i, cols: 3 })
                } else {
                    Primitive::Arc(Arc::new(10 + i, 1 + i % 5, (i % 4) as i64 + 1).unwrap())
                };
                ShapeRecord::new(format!("shape-{i}"), 1.5 + i as f64 * 0.1, 2, [0, 0, 0], primitive)
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_serial() {
        let records = records();
        let cpu = CpuBackend::with_threads(4).unwrap();
        let parallel = cpu.rasterise_batch(&records, GridSampling::Index);
        let serial = SerialBackend::new().rasterise_batch(&records, GridSampling::Index);
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_results_keep_input_order() {
        let records = records();
        let results = CpuBackend::new().rasterise_batch(&records, GridSampling::CellCentre);
        for (record, result) in records.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap().name, record.name);
        }
    }

    #[test]
    fn test_failure_is_reported_in_place() {
        let mut records = records();
        records[5].thickness = 0;
        let results = CpuBackend::with_threads(2)
            .unwrap()
            .rasterise_batch(&records, GridSampling::Index);
        assert!(results[5].is_err());
        assert!(results[4].is_ok() && results[6].is_ok());
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(
            CpuBackend::with_threads(0),
            Err(ComputeError::ThreadPool(_))
        ));
    }

    #[test]
    fn test_device_info() {
        let info = CpuBackend::with_threads(3).unwrap().device_info();
        assert_eq!(info.backend_type, BackendType::Cpu);
        assert_eq!(info.threads, 3);
    }
}
