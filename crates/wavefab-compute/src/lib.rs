//! # Wavefab Compute
//!
//! Execution backends for rasterising many shape records. This crate
//! provides a [`ComputeBackend`](backend::ComputeBackend) trait so that the
//! assembler never cares how, or on how many threads, independent shapes
//! are rasterised.
//!
//! ## Available backends
//!
//! | Backend | Feature flag | Threads |
//! |---------|-------------|---------|
//! | Serial | always | 1 |
//! | CPU (Rayon) | `cpu` (default) | pool |
//!
//! Every backend returns results in input order, so placement order stays
//! under the caller's control.

pub mod backend;
pub mod serial;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo};
pub use serial::SerialBackend;

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;
