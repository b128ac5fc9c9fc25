//! Job runner: ties together materials, geometry, compute and assembly.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::Axis;

use wavefab_compute::{ComputeBackend, CpuBackend, SerialBackend};
use wavefab_core::archive::Archive;
use wavefab_core::{assemble, AssemblyOptions, MaterialMap, SimulationDomain};
use wavefab_geometry::{Rasterise, ShapeRecord};
use wavefab_materials::provider::MaterialProvider;

use crate::config::{JobConfig, ShapeConfig};

/// Resolve every shape of a job into a placement-ready record, in file order.
pub fn build_records(job: &JobConfig) -> Result<Vec<ShapeRecord>> {
    job.shapes
        .iter()
        .map(|shape| {
            let index = resolve_index(shape, job.simulation.wavelength_nm)?;
            Ok(ShapeRecord::new(
                shape.name.clone(),
                index,
                shape.thickness,
                shape.anchor,
                shape.primitive.clone(),
            ))
        })
        .collect()
}

/// Refractive index of a shape, from its explicit value or its material.
fn resolve_index(shape: &ShapeConfig, wavelength_nm: f64) -> Result<f64> {
    match (&shape.material, shape.refractive_index) {
        (Some(_), Some(_)) => anyhow::bail!(
            "Shape '{}': give either 'material' or 'refractive_index', not both",
            shape.name
        ),
        (None, Some(n)) => Ok(n),
        (Some(id), None) => {
            let provider = wavefab_materials::lookup(id).with_context(|| {
                format!(
                    "Shape '{}': valid material identifiers are {}",
                    shape.name,
                    wavefab_materials::IDENTIFIERS.join(", ")
                )
            })?;
            provider
                .refractive_index(wavelength_nm)
                .with_context(|| format!("Shape '{}': material '{}'", shape.name, id))
        }
        (None, None) => anyhow::bail!(
            "Shape '{}' needs a 'material' or a 'refractive_index'",
            shape.name
        ),
    }
}

/// Check a job without allocating the domain tensor.
pub fn validate_job(job: &JobConfig) -> Result<Vec<ShapeRecord>> {
    job.domain.validate().context("Invalid [domain] section")?;
    let records = build_records(job)?;
    for record in &records {
        record.validate()?;
        let (rows, cols) = record.primitive.footprint();
        let extent = [rows, cols, record.thickness];
        for axis in 0..3 {
            let fits = usize::try_from(record.anchor[axis])
                .ok()
                .and_then(|start| start.checked_add(extent[axis]))
                .is_some_and(|end| end <= job.domain.size[axis]);
            if !fits {
                anyhow::bail!(
                    "Shape '{}' anchored at {:?} with extent {:?} does not fit in domain {:?}",
                    record.name,
                    record.anchor,
                    extent,
                    job.domain.size
                );
            }
        }
    }
    Ok(records)
}

/// Rasterise and assemble a full job.
pub fn run_job(job: &JobConfig) -> Result<SimulationDomain> {
    let records = build_records(job)?;
    for record in &records {
        println!(
            "  Shape '{}': {} {:?} x {}, n={:.4}",
            record.name,
            record.primitive.kind(),
            record.primitive.footprint(),
            record.thickness,
            record.refractive_index
        );
    }

    let backend = create_backend(&job.simulation.backend, job.simulation.threads)?;
    println!("Backend: {}", backend.device_info().name);

    let options = AssemblyOptions {
        sampling: job.simulation.sampling,
        overlap: job.simulation.overlap,
    };
    let domain = assemble(job.domain.clone(), &records, backend.as_ref(), options)
        .context("Assembly failed")?;

    let summary = domain.summary();
    println!(
        "Domain {:?}: eps in [{:.4}, {:.4}], mean {:.4}, fill fraction {:.4}",
        domain.shape(),
        summary.min,
        summary.max,
        summary.mean,
        summary.fill_fraction
    );
    Ok(domain)
}

/// Write the domain's named-array archive.
pub fn write_archive(domain: &SimulationDomain, path: &Path) -> Result<()> {
    Archive::from_material_map(domain)
        .save(path)
        .with_context(|| format!("Failed to write archive {}", path.display()))?;
    println!("Archive written to: {}", path.display());
    Ok(())
}

/// Write one CSV grid per depth layer, `slice_z<k>.csv`.
pub fn write_slices_csv(domain: &SimulationDomain, directory: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(directory)?;
    let mut paths = Vec::new();

    for (k, layer) in domain.permittivity().axis_iter(Axis(2)).enumerate() {
        let path = directory.join(format!("slice_z{k}.csv"));
        let mut file = std::io::BufWriter::new(std::fs::File::create(&path)?);
        writeln!(file, "# Wavefab relative permittivity, depth layer {k}")?;
        writeln!(file, "# rows={} cols={}", layer.nrows(), layer.ncols())?;
        for row in layer.rows() {
            let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
            writeln!(file, "{}", line.join(","))?;
        }
        file.flush()?;
        paths.push(path);
    }

    println!("{} depth slices written to: {}", paths.len(), directory.display());
    Ok(paths)
}

/// Create a compute backend based on the user's preference string.
///
/// - `"serial"` — single thread.
/// - `"cpu"` — Rayon pool, `threads` wide if given.
/// - `"auto"` (default) — Rayon on all cores.
fn create_backend(preference: &str, threads: Option<usize>) -> Result<Box<dyn ComputeBackend>> {
    match preference {
        "serial" => Ok(Box::new(SerialBackend::new())),
        "cpu" => match threads {
            Some(n) => Ok(Box::new(CpuBackend::with_threads(n)?)),
            None => Ok(Box::new(CpuBackend::new())),
        },
        "auto" => Ok(Box::new(CpuBackend::new())),
        other => anyhow::bail!(
            "Unknown backend '{}'. Valid backends: auto, cpu, serial",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const RING: &str = r#"
        [simulation]
        backend = "cpu"
        threads = 2

        [domain]
        size = [45, 40, 1]

        [[shape]]
        name = "bus"
        material = "Si"
        anchor = [41, 0, 0]
        type = "rectangle"
        rows = 3
        cols = 40

        [[shape]]
        name = "ring"
        material = "Si"
        anchor = [0, 0, 0]
        type = "arc"
        outer_radius = 20
        width = 3
        orientation = 2
    "#;

    #[test]
    fn test_ring_job_assembles() {
        let job = parse_config(RING).unwrap();
        let domain = run_job(&job).unwrap();
        assert_eq!(domain.shape(), [45, 40, 1]);
        let eps = 3.47 * 3.47;
        assert_eq!(domain.permittivity()[[42, 5, 0]], eps);
        assert_eq!(domain.permittivity()[[44, 39, 0]], 1.0);
        assert_eq!(domain.permittivity()[[30, 30, 0]], 1.0);
    }

    #[test]
    fn test_material_and_index_are_exclusive() {
        let job = parse_config(
            r#"
            [domain]
            size = [4, 4, 1]
            [[shape]]
            name = "both"
            material = "Si"
            refractive_index = 3.0
            type = "rectangle"
            rows = 2
            cols = 2
            "#,
        )
        .unwrap();
        let err = build_records(&job).unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[test]
    fn test_unknown_material_reported() {
        let job = parse_config(
            r#"
            [domain]
            size = [4, 4, 1]
            [[shape]]
            name = "core"
            material = "Unobtainium"
            type = "rectangle"
            rows = 2
            cols = 2
            "#,
        )
        .unwrap();
        let err = build_records(&job).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Material not found: Unobtainium"), "{message}");
        assert!(message.contains("Si3N4"), "{message}");
    }

    #[test]
    fn test_named_material_resolved_at_wavelength() {
        let job = parse_config(
            r#"
            [simulation]
            wavelength_nm = 1550.0
            [domain]
            size = [4, 4, 1]
            [[shape]]
            name = "clad"
            material = "SiO2"
            type = "rectangle"
            rows = 2
            cols = 2
            "#,
        )
        .unwrap();
        let records = build_records(&job).unwrap();
        assert!((records[0].refractive_index - 1.444).abs() < 1e-3);
    }

    #[test]
    fn test_validate_reports_out_of_bounds() {
        let mut job = parse_config(RING).unwrap();
        job.domain.size = [30, 40, 1];
        let err = validate_job(&job).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
        job.domain.size = [45, 40, 1];
        assert_eq!(validate_job(&job).unwrap().len(), 2);
    }

    const BUNDLED_RING: &str = include_str!("../../../configs/ring_bus.toml");

    #[test]
    fn test_bundled_ring_config_is_valid() {
        let job = parse_config(BUNDLED_RING).unwrap();
        assert_eq!(validate_job(&job).unwrap().len(), 6);
        assert!(job.output.save_slices);
    }

    #[test]
    fn test_bundled_ring_quadrants_share_one_centre() {
        let job = parse_config(BUNDLED_RING).unwrap();
        let records = build_records(&job).unwrap();
        let centres: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|record| {
                let o = record.primitive.orientation()?;
                let (rows, _) = record.primitive.footprint();
                let (ci, cj) = o.centre(rows as f64);
                Some((record.anchor[0] as f64 + ci, record.anchor[1] as f64 + cj))
            })
            .collect();
        assert_eq!(centres, vec![(20.0, 30.0); 4]);
    }

    #[test]
    fn test_bundled_ring_closes_around_background() {
        let mut job = parse_config(BUNDLED_RING).unwrap();
        job.simulation.backend = "serial".into();
        let domain = run_job(&job).unwrap();
        let eps = domain.permittivity();
        let silicon = 3.47 * 3.47;

        // Top, bottom, left and right of the ring on the device layer.
        for cell in [[1usize, 29, 1], [38, 30, 1], [19, 11, 1], [20, 48, 1]] {
            assert!((eps[cell] - silicon).abs() < 1e-12, "{cell:?}: {}", eps[cell]);
        }
        // The hole and the gap to the bus stay air.
        assert_eq!(eps[[20, 30, 1]], 1.0);
        assert_eq!(eps[[19, 29, 1]], 1.0);
        assert_eq!(eps[[41, 30, 1]], 1.0);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(create_backend("quantum", None).is_err());
        assert!(create_backend("cpu", Some(0)).is_err());
    }

    #[test]
    fn test_outputs_written() {
        let job = parse_config(RING).unwrap();
        let domain = run_job(&job).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let archive_path = dir.path().join("permittivity.json");
        write_archive(&domain, &archive_path).unwrap();
        assert!(archive_path.exists());

        let slices = write_slices_csv(&domain, dir.path()).unwrap();
        assert_eq!(slices.len(), 1);
        let content = std::fs::read_to_string(&slices[0]).unwrap();
        let data_rows = content.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(data_rows, 45);
    }
}
