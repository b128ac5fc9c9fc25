//! TOML configuration deserialisation for device jobs.

use serde::Deserialize;
use wavefab_core::{DomainSpec, OverlapPolicy};
use wavefab_geometry::{GridSampling, Primitive};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub domain: DomainSpec,
    /// Shapes, placed in file order.
    #[serde(default, rename = "shape")]
    pub shapes: Vec<ShapeConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Rasterisation parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    /// Wavelength used to resolve named materials (nm).
    #[serde(default = "default_wavelength")]
    pub wavelength_nm: f64,
    /// Compute backend: "auto", "cpu", or "serial". Default: "auto".
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Thread count for the "cpu" backend. Default: all cores.
    pub threads: Option<usize>,
    #[serde(default)]
    pub sampling: GridSampling,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            wavelength_nm: default_wavelength(),
            backend: default_backend(),
            threads: None,
            sampling: GridSampling::default(),
            overlap: OverlapPolicy::default(),
        }
    }
}

fn default_wavelength() -> f64 {
    1550.0
}

fn default_backend() -> String {
    "auto".into()
}

/// A single structural element.
#[derive(Debug, Deserialize)]
pub struct ShapeConfig {
    pub name: String,
    /// Material identifier (e.g. "Si", "SiO2"). Exclusive with `refractive_index`.
    pub material: Option<String>,
    /// Explicit real refractive index. Exclusive with `material`.
    pub refractive_index: Option<f64>,
    /// Layer thickness in cells.
    #[serde(default = "default_thickness")]
    pub thickness: usize,
    /// Grid cell of the bounding-box corner nearest the domain origin.
    #[serde(default)]
    pub anchor: [i64; 3],
    /// Cross-section geometry (`type = "arc" | "rectangle" | "taper"`).
    #[serde(flatten)]
    pub primitive: Primitive,
}

fn default_thickness() -> usize {
    1
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to write the named-array archive (default: true).
    #[serde(default = "default_true")]
    pub save_archive: bool,
    /// Whether to write one CSV grid per depth layer (default: false).
    #[serde(default)]
    pub save_slices: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_archive: true,
            save_slices: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a TOML job description.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    Ok(toml::from_str(content)?)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefab_geometry::{Orientation, Rectangle};

    const JOB: &str = r#"
        [simulation]
        wavelength_nm = 1310.0
        backend = "serial"
        sampling = "cell_centre"
        overlap = "material_only"

        [domain]
        size = [40, 40, 2]
        position = [0.0, 0.0, 0.0]
        spacing_nm = 20.0

        [[shape]]
        name = "box"
        material = "SiO2"
        thickness = 2
        type = "rectangle"
        rows = 40
        cols = 40

        [[shape]]
        name = "bend"
        refractive_index = 3.47
        anchor = [10, 10, 1]
        type = "arc"
        outer_radius = 20
        width = 2
        orientation = 4
    "#;

    #[test]
    fn test_full_job_parses() {
        let job = parse_config(JOB).unwrap();
        assert_eq!(job.simulation.wavelength_nm, 1310.0);
        assert_eq!(job.simulation.sampling, GridSampling::CellCentre);
        assert_eq!(job.simulation.overlap, OverlapPolicy::MaterialOnly);
        assert_eq!(job.domain.size, [40, 40, 2]);
        assert_eq!(job.shapes.len(), 2);

        assert_eq!(job.shapes[0].material.as_deref(), Some("SiO2"));
        assert_eq!(
            job.shapes[0].primitive,
            Primitive::Rectangle(Rectangle { rows: 40, cols: 40 })
        );
        assert_eq!(job.shapes[1].thickness, 1);
        assert_eq!(job.shapes[1].anchor, [10, 10, 1]);
        match &job.shapes[1].primitive {
            Primitive::Arc(arc) => {
                assert_eq!(arc.orientation, Orientation::BottomRight);
                assert_eq!(arc.supersample, 1);
            }
            other => panic!("expected arc, got {other:?}"),
        }
        assert!(job.output.save_archive);
    }

    #[test]
    fn test_defaults() {
        let job = parse_config("[domain]\nsize = [4, 4, 1]\n").unwrap();
        assert_eq!(job.simulation.backend, "auto");
        assert_eq!(job.simulation.sampling, GridSampling::Index);
        assert_eq!(job.simulation.overlap, OverlapPolicy::Overwrite);
        assert_eq!(job.domain.spacing_nm, 1.0);
        assert!(job.shapes.is_empty());
        assert_eq!(job.output.directory, "./output");
    }

    #[test]
    fn test_unknown_orientation_rejected() {
        let bad = r#"
            [domain]
            size = [20, 20, 1]

            [[shape]]
            name = "bend"
            refractive_index = 3.47
            type = "arc"
            outer_radius = 20
            width = 2
            orientation = 5
        "#;
        let err = parse_config(bad).unwrap_err();
        assert!(err.to_string().contains("orientation"), "{err}");
    }
}
