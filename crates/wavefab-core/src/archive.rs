//! Named-array persistence.
//!
//! An [`Archive`] is a set of dense arrays keyed by name, each either real
//! (`f64`) or complex ([`Complex64`]) and of any dimensionality. It carries
//! no semantics beyond that: the assembled permittivity tensor is one entry,
//! field snapshots from a solver run can be others.
//!
//! Archives are stored as pretty-printed JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array, Array1, Array3, ArrayD, Dimension, Ix3};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MaterialMap;

/// Key under which [`Archive::from_material_map`] stores the tensor.
pub const PERMITTIVITY_KEY: &str = "permittivity";

/// Errors from reading or writing archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to access archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed archive: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Array '{0}' already exists in the archive")]
    DuplicateName(String),
}

/// One stored array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "array", rename_all = "snake_case")]
pub enum ArrayData {
    Real(ArrayD<f64>),
    Complex(ArrayD<Complex64>),
}

impl ArrayData {
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayData::Real(a) => a.shape(),
            ArrayData::Complex(a) => a.shape(),
        }
    }

    pub fn as_real(&self) -> Option<&ArrayD<f64>> {
        match self {
            ArrayData::Real(a) => Some(a),
            ArrayData::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ArrayD<Complex64>> {
        match self {
            ArrayData::Complex(a) => Some(a),
            ArrayData::Real(_) => None,
        }
    }
}

/// A collection of named dense arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    arrays: BTreeMap<String, ArrayData>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the assembled tensor of a material map together with its
    /// reference frame (`domain_size`, `domain_position`, `spacing_nm`).
    pub fn from_material_map(map: &dyn MaterialMap) -> Self {
        let size = map.shape().map(|n| n as f64);
        let mut arrays = BTreeMap::new();
        arrays.insert(
            PERMITTIVITY_KEY.to_string(),
            ArrayData::Real(map.permittivity().to_owned().into_dyn()),
        );
        arrays.insert(
            "domain_size".to_string(),
            ArrayData::Real(Array1::from(size.to_vec()).into_dyn()),
        );
        arrays.insert(
            "domain_position".to_string(),
            ArrayData::Real(Array1::from(map.position().to_vec()).into_dyn()),
        );
        arrays.insert(
            "spacing_nm".to_string(),
            ArrayData::Real(Array1::from(vec![map.spacing_nm()]).into_dyn()),
        );
        Self { arrays }
    }

    /// Add a real array under a new name.
    pub fn insert_real<D: Dimension>(
        &mut self,
        name: impl Into<String>,
        array: Array<f64, D>,
    ) -> Result<(), ArchiveError> {
        self.insert(name.into(), ArrayData::Real(array.into_dyn()))
    }

    /// Add a complex array under a new name.
    pub fn insert_complex<D: Dimension>(
        &mut self,
        name: impl Into<String>,
        array: Array<Complex64, D>,
    ) -> Result<(), ArchiveError> {
        self.insert(name.into(), ArrayData::Complex(array.into_dyn()))
    }

    fn insert(&mut self, name: String, data: ArrayData) -> Result<(), ArchiveError> {
        if self.arrays.contains_key(&name) {
            return Err(ArchiveError::DuplicateName(name));
        }
        self.arrays.insert(name, data);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ArrayData> {
        self.arrays.get(name)
    }

    /// The stored permittivity tensor, if present and three-dimensional.
    pub fn permittivity(&self) -> Option<Array3<f64>> {
        self.get(PERMITTIVITY_KEY)?
            .as_real()?
            .clone()
            .into_dimensionality::<Ix3>()
            .ok()
    }

    /// Array names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Write the archive to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ArchiveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        log::info!("Archive with {} arrays written to {}", self.len(), path.display());
        Ok(())
    }

    /// Read an archive written by [`save`](Archive::save).
    pub fn load(path: &Path) -> Result<Self, ArchiveError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimulationDomain;
    use crate::types::DomainSpec;
    use ndarray::{array, Array2};

    #[test]
    fn test_duplicate_names_rejected() {
        let mut archive = Archive::new();
        archive.insert_real("ex", array![1.0, 2.0]).unwrap();
        let err = archive.insert_real("ex", array![3.0]).unwrap_err();
        assert!(matches!(err, ArchiveError::DuplicateName(ref n) if n == "ex"));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_real_and_complex_arrays_survive_disk() {
        let mut archive = Archive::new();
        archive
            .insert_real("eps", Array3::from_elem((2, 3, 1), 12.0409))
            .unwrap();
        let field = Array2::from_shape_fn((2, 2), |(i, j)| {
            Complex64::new(i as f64 * 0.1, -(j as f64) * 1.7)
        });
        archive.insert_complex("ez", field.clone()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("fields.json");
        archive.save(&path).unwrap();
        let loaded = Archive::load(&path).unwrap();

        assert_eq!(loaded, archive);
        assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["eps", "ez"]);
        let ez = loaded.get("ez").unwrap().as_complex().unwrap();
        assert_eq!(ez.shape(), &[2, 2]);
        assert_eq!(ez[[1, 1]], Complex64::new(0.1, -1.7));
        assert!(loaded.get("eps").unwrap().as_complex().is_none());
    }

    #[test]
    fn test_from_material_map() {
        let spec = DomainSpec::new([3, 4, 2])
            .with_spacing(20.0)
            .with_position([1.0, 2.0, 3.0]);
        let domain = SimulationDomain::new(spec).unwrap();
        let archive = Archive::from_material_map(&domain);

        assert_eq!(archive.len(), 4);
        assert_eq!(archive.get(PERMITTIVITY_KEY).unwrap().shape(), &[3, 4, 2]);
        assert_eq!(archive.permittivity().unwrap(), domain.into_permittivity());
        let size = archive.get("domain_size").unwrap().as_real().unwrap();
        assert_eq!(size.as_slice().unwrap(), &[3.0, 4.0, 2.0]);
        let spacing = archive.get("spacing_nm").unwrap().as_real().unwrap();
        assert_eq!(spacing[[0]], 20.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Archive::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
