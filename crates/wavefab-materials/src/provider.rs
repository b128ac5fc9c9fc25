//! Material property provider trait.
//!
//! All material data sources implement [`MaterialProvider`], which returns a
//! real, wavelength-dependent refractive index and the matching relative
//! permittivity.

use thiserror::Error;

/// Errors from material providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("Wavelength {wavelength_nm} nm is outside the data range [{min}, {max}] nm")]
    OutOfRange {
        wavelength_nm: f64,
        min: f64,
        max: f64,
    },

    #[error("Material not found: {0}")]
    NotFound(String),
}

/// Provides wavelength-dependent material properties.
pub trait MaterialProvider: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str;

    /// Wavelength range over which the model is valid (nm).
    fn wavelength_range(&self) -> (f64, f64);

    /// Real refractive index $n(\lambda)$ at a given wavelength.
    fn refractive_index(&self, wavelength_nm: f64) -> Result<f64, MaterialError>;

    /// Relative permittivity $\epsilon_r = n^2$ at a given wavelength.
    fn relative_permittivity(&self, wavelength_nm: f64) -> Result<f64, MaterialError> {
        let n = self.refractive_index(wavelength_nm)?;
        Ok(n * n)
    }

    /// Fail with [`MaterialError::OutOfRange`] outside the valid range.
    fn check_range(&self, wavelength_nm: f64) -> Result<(), MaterialError> {
        let (min, max) = self.wavelength_range();
        if !(min..=max).contains(&wavelength_nm) {
            return Err(MaterialError::OutOfRange {
                wavelength_nm,
                min,
                max,
            });
        }
        Ok(())
    }
}
