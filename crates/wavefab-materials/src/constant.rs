//! Dispersionless materials.

use crate::provider::{MaterialError, MaterialProvider};

/// A material with the same refractive index at every wavelength.
#[derive(Debug, Clone)]
pub struct ConstantIndex {
    name: String,
    index: f64,
}

impl ConstantIndex {
    pub fn new(name: impl Into<String>, index: f64) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Vacuum / air, n = 1.
    pub fn air() -> Self {
        Self::new("Air", 1.0)
    }

    /// Crystalline silicon near 1550 nm.
    pub fn silicon() -> Self {
        Self::new("Si", 3.47)
    }
}

impl MaterialProvider for ConstantIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<f64, MaterialError> {
        self.check_range(wavelength_nm)?;
        Ok(self.index)
    }
}
