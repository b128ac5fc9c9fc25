//! Dispersive dielectrics described by Sellmeier fits.
//!
//! The refractive index follows
//! $n^2(\lambda) = 1 + \sum_i \frac{B_i \lambda^2}{\lambda^2 - C_i}$
//! with $\lambda$ in micrometres and $C_i$ in µm².
//!
//! ## Available materials
//!
//! | Identifier | Struct method | Wavelength range |
//! |-----------|---------------|-----------------|
//! | `SiO2` | [`SellmeierMaterial::fused_silica()`] | 210–6700 nm |
//! | `Si3N4` | [`SellmeierMaterial::silicon_nitride()`] | 310–5504 nm |

use crate::provider::{MaterialError, MaterialProvider};

/// A material whose index is given by a Sellmeier equation.
#[derive(Debug, Clone)]
pub struct SellmeierMaterial {
    name: String,
    /// (B_i, C_i) pairs, C_i in µm².
    terms: Vec<(f64, f64)>,
    range_nm: (f64, f64),
}

impl SellmeierMaterial {
    /// Construct from Sellmeier coefficients.
    ///
    /// # Arguments
    /// * `name` — Material identifier string.
    /// * `terms` — $(B_i, C_i)$ pairs with $C_i$ in µm².
    /// * `range_nm` — Wavelength range of the fit (nm).
    pub fn new(name: impl Into<String>, terms: Vec<(f64, f64)>, range_nm: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            terms,
            range_nm,
        }
    }

    /// Fused silica, I. H. Malitson, J. Opt. Soc. Am. 55, 1205 (1965).
    pub fn fused_silica() -> Self {
        Self::new(
            "SiO2",
            vec![
                (0.696_166_3, 0.068_404_3_f64.powi(2)),
                (0.407_942_6, 0.116_241_4_f64.powi(2)),
                (0.897_479_4, 9.896_161_f64.powi(2)),
            ],
            (210.0, 6700.0),
        )
    }

    /// Stoichiometric LPCVD silicon nitride, K. Luke et al., Opt. Lett. 40,
    /// 4823 (2015).
    pub fn silicon_nitride() -> Self {
        Self::new(
            "Si3N4",
            vec![
                (3.0249, 0.135_340_6_f64.powi(2)),
                (40314.0, 1239.842_f64.powi(2)),
            ],
            (310.0, 5504.0),
        )
    }
}

impl MaterialProvider for SellmeierMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> (f64, f64) {
        self.range_nm
    }

    fn refractive_index(&self, wavelength_nm: f64) -> Result<f64, MaterialError> {
        self.check_range(wavelength_nm)?;
        let l2 = (wavelength_nm * 1e-3).powi(2);
        let n2 = 1.0
            + self
                .terms
                .iter()
                .map(|&(b, c)| b * l2 / (l2 - c))
                .sum::<f64>();
        Ok(n2.sqrt())
    }
}
