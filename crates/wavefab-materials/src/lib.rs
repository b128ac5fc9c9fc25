//! # Wavefab Materials
//!
//! Refractive-index providers for the Wavefab device builder. All materials
//! implement the [`MaterialProvider`](provider::MaterialProvider) trait,
//! which returns a real refractive index at an explicitly supplied
//! wavelength.
//!
//! ## Available data sources
//!
//! | Identifier | Source | Module |
//! |------------|--------|--------|
//! | `Air` | constant, n = 1 | [`constant`] |
//! | `Si` | constant, n = 3.47 (telecom C-band) | [`constant`] |
//! | `SiO2` | Malitson (1965) Sellmeier fit | [`sellmeier`] |
//! | `Si3N4` | Luke et al. (2015) Sellmeier fit | [`sellmeier`] |

pub mod constant;
pub mod provider;
pub mod sellmeier;

use constant::ConstantIndex;
use provider::{MaterialError, MaterialProvider};
use sellmeier::SellmeierMaterial;

/// Identifiers accepted by [`lookup`].
pub const IDENTIFIERS: [&str; 4] = ["Air", "Si", "SiO2", "Si3N4"];

/// Resolve a material identifier to its provider.
///
/// Identifiers are case-sensitive; anything outside [`IDENTIFIERS`] is
/// [`MaterialError::NotFound`].
pub fn lookup(identifier: &str) -> Result<Box<dyn MaterialProvider>, MaterialError> {
    match identifier {
        "Air" => Ok(Box::new(ConstantIndex::air())),
        "Si" => Ok(Box::new(ConstantIndex::silicon())),
        "SiO2" => Ok(Box::new(SellmeierMaterial::fused_silica())),
        "Si3N4" => Ok(Box::new(SellmeierMaterial::silicon_nitride())),
        other => Err(MaterialError::NotFound(other.to_string())),
    }
}
