//! Rasterisation of named shape records into permittivity blocks.
//!
//! A [`ShapeRecord`] pairs a [`Primitive`] with everything needed to place it
//! in a device: a name, a refractive index, a layer thickness and an anchor.
//! Rasterising it yields a [`Rasterisation`], a self-describing block that
//! the assembler can drop into the global domain without re-deriving any
//! geometry.

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::grid::GridSampling;
use crate::primitives::{Orientation, Primitive, Rasterise};

/// One structural element of a device description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Identifier carried through to the rasterisation result.
    pub name: String,
    /// Real refractive index of the element's material.
    pub refractive_index: f64,
    /// Layer thickness along the depth axis (cells).
    pub thickness: usize,
    /// Grid coordinates (row, column, depth) of the bounding-box corner
    /// nearest the domain origin.
    pub anchor: [i64; 3],
    /// Cross-section geometry.
    #[serde(flatten)]
    pub primitive: Primitive,
}

impl ShapeRecord {
    pub fn new(
        name: impl Into<String>,
        refractive_index: f64,
        thickness: usize,
        anchor: [i64; 3],
        primitive: Primitive,
    ) -> Self {
        Self {
            name: name.into(),
            refractive_index,
            thickness,
            anchor,
            primitive,
        }
    }

    /// Check the record and its primitive.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.refractive_index.is_finite() || self.refractive_index <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "shape '{}': refractive index must be positive and finite, got {}",
                self.name, self.refractive_index
            )));
        }
        if self.thickness == 0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "shape '{}': thickness must be positive",
                self.name
            )));
        }
        self.primitive.validate().map_err(|e| match e {
            GeometryError::InvalidGeometry(msg) => {
                GeometryError::InvalidGeometry(format!("shape '{}': {}", self.name, msg))
            }
            other => other,
        })
    }

    /// Rasterise this record. Pure: identical inputs give identical output.
    pub fn rasterise(&self, sampling: GridSampling) -> Result<Rasterisation, GeometryError> {
        rasterise_shape(self, sampling)
    }
}

/// The permittivity block produced by rasterising one shape record.
#[derive(Debug, Clone, PartialEq)]
pub struct Rasterisation {
    /// Name of the originating record.
    pub name: String,
    /// Relative permittivity, indexed `[row, column, depth]`.
    pub permittivity: Array3<f64>,
    /// Where the block's origin corner lands in the domain.
    pub anchor: [i64; 3],
    /// Quadrant orientation, for arcs.
    pub orientation: Option<Orientation>,
    /// Number of footprint cells holding any material.
    pub occupied_cells: usize,
}

impl Rasterisation {
    /// Block shape as `[rows, columns, depth]`.
    pub fn shape(&self) -> [usize; 3] {
        let (r, c, d) = self.permittivity.dim();
        [r, c, d]
    }
}

/// Rasterise a shape record onto its own bounding block.
///
/// The footprint mask is mapped to permittivity (`1.0` background,
/// `refractive_index²` where occupied) and extruded uniformly over the
/// record's thickness.
pub fn rasterise_shape(
    record: &ShapeRecord,
    sampling: GridSampling,
) -> Result<Rasterisation, GeometryError> {
    record.validate()?;

    let mask = record.primitive.occupancy(sampling)?;
    let permittivity = mask.to_permittivity(record.refractive_index, record.thickness);
    let occupied_cells = mask.count_occupied();

    log::debug!(
        "Rasterised {} '{}': footprint {:?} x {}, {} occupied cells",
        record.primitive.kind(),
        record.name,
        mask.dim(),
        record.thickness,
        occupied_cells
    );

    Ok(Rasterisation {
        name: record.name.clone(),
        permittivity,
        anchor: record.anchor,
        orientation: record.primitive.orientation(),
        occupied_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Arc, Rectangle};
    use approx::assert_relative_eq;

    fn bend(flag: i64) -> ShapeRecord {
        ShapeRecord::new(
            "bend",
            3.47,
            1,
            [0, 0, 0],
            Primitive::Arc(Arc::new(20, 2, flag).unwrap()),
        )
    }

    #[test]
    fn test_silicon_bend_block() {
        let r = bend(4).rasterise(GridSampling::Index).unwrap();
        assert_eq!(r.shape(), [20, 20, 1]);
        assert_eq!(r.name, "bend");
        assert_eq!(r.orientation, Some(Orientation::BottomRight));
        assert!(r.occupied_cells > 0);

        let eps = 3.47_f64 * 3.47;
        assert_relative_eq!(eps, 12.0409, epsilon = 1e-9);
        for &v in r.permittivity.iter() {
            assert!(v == 1.0 || v == eps, "unexpected permittivity {v}");
        }
        // Centre corner is inside the hole, the ring reaches the edges.
        assert_eq!(r.permittivity[[19, 19, 0]], 1.0);
        assert_eq!(r.permittivity[[0, 19, 0]], eps);
    }

    #[test]
    fn test_depth_is_uniform() {
        let mut record = bend(1);
        record.thickness = 6;
        let r = record.rasterise(GridSampling::Index).unwrap();
        assert_eq!(r.shape(), [20, 20, 6]);
        for i in 0..20 {
            for j in 0..20 {
                let top = r.permittivity[[i, j, 0]];
                for k in 1..6 {
                    assert_eq!(r.permittivity[[i, j, k]], top);
                }
            }
        }
    }

    #[test]
    fn test_rasterising_twice_is_bit_identical() {
        let record = bend(2);
        let a = record.rasterise(GridSampling::Index).unwrap();
        let b = record.rasterise(GridSampling::Index).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_records_fail_fast() {
        let mut record = bend(3);
        record.thickness = 0;
        assert!(matches!(
            record.rasterise(GridSampling::Index),
            Err(GeometryError::InvalidGeometry(_))
        ));

        let mut record = bend(3);
        record.refractive_index = -1.0;
        assert!(record.validate().is_err());

        let mut record = bend(3);
        record.primitive = Primitive::Arc(Arc {
            outer_radius: 20,
            width: 20,
            orientation: Orientation::TopRight,
            supersample: 1,
        });
        match record.rasterise(GridSampling::Index) {
            Err(GeometryError::InvalidGeometry(msg)) => assert!(msg.contains("bend")),
            other => panic!("expected InvalidGeometry, got {other:?}"),
        }
    }

    #[test]
    fn test_record_deserialises_flattened_primitive() {
        let json = r#"{
            "name": "wg",
            "refractive_index": 1.444,
            "thickness": 2,
            "anchor": [1, 2, 0],
            "type": "rectangle",
            "rows": 3,
            "cols": 4
        }"#;
        let record: ShapeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.primitive, Primitive::Rectangle(Rectangle { rows: 3, cols: 4 }));
        let r = record.rasterise(GridSampling::Index).unwrap();
        assert_eq!(r.shape(), [3, 4, 2]);
        assert_eq!(r.occupied_cells, 12);
        assert_eq!(r.anchor, [1, 2, 0]);
    }
}
