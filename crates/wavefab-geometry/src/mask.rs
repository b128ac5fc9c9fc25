//! Occupancy masks and their conversion to relative permittivity.
//!
//! A mask stores, for every cell of a primitive's footprint, the fraction of
//! the cell covered by material. Boolean rasterisation produces exactly `0.0`
//! or `1.0`; supersampled rasterisation may produce values in between.

use ndarray::{s, Array2, Array3, ArrayView2, Zip};

/// Per-cell material coverage in `[0, 1]` over a 2-D footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyMask {
    values: Array2<f64>,
}

impl OccupancyMask {
    /// Build a binary mask from a boolean array.
    pub fn from_bool(mask: &Array2<bool>) -> Self {
        Self {
            values: mask.mapv(|m| if m { 1.0 } else { 0.0 }),
        }
    }

    /// Build a fractional mask. Values are clamped into `[0, 1]`.
    pub fn from_fractions(values: Array2<f64>) -> Self {
        Self {
            values: values.mapv(|v| v.clamp(0.0, 1.0)),
        }
    }

    /// Raw coverage values.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// (rows, columns) of the footprint.
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Coverage of one cell, or `None` outside the footprint.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get([row, col]).copied()
    }

    /// `true` when every cell is either empty or fully covered.
    pub fn is_binary(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0 || v == 1.0)
    }

    /// Number of cells with any material in them.
    pub fn count_occupied(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count_occupied() == 0
    }

    /// Reflect across the horizontal midline (row order reversed).
    pub fn mirror_rows(&self) -> Self {
        Self {
            values: self.values.slice(s![..;-1, ..]).to_owned(),
        }
    }

    /// Reflect across the vertical midline (column order reversed).
    pub fn mirror_cols(&self) -> Self {
        Self {
            values: self.values.slice(s![.., ..;-1]).to_owned(),
        }
    }

    /// Map coverage to relative permittivity and extrude it over `depth`
    /// layers.
    ///
    /// Empty cells hold the background value `1.0`, fully covered cells hold
    /// exactly `refractive_index²`, and partial cells interpolate linearly
    /// between the two.
    pub fn to_permittivity(&self, refractive_index: f64, depth: usize) -> Array3<f64> {
        let eps = refractive_index * refractive_index;
        let contrast = eps - 1.0;
        let mut plane = Array2::<f64>::ones(self.values.raw_dim());
        Zip::from(&mut plane).and(&self.values).for_each(|p, &m| {
            *p = if m == 1.0 {
                eps
            } else if m == 0.0 {
                1.0
            } else {
                1.0 + m * contrast
            };
        });

        let (rows, cols) = self.dim();
        Array3::from_shape_fn((rows, cols, depth), |(i, j, _)| plane[[i, j]])
    }
}
