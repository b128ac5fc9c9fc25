//! Coordinate meshes over a primitive's bounding footprint.
//!
//! A [`CoordinateGrid`] is the pair of arrays produced by an ij-indexed
//! meshgrid: `rows[[i, j]]` varies only with the row index `i` and
//! `cols[[i, j]]` only with the column index `j`. Shape predicates are then
//! evaluated element-wise over both arrays at once.
//!
//! Two sampling conventions are supported (see [`GridSampling`]). In both,
//! the corners of an `n × n` footprint sit at coordinates `0` and `n`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Where inside each cell the shape predicates are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSampling {
    /// Cell `i` is sampled at integer coordinate `i + 1`, so a footprint of
    /// extent `n` spans `1..=n`.
    #[default]
    Index,
    /// Cell `i` is sampled at its centre `i + 0.5`, so a footprint of extent
    /// `n` spans `0.5..=n - 0.5`. Masks for mirrored orientations are then
    /// exact reflections of one another.
    CellCentre,
}

impl GridSampling {
    /// Coordinate of cell `index` along one axis.
    pub fn coordinate(self, index: usize) -> f64 {
        match self {
            GridSampling::Index => (index + 1) as f64,
            GridSampling::CellCentre => index as f64 + 0.5,
        }
    }
}

/// An ij-indexed coordinate mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    /// Row coordinate of every cell.
    pub rows: Array2<f64>,
    /// Column coordinate of every cell.
    pub cols: Array2<f64>,
    /// Convention used to place the sample points.
    pub sampling: GridSampling,
}

impl CoordinateGrid {
    /// Square mesh spanning `1..=extent` on both axes.
    pub fn new(extent: usize) -> Result<Self, GeometryError> {
        Self::with_sampling(extent, GridSampling::Index)
    }

    /// Square mesh of the given extent under an explicit sampling convention.
    pub fn with_sampling(extent: usize, sampling: GridSampling) -> Result<Self, GeometryError> {
        Self::rect(extent, extent, sampling)
    }

    /// Rectangular mesh with `rows × cols` cells.
    pub fn rect(rows: usize, cols: usize, sampling: GridSampling) -> Result<Self, GeometryError> {
        Self::offset(rows, cols, sampling, [0.0, 0.0])
    }

    /// Rectangular mesh whose sample points are shifted by `offset` (in cell
    /// units) from the convention's default. Used for sub-cell supersampling.
    pub fn offset(
        rows: usize,
        cols: usize,
        sampling: GridSampling,
        offset: [f64; 2],
    ) -> Result<Self, GeometryError> {
        if rows == 0 || cols == 0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "grid extent must be positive, got {rows}x{cols}"
            )));
        }
        let rows_mesh =
            Array2::from_shape_fn((rows, cols), |(i, _)| sampling.coordinate(i) + offset[0]);
        let cols_mesh =
            Array2::from_shape_fn((rows, cols), |(_, j)| sampling.coordinate(j) + offset[1]);
        Ok(Self {
            rows: rows_mesh,
            cols: cols_mesh,
            sampling,
        })
    }

    /// Number of (rows, columns) in the mesh.
    pub fn dim(&self) -> (usize, usize) {
        self.rows.dim()
    }

    /// Squared distance from every sample point to `centre = (row, col)`.
    pub fn squared_distance_to(&self, centre: (f64, f64)) -> Array2<f64> {
        let (cr, cc) = centre;
        let dr = self.rows.mapv(|r| (r - cr) * (r - cr));
        let dc = self.cols.mapv(|c| (c - cc) * (c - cc));
        dr + dc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_grid_spans_one_to_extent() {
        let grid = CoordinateGrid::new(4).unwrap();
        assert_eq!(grid.dim(), (4, 4));
        assert_eq!(grid.rows[[0, 0]], 1.0);
        assert_eq!(grid.rows[[3, 0]], 4.0);
        assert_eq!(grid.cols[[0, 3]], 4.0);
    }

    #[test]
    fn test_matrix_indexing_axes_are_independent() {
        let grid = CoordinateGrid::new(5).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(grid.rows[[i, j]], grid.rows[[i, 0]]);
                assert_eq!(grid.cols[[i, j]], grid.cols[[0, j]]);
            }
        }
    }

    #[test]
    fn test_cell_centre_sampling() {
        let grid = CoordinateGrid::with_sampling(3, GridSampling::CellCentre).unwrap();
        assert_eq!(grid.rows[[0, 0]], 0.5);
        assert_eq!(grid.rows[[2, 0]], 2.5);
    }

    #[test]
    fn test_zero_extent_rejected() {
        assert!(matches!(
            CoordinateGrid::new(0),
            Err(GeometryError::InvalidGeometry(_))
        ));
        assert!(CoordinateGrid::rect(3, 0, GridSampling::Index).is_err());
    }

    #[test]
    fn test_squared_distance() {
        let grid = CoordinateGrid::new(3).unwrap();
        let d2 = grid.squared_distance_to((0.0, 0.0));
        assert_eq!(d2[[0, 0]], 2.0);
        assert_eq!(d2[[2, 1]], 13.0);
    }
}
