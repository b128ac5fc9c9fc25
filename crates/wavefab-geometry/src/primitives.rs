//! Parametric cross-section primitives.
//!
//! Each primitive describes the 2-D footprint of one structural element of a
//! photonic device in integer grid units. Every variant implements
//! [`Rasterise`], so placement code never needs to know which kind of shape
//! produced a mask. Primitives are fully described by their TOML parameters.

use ndarray::{Array1, Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::grid::{CoordinateGrid, GridSampling};
use crate::mask::OccupancyMask;

/// Capability shared by every primitive: produce an occupancy mask over its
/// own bounding footprint.
pub trait Rasterise {
    /// (rows, columns) of the bounding footprint.
    fn footprint(&self) -> (usize, usize);

    /// Check the primitive's parameters.
    fn validate(&self) -> Result<(), GeometryError>;

    /// Rasterise onto a grid covering [`footprint`](Rasterise::footprint).
    fn occupancy(&self, sampling: GridSampling) -> Result<OccupancyMask, GeometryError>;

    /// Quadrant orientation, for primitives that have one.
    fn orientation(&self) -> Option<Orientation> {
        None
    }
}

/// Which corner of an arc's bounding square holds the circle centre.
///
/// Rows grow downwards and columns grow to the right, so "bottom" is the
/// last row and "right" is the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Orientation {
    BottomLeft = 1,
    TopLeft = 2,
    TopRight = 3,
    BottomRight = 4,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::BottomLeft,
        Orientation::TopLeft,
        Orientation::TopRight,
        Orientation::BottomRight,
    ];

    /// The integer flag used in device descriptions.
    pub fn flag(self) -> i64 {
        self as i64
    }

    /// Circle centre as (row, column) for a bounding square of side `extent`.
    pub fn centre(self, extent: f64) -> (f64, f64) {
        match self {
            Orientation::BottomLeft => (extent, 0.0),
            Orientation::TopLeft => (0.0, 0.0),
            Orientation::TopRight => (0.0, extent),
            Orientation::BottomRight => (extent, extent),
        }
    }
}

impl TryFrom<i64> for Orientation {
    type Error = GeometryError;

    fn try_from(flag: i64) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(Orientation::BottomLeft),
            2 => Ok(Orientation::TopLeft),
            3 => Ok(Orientation::TopRight),
            4 => Ok(Orientation::BottomRight),
            other => Err(GeometryError::InvalidOrientation(other)),
        }
    }
}

impl From<Orientation> for i64 {
    fn from(orientation: Orientation) -> Self {
        orientation.flag()
    }
}

/// A cross-section primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Arc(Arc),
    Rectangle(Rectangle),
    Taper(Taper),
}

impl Primitive {
    /// Short lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Arc(_) => "arc",
            Primitive::Rectangle(_) => "rectangle",
            Primitive::Taper(_) => "taper",
        }
    }

    fn as_rasterise(&self) -> &dyn Rasterise {
        match self {
            Primitive::Arc(a) => a,
            Primitive::Rectangle(r) => r,
            Primitive::Taper(t) => t,
        }
    }
}

impl Rasterise for Primitive {
    fn footprint(&self) -> (usize, usize) {
        self.as_rasterise().footprint()
    }

    fn validate(&self) -> Result<(), GeometryError> {
        self.as_rasterise().validate()
    }

    fn occupancy(&self, sampling: GridSampling) -> Result<OccupancyMask, GeometryError> {
        self.as_rasterise().occupancy(sampling)
    }

    fn orientation(&self) -> Option<Orientation> {
        self.as_rasterise().orientation()
    }
}

fn default_supersample() -> usize {
    1
}

/// A quarter annulus: the region between two concentric circles, clipped to
/// the `outer_radius × outer_radius` square whose corner holds the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    /// Outer radius (cells). Also the side of the bounding square.
    pub outer_radius: usize,
    /// Radial width of the ring (cells). Must be less than `outer_radius`.
    pub width: usize,
    /// Corner of the bounding square holding the circle centre.
    pub orientation: Orientation,
    /// Sub-samples per cell along each axis. `1` gives a binary mask.
    #[serde(default = "default_supersample")]
    pub supersample: usize,
}

impl Arc {
    /// Build an arc from a raw orientation flag, validating every parameter.
    pub fn new(outer_radius: usize, width: usize, flag: i64) -> Result<Self, GeometryError> {
        let arc = Self {
            outer_radius,
            width,
            orientation: Orientation::try_from(flag)?,
            supersample: 1,
        };
        arc.validate()?;
        Ok(arc)
    }

    /// Same arc, anti-aliased with `factor × factor` sub-samples per cell.
    pub fn with_supersample(mut self, factor: usize) -> Self {
        self.supersample = factor;
        self
    }

    /// Inner radius of the ring (cells).
    pub fn inner_radius(&self) -> usize {
        self.outer_radius.saturating_sub(self.width)
    }

    /// Annulus membership of every sample point of `grid`.
    ///
    /// A cell is occupied only when it lies on or outside the inner circle
    /// *and* on or inside the outer circle. Cells where the two tests
    /// disagree stay empty, which thins the ring by one cell wherever the
    /// discretised circles do not line up.
    fn annulus(&self, grid: &CoordinateGrid) -> Array2<bool> {
        let outer = self.outer_radius as f64;
        let inner = self.inner_radius() as f64;
        let d2 = grid.squared_distance_to(self.orientation.centre(outer));

        let outside_inner = d2.mapv(|d| d >= inner * inner);
        let inside_outer = d2.mapv(|d| d <= outer * outer);
        &outside_inner & &inside_outer
    }
}

impl Rasterise for Arc {
    fn footprint(&self) -> (usize, usize) {
        (self.outer_radius, self.outer_radius)
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if self.outer_radius == 0 || self.width == 0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "arc outer_radius and width must be positive (outer_radius={}, width={})",
                self.outer_radius, self.width
            )));
        }
        if self.width >= self.outer_radius {
            return Err(GeometryError::InvalidGeometry(format!(
                "arc width {} must be less than outer_radius {} (inner radius would be non-positive)",
                self.width, self.outer_radius
            )));
        }
        if self.supersample == 0 {
            return Err(GeometryError::InvalidGeometry(
                "arc supersample factor must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn occupancy(&self, sampling: GridSampling) -> Result<OccupancyMask, GeometryError> {
        self.validate()?;
        let n = self.outer_radius;

        if self.supersample == 1 {
            let grid = CoordinateGrid::with_sampling(n, sampling)?;
            return Ok(OccupancyMask::from_bool(&self.annulus(&grid)));
        }

        let s = self.supersample;
        let sub_offset = |k: usize| (k as f64 + 0.5) / s as f64 - 0.5;
        let mut coverage = Array2::<f64>::zeros((n, n));
        for a in 0..s {
            for b in 0..s {
                let grid = CoordinateGrid::offset(n, n, sampling, [sub_offset(a), sub_offset(b)])?;
                let hits = self.annulus(&grid);
                Zip::from(&mut coverage).and(&hits).for_each(|c, &h| {
                    if h {
                        *c += 1.0;
                    }
                });
            }
        }
        coverage /= (s * s) as f64;
        Ok(OccupancyMask::from_fractions(coverage))
    }

    fn orientation(&self) -> Option<Orientation> {
        Some(self.orientation)
    }
}

/// A fully occupied rectangular block, e.g. a straight waveguide section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Extent along the row axis (cells).
    pub rows: usize,
    /// Extent along the column axis (cells).
    pub cols: usize,
}

impl Rasterise for Rectangle {
    fn footprint(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "rectangle extent must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    fn occupancy(&self, _sampling: GridSampling) -> Result<OccupancyMask, GeometryError> {
        self.validate()?;
        Ok(OccupancyMask::from_fractions(Array2::ones((
            self.rows, self.cols,
        ))))
    }
}

/// A linear taper running along the column axis, centred on the row midline.
///
/// The footprint is `max(start_width, end_width)` rows by `length` columns.
/// A row of column `j` is filled when its sample point lies strictly inside
/// half of [`Taper::width_at`] from the midline, i.e. when more than half of
/// the cell is covered. Each column therefore holds the filled-row count of
/// the footprint's parity nearest to the interpolated width, and a tie
/// (width parity differing from the footprint's) rounds to the narrower one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taper {
    /// Extent along the column axis (cells).
    pub length: usize,
    /// Width at the first column (cells).
    pub start_width: usize,
    /// Width at the last column (cells).
    pub end_width: usize,
}

impl Taper {
    /// Interpolated width at the centre of column `col`.
    pub fn width_at(&self, col: usize) -> f64 {
        let t = (col as f64 + 0.5) / self.length as f64;
        self.start_width as f64 + (self.end_width as f64 - self.start_width as f64) * t
    }
}

/// Slack for interpolated widths that land on a cell edge.
const EDGE_TOLERANCE: f64 = 1e-9;

impl Rasterise for Taper {
    fn footprint(&self) -> (usize, usize) {
        (self.start_width.max(self.end_width), self.length)
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if self.length == 0 || self.start_width == 0 || self.end_width == 0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "taper length and widths must be positive (length={}, start_width={}, end_width={})",
                self.length, self.start_width, self.end_width
            )));
        }
        Ok(())
    }

    fn occupancy(&self, sampling: GridSampling) -> Result<OccupancyMask, GeometryError> {
        self.validate()?;
        let (rows, cols) = self.footprint();
        let grid = CoordinateGrid::rect(rows, cols, sampling)?;

        let midline = 0.5 * (sampling.coordinate(0) + sampling.coordinate(rows - 1));
        let half_widths = Array1::from_shape_fn(cols, |j| 0.5 * self.width_at(j));
        let mask = Zip::indexed(&grid.rows)
            .map_collect(|(_, j), &r| (r - midline).abs() < half_widths[j] - EDGE_TOLERANCE);
        Ok(OccupancyMask::from_bool(&mask))
    }
}
