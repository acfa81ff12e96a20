//! Line-of-sight route smoothing.
//!
//! A raw cell-by-cell path is reduced to the waypoints an entity actually has
//! to turn at. Visibility between two cell centers is decided by sampling
//! the segment at a fixed spacing and checking that the entity's
//! [`Footprint`] stays on traversable cells at every sample.

use waygrid_core::{Cell, GridQuery, Vec2};

/// Largest allowed sample spacing, as a fraction of the cell size.
///
/// Anything coarser can step over the corner where two blocked cells touch
/// diagonally.
pub const MAX_SAMPLE_FRACTION: f64 = 0.25;

/// Axis-aligned bounding box of an entity, as half extents around its
/// position.
///
/// Keep each half extent below half a cell; a box that reaches the far edge
/// of a cell touches the neighbouring one.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub half_width: f64,
    pub half_height: f64,
}

impl Footprint {
    /// A dimensionless entity; only the sample point itself is checked.
    pub const POINT: Footprint = Footprint {
        half_width: 0.0,
        half_height: 0.0,
    };

    /// A square footprint with the given half extent.
    pub fn square(half: f64) -> Self {
        Self {
            half_width: half.max(0.0),
            half_height: half.max(0.0),
        }
    }

    /// A square whose side is `fraction` of `cell_size`.
    pub fn cell_fraction(cell_size: i32, fraction: f64) -> Self {
        Self::square(f64::from(cell_size) * fraction / 2.0)
    }

    /// The four corners of the box centered at `p`.
    #[inline]
    pub fn corners(self, p: Vec2) -> [Vec2; 4] {
        let (w, h) = (self.half_width, self.half_height);
        [
            Vec2::new(p.x - w, p.y - h),
            Vec2::new(p.x + w, p.y - h),
            Vec2::new(p.x - w, p.y + h),
            Vec2::new(p.x + w, p.y + h),
        ]
    }

    /// Whether the box centered at `p` lies on traversable cells only.
    pub fn fits<G: GridQuery + ?Sized>(self, grid: &G, p: Vec2) -> bool {
        self.corners(p)
            .into_iter()
            .all(|c| grid.is_walkable_at(c.x, c.y))
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::POINT
    }
}

/// Points along `a → b`, both endpoints included, no further apart than
/// `spacing`.
pub fn sample_segment(a: Vec2, b: Vec2, spacing: f64) -> impl Iterator<Item = Vec2> {
    let len = a.distance(b);
    let steps = if spacing > 0.0 && len > 0.0 {
        (len / spacing).ceil() as usize
    } else {
        0
    };
    (0..=steps).map(move |i| {
        if steps == 0 {
            a
        } else {
            a.lerp(b, i as f64 / steps as f64)
        }
    })
}

/// Whether an entity with `footprint` can move straight from `a` to `b`.
pub fn line_of_sight<G: GridQuery + ?Sized>(
    grid: &G,
    a: Vec2,
    b: Vec2,
    spacing: f64,
    footprint: Footprint,
) -> bool {
    sample_segment(a, b, spacing).all(|p| footprint.fits(grid, p))
}

/// Pixel center of `cell` as a continuous position.
#[inline]
pub fn center_of<G: GridQuery + ?Sized>(grid: &G, cell: Cell) -> Vec2 {
    Vec2::from(grid.center(cell))
}

/// Reduce `raw` to the waypoints that cannot be skipped.
///
/// Walks the path keeping an anchor: an intermediate cell is dropped when the
/// cell after it is visible from the anchor, and kept (becoming the new
/// anchor) otherwise. The first and last cells are always kept.
pub fn smooth<G: GridQuery + ?Sized>(
    grid: &G,
    raw: &[Cell],
    spacing: f64,
    footprint: Footprint,
) -> Vec<Cell> {
    let (Some(&first), Some(&last)) = (raw.first(), raw.last()) else {
        return Vec::new();
    };
    if raw.len() <= 2 {
        return raw.to_vec();
    }

    let mut route = vec![first];
    let mut anchor = center_of(grid, first);
    for i in 1..raw.len() - 1 {
        let next = center_of(grid, raw[i + 1]);
        if !line_of_sight(grid, anchor, next, spacing, footprint) {
            route.push(raw[i]);
            anchor = center_of(grid, raw[i]);
        }
    }
    route.push(last);
    route
}
