//! Integer plane geometry: points, plane bounds and the sample grid.

use crate::{FourColorError, Result};

/// 2D integer position on the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point, exact for any pair of `i32`
    /// coordinates.
    #[inline]
    pub fn dist_sq(&self, other: &Point) -> u128 {
        let dx = (self.x as i64 - other.x as i64).unsigned_abs() as u128;
        let dy = (self.y as i64 - other.y as i64).unsigned_abs() as u128;
        dx * dx + dy * dy
    }
}

/// Plane dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }
}

/// Regular grid of square sample cells covering the plane.
///
/// Cells start at `x = 0, s, 2s, ...` while `x < width` (same for `y`), so the
/// last column or row may hang over the plane edge when `s` does not divide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGrid {
    pub bounds: Bounds,
    pub cell_size: u32,
    pub cols: usize,
    pub rows: usize,
}

impl SampleGrid {
    pub fn new(bounds: Bounds, cell_size: u32) -> Result<Self> {
        if bounds.width == 0 || bounds.height == 0 {
            return Err(FourColorError::InvalidConfig(format!(
                "plane must be non-empty, got {}x{}",
                bounds.width, bounds.height
            )));
        }
        if cell_size == 0 {
            return Err(FourColorError::InvalidConfig(
                "cell size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            bounds,
            cell_size,
            cols: bounds.width.div_ceil(cell_size) as usize,
            rows: bounds.height.div_ceil(cell_size) as usize,
        })
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left corner of a cell
    pub fn origin(&self, col: usize, row: usize) -> Point {
        let s = self.cell_size as i32;
        Point::new(col as i32 * s, row as i32 * s)
    }

    /// Center of a cell, rounded down for even cell sizes
    pub fn center(&self, col: usize, row: usize) -> Point {
        let o = self.origin(col, row);
        let half = (self.cell_size / 2) as i32;
        Point::new(o.x + half, o.y + half)
    }

    pub fn has_right(&self, col: usize) -> bool {
        col + 1 < self.cols
    }

    pub fn has_below(&self, row: usize) -> bool {
        row + 1 < self.rows
    }

    /// Sample cell containing an in-plane pixel
    pub fn cell_at(&self, p: Point) -> Option<(usize, usize)> {
        if !self.bounds.contains(p) {
            return None;
        }
        let s = self.cell_size as usize;
        Some((p.x as usize / s, p.y as usize / s))
    }
}
