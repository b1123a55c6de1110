//! Sampled Voronoi field and the backend trait that produces it.

use crate::classify::nearest_linear;
use crate::{FourColorError, Point, Result, SampleGrid};

/// Region index of every sample cell center
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleField {
    /// Region index for each sample cell (row-major order)
    pub cell_of: Vec<u32>,
    pub grid: SampleGrid,
}

impl SampleField {
    #[inline]
    pub fn region_at(&self, col: usize, row: usize) -> usize {
        self.cell_of[row * self.grid.cols + col] as usize
    }

    /// Region owning an in-plane pixel, via its sample cell
    pub fn region_at_pixel(&self, p: Point) -> Option<usize> {
        self.grid
            .cell_at(p)
            .map(|(col, row)| self.region_at(col, row))
    }

    /// True if the right or bottom neighbor cell belongs to another region.
    /// A missing neighbor never makes a border.
    pub fn is_boundary(&self, col: usize, row: usize) -> bool {
        let here = self.region_at(col, row);
        (self.grid.has_right(col) && self.region_at(col + 1, row) != here)
            || (self.grid.has_below(row) && self.region_at(col, row + 1) != here)
    }

    /// Sample cell count per region (zero for regions swallowed by duplicates)
    pub fn areas(&self, num_regions: usize) -> Vec<u32> {
        let mut areas = vec![0u32; num_regions];
        for &cell in &self.cell_of {
            if let Some(a) = areas.get_mut(cell as usize) {
                *a += 1;
            }
        }
        areas
    }
}

/// Trait for sampling backends
pub trait ComputeBackend {
    /// Classify the center of every cell of `grid` against `seeds`
    fn sample(&mut self, seeds: &[Point], grid: &SampleGrid) -> Result<SampleField>;
}

/// Whether the sample cell centered at `center` sits on a region border.
///
/// Compares against the right and bottom neighbor centers, each only when that
/// neighbor cell lies inside the plane.
pub fn is_boundary_cell(center: Point, grid: &SampleGrid, seeds: &[Point]) -> Result<bool> {
    if seeds.is_empty() {
        return Err(FourColorError::NoRegions);
    }
    let s = grid.cell_size as i64;
    let origin_x = center.x as i64 - s / 2;
    let origin_y = center.y as i64 - s / 2;
    let here = nearest_linear(center, seeds);

    if origin_x + s < grid.bounds.width as i64 {
        let right = Point::new(center.x + s as i32, center.y);
        if nearest_linear(right, seeds) != here {
            return Ok(true);
        }
    }
    if origin_y + s < grid.bounds.height as i64 {
        let below = Point::new(center.x, center.y + s as i32);
        if nearest_linear(below, seeds) != here {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;

    /// Build a field sequentially with the linear scan
    fn reference_field(seeds: &[Point], grid: SampleGrid) -> SampleField {
        let mut cell_of = Vec::with_capacity(grid.len());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                cell_of.push(nearest_linear(grid.center(col, row), seeds) as u32);
            }
        }
        SampleField { cell_of, grid }
    }

    #[test]
    fn test_boundary_cell_matches_field() {
        let grid = SampleGrid::new(Bounds::new(60, 40), 4).unwrap();
        let seeds = [Point::new(10, 10), Point::new(45, 12), Point::new(30, 35)];
        let field = reference_field(&seeds, grid);

        let mut borders = 0;
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let expected = field.is_boundary(col, row);
                let actual = is_boundary_cell(grid.center(col, row), &grid, &seeds).unwrap();
                assert_eq!(expected, actual, "cell ({}, {})", col, row);
                borders += expected as usize;
            }
        }
        assert!(borders > 0);
    }

    #[test]
    fn test_single_region_has_no_border() {
        let grid = SampleGrid::new(Bounds::new(20, 20), 2).unwrap();
        let seeds = [Point::new(3, 3)];
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                assert!(!is_boundary_cell(grid.center(col, row), &grid, &seeds).unwrap());
            }
        }
    }

    #[test]
    fn test_border_marks_left_side_of_split() {
        // vertical split at x = 50; only the cell left of it is a border
        let grid = SampleGrid::new(Bounds::new(100, 10), 10).unwrap();
        let seeds = [Point::new(25, 5), Point::new(75, 5)];
        let field = reference_field(&seeds, grid);
        assert!(field.is_boundary(4, 0));
        assert!(!field.is_boundary(5, 0));
        assert!(!field.is_boundary(9, 0));
    }

    #[test]
    fn test_areas_and_pixel_lookup() {
        let grid = SampleGrid::new(Bounds::new(100, 10), 10).unwrap();
        let seeds = [Point::new(25, 5), Point::new(75, 5), Point::new(75, 5)];
        let field = reference_field(&seeds, grid);
        assert_eq!(field.areas(3), vec![5, 5, 0]);
        assert_eq!(field.region_at_pixel(Point::new(12, 3)), Some(0));
        assert_eq!(field.region_at_pixel(Point::new(99, 9)), Some(1));
        assert_eq!(field.region_at_pixel(Point::new(100, 0)), None);
    }

    #[test]
    fn test_boundary_requires_regions() {
        let grid = SampleGrid::new(Bounds::new(10, 10), 2).unwrap();
        assert!(is_boundary_cell(Point::new(1, 1), &grid, &[]).is_err());
    }
}
