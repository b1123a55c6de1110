//! Region adjacency derived from the sampled field.

use crate::voronoi::ComputeBackend;
use crate::{Point, Result, SampleField, SampleGrid};

/// Symmetric adjacency relation over region indices.
///
/// Stored as one flat `capacity * capacity` buffer indexed by
/// `i * capacity + j`. The diagonal is always false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    capacity: usize,
    cells: Vec<bool>,
}

impl Adjacency {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let len = capacity.saturating_mul(capacity);
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.resize(len, false);
        Ok(Self { capacity, cells })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Mark `a` and `b` as neighbors. Self pairs and out-of-range indices
    /// are ignored.
    #[inline]
    pub fn mark(&mut self, a: usize, b: usize) {
        if a == b || a >= self.capacity || b >= self.capacity {
            return;
        }
        self.cells[a * self.capacity + b] = true;
        self.cells[b * self.capacity + a] = true;
    }

    #[inline]
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        a < self.capacity && b < self.capacity && self.cells[a * self.capacity + b]
    }

    /// Indices adjacent to `region`, ascending
    pub fn neighbors(&self, region: usize) -> impl Iterator<Item = usize> + '_ {
        let row: &[bool] = if region < self.capacity {
            &self.cells[region * self.capacity..(region + 1) * self.capacity]
        } else {
            &[]
        };
        row.iter()
            .enumerate()
            .filter_map(|(j, &adjacent)| adjacent.then_some(j))
    }

    /// Unordered adjacent pairs `(i, j)` with `i < j`
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        (0..self.capacity)
            .flat_map(|i| self.neighbors(i).filter(move |&j| j > i).map(move |j| (i, j)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count() / 2
    }

    /// Rebuild from a sampled field: every cell is compared with its right
    /// and bottom neighbor, and differing regions are marked adjacent.
    pub fn rebuild(&mut self, field: &SampleField) {
        self.clear();
        let grid = &field.grid;
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let c = field.region_at(col, row);
                if grid.has_right(col) {
                    let right = field.region_at(col + 1, row);
                    if right != c {
                        self.mark(c, right);
                    }
                }
                if grid.has_below(row) {
                    let below = field.region_at(col, row + 1);
                    if below != c {
                        self.mark(c, below);
                    }
                }
            }
        }
    }

    pub fn from_field(field: &SampleField, capacity: usize) -> Result<Self> {
        let mut adjacency = Self::with_capacity(capacity)?;
        adjacency.rebuild(field);
        Ok(adjacency)
    }
}

/// Sample `seeds` over `grid` with `backend` and rebuild `adjacency` from the
/// result. Returns the field so callers can reuse it for rendering.
pub fn derive_adjacency(
    backend: &mut dyn ComputeBackend,
    seeds: &[Point],
    grid: &SampleGrid,
    adjacency: &mut Adjacency,
) -> Result<SampleField> {
    let field = backend.sample(seeds, grid)?;
    adjacency.rebuild(&field);
    log::debug!(
        "derived {} adjacent pairs among {} regions",
        adjacency.edge_count(),
        seeds.len()
    );
    Ok(field)
}
