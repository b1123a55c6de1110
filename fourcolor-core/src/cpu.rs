//! CPU sampling backend, parallel over grid rows with Rayon.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classify::{Classifier, GridIndex, LinearScan};
use crate::voronoi::ComputeBackend;
use crate::{Point, Result, SampleField, SampleGrid};

/// CPU backend using Rayon for parallel computation
pub struct CpuBackend {
    /// Number of threads to use (0 = Rayon default)
    pub num_threads: usize,
    /// Classify through the bucket grid instead of a linear scan
    pub indexed: bool,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self { num_threads: 0, indexed: true }
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads, indexed: true }
    }

    /// Create a backend that scans every seed per cell (for benchmarking)
    pub fn new_linear() -> Self {
        Self { num_threads: 0, indexed: false }
    }

    fn sample_with<C: Classifier>(&self, classifier: &C, grid: &SampleGrid) -> Result<SampleField> {
        let cell_of = self.run_rows(classifier, grid)?;
        Ok(SampleField { cell_of, grid: *grid })
    }

    #[cfg(feature = "parallel")]
    fn run_rows<C: Classifier>(&self, classifier: &C, grid: &SampleGrid) -> Result<Vec<u32>> {
        let pass = || -> Vec<u32> {
            (0..grid.rows)
                .into_par_iter()
                .flat_map_iter(|row| classify_row(classifier, grid, row))
                .collect()
        };
        if self.num_threads == 0 {
            return Ok(pass());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()?;
        Ok(pool.install(pass))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_rows<C: Classifier>(&self, classifier: &C, grid: &SampleGrid) -> Result<Vec<u32>> {
        Ok((0..grid.rows)
            .flat_map(|row| classify_row(classifier, grid, row))
            .collect())
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Region index for each cell center of one grid row
fn classify_row<'a, C: Classifier>(
    classifier: &'a C,
    grid: &'a SampleGrid,
    row: usize,
) -> impl Iterator<Item = u32> + 'a {
    (0..grid.cols).map(move |col| classifier.classify(grid.center(col, row)) as u32)
}

impl ComputeBackend for CpuBackend {
    fn sample(&mut self, seeds: &[Point], grid: &SampleGrid) -> Result<SampleField> {
        let field = if self.indexed {
            self.sample_with(&GridIndex::new(seeds)?, grid)?
        } else {
            self.sample_with(&LinearScan::new(seeds)?, grid)?
        };
        log::debug!(
            "sampled {}x{} cells against {} seeds ({})",
            grid.cols,
            grid.rows,
            seeds.len(),
            if self.indexed { "grid index" } else { "linear scan" },
        );
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, FourColorError, RegionSet};

    #[test]
    fn test_basic_field() {
        let mut backend = CpuBackend::new();
        let grid = SampleGrid::new(Bounds::new(100, 100), 2).unwrap();
        let seeds = vec![Point::new(25, 25), Point::new(75, 75)];

        let field = backend.sample(&seeds, &grid).unwrap();

        assert_eq!(field.cell_of.len(), 50 * 50);
        let areas = field.areas(2);
        assert_eq!(areas.iter().sum::<u32>(), 2500);
        // diagonal split is symmetric except for the tie cells on the diagonal
        assert!(areas[0] >= areas[1]);
        assert_eq!(field.region_at(0, 0), 0);
        assert_eq!(field.region_at(49, 49), 1);
    }

    #[test]
    fn test_empty_seeds_rejected() {
        let grid = SampleGrid::new(Bounds::new(10, 10), 2).unwrap();
        for mut backend in [CpuBackend::new(), CpuBackend::new_linear()] {
            assert!(matches!(
                backend.sample(&[], &grid),
                Err(FourColorError::NoRegions)
            ));
        }
    }

    /// Verify indexed and linear sampling produce identical fields
    #[test]
    fn test_indexed_vs_linear() {
        let bounds = Bounds::new(640, 480);
        let grid = SampleGrid::new(bounds, 3).unwrap();
        for seed in 0..4 {
            let seeds = RegionSet::random(100, 100, bounds, seed).unwrap().seeds();

            let indexed = CpuBackend::new().sample(&seeds, &grid).unwrap();
            let linear = CpuBackend::new_linear().sample(&seeds, &grid).unwrap();

            assert_eq!(indexed.cell_of, linear.cell_of, "cell_of mismatch for seed {}", seed);
        }
    }

    #[test]
    fn test_fixed_thread_pool_matches_default() {
        let bounds = Bounds::new(200, 150);
        let grid = SampleGrid::new(bounds, 2).unwrap();
        let seeds = RegionSet::random(30, 100, bounds, 5).unwrap().seeds();

        let default = CpuBackend::new().sample(&seeds, &grid).unwrap();
        let pooled = CpuBackend::with_threads(2).sample(&seeds, &grid).unwrap();
        assert_eq!(default, pooled);
    }

    #[test]
    fn test_row_major_layout() {
        // left half region 0, right half region 1
        let grid = SampleGrid::new(Bounds::new(8, 4), 2).unwrap();
        let seeds = vec![Point::new(1, 2), Point::new(7, 2)];
        let field = CpuBackend::new_linear().sample(&seeds, &grid).unwrap();
        assert_eq!(field.cell_of, vec![0, 0, 1, 1, 0, 0, 1, 1]);
    }
}
