//! Nearest-region classification.
//!
//! Two strategies sit behind [`Classifier`]: a plain linear scan and a bucket
//! grid searched in expanding rings. Both return the nearest seed and break
//! ties toward the lowest index, so they are interchangeable.

use crate::{FourColorError, Point, Result};

/// Maps a plane coordinate to the index of the region that owns it
pub trait Classifier: Sync {
    /// Index of the nearest seed; the lowest index wins ties.
    fn classify(&self, p: Point) -> usize;

    /// Number of seeds being classified against
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Nearest seed to `p`, scanning every seed in index order.
///
/// Returns [`FourColorError::NoRegions`] for an empty seed list.
pub fn classify(p: Point, seeds: &[Point]) -> Result<usize> {
    if seeds.is_empty() {
        return Err(FourColorError::NoRegions);
    }
    Ok(nearest_linear(p, seeds))
}

/// Caller guarantees `seeds` is non-empty.
#[inline]
pub(crate) fn nearest_linear(p: Point, seeds: &[Point]) -> usize {
    let mut nearest = 0;
    let mut min_dist = u128::MAX;
    for (i, seed) in seeds.iter().enumerate() {
        let dist = p.dist_sq(seed);
        // strict: first seed at the minimum keeps it
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }
    nearest
}

/// Linear scan over borrowed seeds
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'a> {
    seeds: &'a [Point],
}

impl<'a> LinearScan<'a> {
    pub fn new(seeds: &'a [Point]) -> Result<Self> {
        if seeds.is_empty() {
            return Err(FourColorError::NoRegions);
        }
        Ok(Self { seeds })
    }
}

impl Classifier for LinearScan<'_> {
    #[inline]
    fn classify(&self, p: Point) -> usize {
        nearest_linear(p, self.seeds)
    }

    fn len(&self) -> usize {
        self.seeds.len()
    }
}

/// Bucket grid over the seeds' bounding box for sub-linear lookup
#[derive(Debug, Clone)]
pub struct GridIndex {
    seeds: Vec<Point>,
    buckets: Vec<Vec<u32>>,
    min: Point,
    cols: usize,
    rows: usize,
    bucket_w: i64,
    bucket_h: i64,
}

impl GridIndex {
    pub fn new(seeds: &[Point]) -> Result<Self> {
        if seeds.is_empty() {
            return Err(FourColorError::NoRegions);
        }

        let min_x = seeds.iter().map(|s| s.x).min().unwrap_or(0);
        let max_x = seeds.iter().map(|s| s.x).max().unwrap_or(0);
        let min_y = seeds.iter().map(|s| s.y).min().unwrap_or(0);
        let max_y = seeds.iter().map(|s| s.y).max().unwrap_or(0);

        let side = (seeds.len() as f64).sqrt().ceil().max(1.0) as usize;
        let span_x = max_x as i64 - min_x as i64 + 1;
        let span_y = max_y as i64 - min_y as i64 + 1;
        let cols = side.min(span_x as usize).max(1);
        let rows = side.min(span_y as usize).max(1);
        let bucket_w = (span_x + cols as i64 - 1) / cols as i64;
        let bucket_h = (span_y + rows as i64 - 1) / rows as i64;

        let mut index = Self {
            seeds: seeds.to_vec(),
            buckets: vec![Vec::new(); cols * rows],
            min: Point::new(min_x, min_y),
            cols,
            rows,
            bucket_w,
            bucket_h,
        };
        for (i, seed) in seeds.iter().enumerate() {
            let (gc, gr) = index.bucket_of(*seed);
            index.buckets[gr * cols + gc].push(i as u32);
        }
        Ok(index)
    }

    /// Bucket holding `p`, clamped onto the grid for outside points
    #[inline]
    fn bucket_of(&self, p: Point) -> (usize, usize) {
        let gc = ((p.x as i64 - self.min.x as i64).max(0) / self.bucket_w) as usize;
        let gr = ((p.y as i64 - self.min.y as i64).max(0) / self.bucket_h) as usize;
        (gc.min(self.cols - 1), gr.min(self.rows - 1))
    }

    /// Lower bound on the distance from `p` to any seed outside the checked
    /// ring square, or `None` when the square already covers the whole grid.
    fn unchecked_bound(
        &self,
        p: Point,
        c_start: usize,
        c_end: usize,
        r_start: usize,
        r_end: usize,
    ) -> Option<i64> {
        let px = p.x as i64 - self.min.x as i64;
        let py = p.y as i64 - self.min.y as i64;
        let mut bound: Option<i64> = None;
        let mut tighten = |gap: i64| {
            let gap = gap.max(0);
            bound = Some(bound.map_or(gap, |b| b.min(gap)));
        };

        if c_start > 0 {
            tighten(px - c_start as i64 * self.bucket_w + 1);
        }
        if c_end < self.cols {
            tighten(c_end as i64 * self.bucket_w - px);
        }
        if r_start > 0 {
            tighten(py - r_start as i64 * self.bucket_h + 1);
        }
        if r_end < self.rows {
            tighten(r_end as i64 * self.bucket_h - py);
        }
        bound
    }
}

impl Classifier for GridIndex {
    fn classify(&self, p: Point) -> usize {
        let (gc, gr) = self.bucket_of(p);

        let mut min_dist = u128::MAX;
        let mut nearest = usize::MAX;

        for r in 0usize.. {
            let r_start = gr.saturating_sub(r);
            let r_end = (gr + r + 1).min(self.rows);
            let c_start = gc.saturating_sub(r);
            let c_end = (gc + r + 1).min(self.cols);

            for ri in r_start..r_end {
                for ci in c_start..c_end {
                    // interior buckets were visited by smaller rings
                    if r > 0
                        && ri > r_start && ri < r_end - 1
                        && ci > c_start && ci < c_end - 1
                    {
                        continue;
                    }
                    for &seed_idx in &self.buckets[ri * self.cols + ci] {
                        let idx = seed_idx as usize;
                        let dist = p.dist_sq(&self.seeds[idx]);
                        if dist < min_dist || (dist == min_dist && idx < nearest) {
                            min_dist = dist;
                            nearest = idx;
                        }
                    }
                }
            }

            match self.unchecked_bound(p, c_start, c_end, r_start, r_end) {
                None => break,
                // an unchecked seed at equal distance could have a lower index
                Some(bound) if min_dist < (bound as u128) * (bound as u128) => break,
                Some(_) => {}
            }
        }

        nearest
    }

    fn len(&self) -> usize {
        self.seeds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_region_owns_everything() {
        let seeds = [Point::new(400, 300)];
        for p in [Point::new(0, 0), Point::new(799, 599), Point::new(-1000, 5000)] {
            assert_eq!(classify(p, &seeds).unwrap(), 0);
        }
    }

    #[test]
    fn test_two_regions_split_at_midpoint() {
        let seeds = [Point::new(0, 0), Point::new(100, 0)];
        assert_eq!(classify(Point::new(40, 0), &seeds).unwrap(), 0);
        assert_eq!(classify(Point::new(60, 0), &seeds).unwrap(), 1);
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let seeds = [Point::new(0, 0), Point::new(100, 0)];
        assert_eq!(classify(Point::new(50, 0), &seeds).unwrap(), 0);
        assert_eq!(classify(Point::new(50, 77), &seeds).unwrap(), 0);

        let reversed = [Point::new(100, 0), Point::new(0, 0)];
        assert_eq!(classify(Point::new(50, 0), &reversed).unwrap(), 0);

        // duplicate seeds: the second copy never wins
        let dup = [Point::new(5, 5), Point::new(20, 20), Point::new(20, 20)];
        assert_eq!(classify(Point::new(21, 21), &dup).unwrap(), 1);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            classify(Point::new(0, 0), &[]),
            Err(FourColorError::NoRegions)
        ));
        assert!(LinearScan::new(&[]).is_err());
        assert!(GridIndex::new(&[]).is_err());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seeds: Vec<Point> = (0..30)
            .map(|_| Point::new(rng.gen_range(0..800), rng.gen_range(0..600)))
            .collect();
        let p = Point::new(321, 123);
        let first = classify(p, &seeds).unwrap();
        for _ in 0..10 {
            assert_eq!(classify(p, &seeds).unwrap(), first);
        }
    }

    /// The grid index must match the linear scan everywhere, including ties
    /// and points far outside the seeds' bounding box.
    #[test]
    fn test_grid_index_matches_linear_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in [1usize, 2, 5, 17, 70, 100] {
            let seeds: Vec<Point> = (0..n)
                .map(|_| Point::new(rng.gen_range(0..800), rng.gen_range(0..600)))
                .collect();
            let linear = LinearScan::new(&seeds).unwrap();
            let grid = GridIndex::new(&seeds).unwrap();

            for _ in 0..2000 {
                let p = Point::new(rng.gen_range(-200..1000), rng.gen_range(-200..800));
                assert_eq!(
                    grid.classify(p),
                    linear.classify(p),
                    "mismatch at {:?} with {} seeds",
                    p,
                    n,
                );
            }
        }
    }

    #[test]
    fn test_grid_index_ties_and_duplicates() {
        // lattice seeds make many exact ties
        let mut seeds = Vec::new();
        for y in 0..6 {
            for x in 0..6 {
                seeds.push(Point::new(x * 10, y * 10));
            }
        }
        seeds.push(Point::new(20, 20));
        seeds.reverse();

        let linear = LinearScan::new(&seeds).unwrap();
        let grid = GridIndex::new(&seeds).unwrap();
        for y in -5..60 {
            for x in -5..60 {
                let p = Point::new(x, y);
                assert_eq!(grid.classify(p), linear.classify(p), "mismatch at {:?}", p);
            }
        }
    }

    #[test]
    fn test_extreme_coordinates() {
        let seeds = [Point::new(0, 0), Point::new(799, 599)];
        assert_eq!(classify(Point::new(i32::MIN, i32::MIN), &seeds).unwrap(), 0);
        assert_eq!(classify(Point::new(i32::MAX, i32::MAX), &seeds).unwrap(), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seeds: Vec<Point> = (0..40)
            .map(|_| Point::new(rng.gen_range(0..800), rng.gen_range(0..600)))
            .collect();
        let linear = LinearScan::new(&seeds).unwrap();
        let grid = GridIndex::new(&seeds).unwrap();
        for p in [
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, i32::MAX),
            Point::new(i32::MIN, i32::MAX),
            Point::new(i32::MAX, i32::MIN),
            Point::new(400, i32::MIN),
            Point::new(i32::MAX, 300),
        ] {
            assert_eq!(grid.classify(p), linear.classify(p), "mismatch at {:?}", p);
        }
    }

    #[test]
    fn test_grid_index_collinear_seeds() {
        let seeds: Vec<Point> = (0..10).map(|i| Point::new(i * 7, 3)).collect();
        let linear = LinearScan::new(&seeds).unwrap();
        let grid = GridIndex::new(&seeds).unwrap();
        for y in -10..20 {
            for x in -10..80 {
                let p = Point::new(x, y);
                assert_eq!(grid.classify(p), linear.classify(p), "mismatch at {:?}", p);
            }
        }
    }
}
