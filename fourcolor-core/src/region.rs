//! Regions, paint colors and the random region generator.

use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Bounds, Point, Result};

/// One of the four paint colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 4] = [
        PaletteColor::Red,
        PaletteColor::Green,
        PaletteColor::Blue,
        PaletteColor::Yellow,
    ];

    /// Palette index in `0..4`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Green => "green",
            PaletteColor::Blue => "blue",
            PaletteColor::Yellow => "yellow",
        }
    }
}

impl FromStr for PaletteColor {
    type Err = String;

    /// Accepts the player-facing keys `1`..`4` or a color name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "red" | "r" => Ok(PaletteColor::Red),
            "2" | "green" | "g" => Ok(PaletteColor::Green),
            "3" | "blue" | "b" => Ok(PaletteColor::Blue),
            "4" | "yellow" | "y" => Ok(PaletteColor::Yellow),
            other => Err(format!(
                "unknown color '{}' (expected 1-4, red, green, blue or yellow)",
                other
            )),
        }
    }
}

/// A Voronoi region: a seed point and its paint state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub seed: Point,
    pub paint: Option<PaletteColor>,
}

impl Region {
    pub fn new(seed: Point) -> Self {
        Self { seed, paint: None }
    }

    /// Paint state as a number: `-1` unpainted, otherwise the palette index
    pub fn color_index(&self) -> i32 {
        self.paint.map_or(-1, |c| c.index() as i32)
    }

    pub fn is_painted(&self) -> bool {
        self.paint.is_some()
    }
}

/// Region storage, allocated once at capacity and reused across regenerations
#[derive(Debug, Clone)]
pub struct RegionSet {
    regions: Vec<Region>,
    capacity: usize,
}

impl RegionSet {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut regions = Vec::new();
        regions.try_reserve_exact(capacity)?;
        Ok(Self { regions, capacity })
    }

    /// Create `count` randomly seeded regions from a reproducible seed
    pub fn random(count: usize, capacity: usize, bounds: Bounds, seed: u64) -> Result<Self> {
        let mut set = Self::with_capacity(capacity)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        set.generate(count, bounds, &mut rng);
        Ok(set)
    }

    /// Replace all regions with `count` uniformly placed, unpainted ones.
    ///
    /// Counts above capacity are clamped. Seeds are drawn independently, so
    /// duplicates are possible and yield an empty region.
    pub fn generate<R: Rng + ?Sized>(&mut self, count: usize, bounds: Bounds, rng: &mut R) {
        let count = if count > self.capacity {
            log::warn!(
                "requested {} regions, clamping to capacity {}",
                count,
                self.capacity
            );
            self.capacity
        } else {
            count
        };

        self.regions.clear();
        for _ in 0..count {
            let x = rng.gen_range(0..bounds.width) as i32;
            let y = rng.gen_range(0..bounds.height) as i32;
            self.regions.push(Region::new(Point::new(x, y)));
        }
        log::debug!(
            "generated {} regions on {}x{} plane",
            count,
            bounds.width,
            bounds.height
        );
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Set or clear the paint of one region. Returns false if out of range.
    pub fn paint(&mut self, index: usize, color: Option<PaletteColor>) -> bool {
        match self.regions.get_mut(index) {
            Some(region) => {
                region.paint = color;
                true
            }
            None => false,
        }
    }

    /// Seed positions (for classification)
    pub fn seeds(&self) -> Vec<Point> {
        self.regions.iter().map(|r| r.seed).collect()
    }
}
