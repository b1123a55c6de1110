//! Game session: difficulty, regions, adjacency and player input.

use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::classify::nearest_linear;
use crate::voronoi::ComputeBackend;
use crate::{
    derive_adjacency, rules, Adjacency, Bounds, FourColorError, PaletteColor, Point, Region,
    RegionSet, Result, SampleField, SampleGrid,
};

/// Difficulty tier, mapped to a region count by [`GameConfig::tier_counts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn tier(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

/// Board geometry and region limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    /// Side of a sample cell in pixels
    pub cell_size: u32,
    /// Maximum region count; adjacency is allocated for this many
    pub capacity: usize,
    /// Region counts for easy, medium and hard
    pub tier_counts: [usize; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            cell_size: 2,
            capacity: 100,
            tier_counts: [5, 70, 100],
        }
    }
}

impl GameConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(FourColorError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.width > i32::MAX as u32 / 2 || self.height > i32::MAX as u32 / 2 {
            return Err(FourColorError::InvalidConfig(format!(
                "plane {}x{} is too large",
                self.width, self.height
            )));
        }
        SampleGrid::new(self.bounds(), self.cell_size).map(|_| ())
    }

    pub fn set_tier_count(&mut self, difficulty: Difficulty, count: usize) {
        self.tier_counts[difficulty.tier()] = count;
    }

    /// Region count for a tier: clamped to capacity, never below one
    pub fn region_count(&self, difficulty: Difficulty) -> usize {
        self.tier_counts[difficulty.tier()].min(self.capacity).max(1)
    }
}

/// One puzzle board and the player's progress on it.
///
/// The board is regenerated wholesale on restart or difficulty change. Once
/// the win is observed through [`Session::poll_win`] the board is frozen and
/// paint input is ignored.
pub struct Session<B: ComputeBackend> {
    config: GameConfig,
    grid: SampleGrid,
    difficulty: Difficulty,
    regions: RegionSet,
    /// Next board is generated here and swapped in once derivation succeeds
    spare: RegionSet,
    adjacency: Adjacency,
    field: SampleField,
    selected: PaletteColor,
    frozen: bool,
    rng: ChaCha8Rng,
    backend: B,
}

impl<B: ComputeBackend> Session<B> {
    pub fn new(
        config: GameConfig,
        difficulty: Difficulty,
        seed: u64,
        mut backend: B,
    ) -> Result<Self> {
        config.validate()?;
        let grid = SampleGrid::new(config.bounds(), config.cell_size)?;
        let mut regions = RegionSet::with_capacity(config.capacity)?;
        let spare = RegionSet::with_capacity(config.capacity)?;
        let mut adjacency = Adjacency::with_capacity(config.capacity)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        regions.generate(config.region_count(difficulty), grid.bounds, &mut rng);
        let field = derive_adjacency(&mut backend, &regions.seeds(), &grid, &mut adjacency)?;

        Ok(Self {
            config,
            grid,
            difficulty,
            regions,
            spare,
            adjacency,
            field,
            selected: PaletteColor::Red,
            frozen: false,
            rng,
            backend,
        })
    }

    /// Switch tier and generate a fresh board
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        let previous = std::mem::replace(&mut self.difficulty, difficulty);
        self.regenerate().inspect_err(|_| self.difficulty = previous)
    }

    /// Fresh board at the current tier
    pub fn restart(&mut self) -> Result<()> {
        self.regenerate()
    }

    fn regenerate(&mut self) -> Result<()> {
        let count = self.config.region_count(self.difficulty);
        self.spare.generate(count, self.grid.bounds, &mut self.rng);
        // adjacency is only rebuilt after sampling succeeds
        self.field = derive_adjacency(
            &mut self.backend,
            &self.spare.seeds(),
            &self.grid,
            &mut self.adjacency,
        )?;
        std::mem::swap(&mut self.regions, &mut self.spare);
        self.selected = PaletteColor::Red;
        self.frozen = false;
        log::info!(
            "new {} board: {} regions, {} borders",
            self.difficulty.name(),
            count,
            self.adjacency.edge_count()
        );
        Ok(())
    }

    pub fn select_color(&mut self, color: PaletteColor) {
        self.selected = color;
    }

    pub fn selected_color(&self) -> PaletteColor {
        self.selected
    }

    /// Region nearest to `p`; any coordinate is accepted
    pub fn region_at(&self, p: Point) -> usize {
        nearest_linear(p, &self.regions.seeds())
    }

    /// Paint the region under `p` with the selected color.
    /// Returns the painted region, or `None` once the board is frozen.
    pub fn paint_at(&mut self, p: Point) -> Option<usize> {
        if self.frozen {
            return None;
        }
        let index = self.region_at(p);
        self.regions.paint(index, Some(self.selected));
        Some(index)
    }

    /// Paint a region by index. Returns false when frozen or out of range.
    pub fn paint_region(&mut self, index: usize, color: Option<PaletteColor>) -> bool {
        !self.frozen && self.regions.paint(index, color)
    }

    /// Live evaluation of the win condition
    pub fn is_won(&self) -> bool {
        rules::is_win(self.regions.as_slice(), &self.adjacency)
    }

    /// Check for a win and freeze the board when it happens
    pub fn poll_win(&mut self) -> bool {
        if !self.frozen && self.is_won() {
            self.frozen = true;
        }
        self.frozen
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn has_conflict(&self, index: usize) -> bool {
        rules::has_conflict(self.regions.as_slice(), &self.adjacency, index)
    }

    pub fn conflicts(&self) -> Vec<usize> {
        rules::conflicting_regions(self.regions.as_slice(), &self.adjacency)
    }

    pub fn painted_count(&self) -> usize {
        self.regions.as_slice().iter().filter(|r| r.is_painted()).count()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn regions(&self) -> &[Region] {
        self.regions.as_slice()
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn field(&self) -> &SampleField {
        &self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classifier, CpuBackend, GridIndex};
    use std::cell::Cell;
    use std::rc::Rc;

    fn small_config() -> GameConfig {
        GameConfig {
            width: 160,
            height: 120,
            cell_size: 2,
            capacity: 20,
            tier_counts: [3, 8, 40],
        }
    }

    fn session(difficulty: Difficulty, seed: u64) -> Session<CpuBackend> {
        Session::new(small_config(), difficulty, seed, CpuBackend::new()).unwrap()
    }

    /// Greedy coloring in index order; fine for the small easy boards here
    fn greedy_colors(s: &Session<CpuBackend>) -> Option<Vec<PaletteColor>> {
        let mut colors: Vec<PaletteColor> = Vec::new();
        for i in 0..s.regions().len() {
            let taken: Vec<PaletteColor> = s
                .adjacency()
                .neighbors(i)
                .filter(|&j| j < i)
                .map(|j| colors[j])
                .collect();
            colors.push(*PaletteColor::ALL.iter().find(|c| !taken.contains(c))?);
        }
        Some(colors)
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("3".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_region_count_clamped_to_capacity() {
        let mut config = small_config();
        assert_eq!(config.region_count(Difficulty::Easy), 3);
        assert_eq!(config.region_count(Difficulty::Hard), 20);
        config.set_tier_count(Difficulty::Easy, 12);
        assert_eq!(config.region_count(Difficulty::Easy), 12);

        let s = session(Difficulty::Hard, 1);
        assert_eq!(s.regions().len(), 20);
    }

    #[test]
    fn test_default_config_matches_tiers() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.region_count(Difficulty::Easy), 5);
        assert_eq!(config.region_count(Difficulty::Medium), 70);
        assert_eq!(config.region_count(Difficulty::Hard), 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.cell_size = 0;
        assert!(Session::new(config, Difficulty::Easy, 0, CpuBackend::new()).is_err());

        let mut config = small_config();
        config.capacity = 0;
        assert!(matches!(config.validate(), Err(FourColorError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_tier_still_has_a_region() {
        let mut config = small_config();
        config.tier_counts = [0, 0, 0];
        let s = Session::new(config, Difficulty::Easy, 0, CpuBackend::new()).unwrap();
        assert_eq!(s.regions().len(), 1);
    }

    #[test]
    fn test_paint_at_uses_nearest_region() {
        let mut s = session(Difficulty::Medium, 3);
        s.select_color(PaletteColor::Blue);
        let seed = s.regions()[4].seed;
        let painted = s.paint_at(seed);
        // a duplicate seed with a lower index would win the tie
        let expected = s.region_at(seed);
        assert_eq!(painted, Some(expected));
        assert_eq!(s.regions()[expected].paint, Some(PaletteColor::Blue));
        assert_eq!(s.painted_count(), 1);
    }

    #[test]
    fn test_paint_at_extreme_coordinates() {
        let config = GameConfig::default();
        let mut s = Session::new(config, Difficulty::Easy, 1, CpuBackend::new()).unwrap();
        let seeds: Vec<Point> = s.regions().iter().map(|r| r.seed).collect();
        let grid = GridIndex::new(&seeds).unwrap();

        s.select_color(PaletteColor::Yellow);
        for p in [Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX)] {
            let index = s.paint_at(p).unwrap();
            assert_eq!(index, grid.classify(p));
            assert_eq!(s.regions()[index].paint, Some(PaletteColor::Yellow));
        }
    }

    /// Samples with a CPU backend until told to fail
    struct FlakyBackend {
        fail: Rc<Cell<bool>>,
        inner: CpuBackend,
    }

    impl ComputeBackend for FlakyBackend {
        fn sample(&mut self, seeds: &[Point], grid: &SampleGrid) -> Result<SampleField> {
            if self.fail.get() {
                return Err(FourColorError::InvalidConfig("sampling failed".to_string()));
            }
            self.inner.sample(seeds, grid)
        }
    }

    #[test]
    fn test_failed_regeneration_keeps_board() {
        let fail = Rc::new(Cell::new(false));
        let backend = FlakyBackend { fail: fail.clone(), inner: CpuBackend::new() };
        let mut s = Session::new(small_config(), Difficulty::Medium, 5, backend).unwrap();
        s.paint_region(0, Some(PaletteColor::Green));
        let seeds: Vec<Point> = s.regions().iter().map(|r| r.seed).collect();
        let pairs = s.adjacency().pairs();
        let field = s.field().clone();

        fail.set(true);
        assert!(s.restart().is_err());
        assert!(s.set_difficulty(Difficulty::Hard).is_err());

        let after: Vec<Point> = s.regions().iter().map(|r| r.seed).collect();
        assert_eq!(after, seeds);
        assert_eq!(s.adjacency().pairs(), pairs);
        assert_eq!(s.field(), &field);
        assert_eq!(s.regions()[0].paint, Some(PaletteColor::Green));

        assert_eq!(s.difficulty(), Difficulty::Medium);

        fail.set(false);
        s.restart().unwrap();
        assert_eq!(s.regions().len(), small_config().region_count(Difficulty::Medium));
        assert_eq!(s.painted_count(), 0);
        assert_ne!(s.regions().iter().map(|r| r.seed).collect::<Vec<_>>(), seeds);
    }

    #[test]
    fn test_restart_resets_board() {
        let mut s = session(Difficulty::Easy, 9);
        s.select_color(PaletteColor::Green);
        s.paint_at(Point::new(10, 10));
        s.restart().unwrap();
        assert_eq!(s.painted_count(), 0);
        assert_eq!(s.selected_color(), PaletteColor::Red);
        assert!(!s.is_frozen());
    }

    #[test]
    fn test_set_difficulty_changes_count() {
        let mut s = session(Difficulty::Easy, 2);
        assert_eq!(s.regions().len(), 3);
        s.set_difficulty(Difficulty::Medium).unwrap();
        assert_eq!(s.regions().len(), 8);
        assert_eq!(s.difficulty(), Difficulty::Medium);
        assert_eq!(s.adjacency().capacity(), 20);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = session(Difficulty::Medium, 77);
        let b = session(Difficulty::Medium, 77);
        assert_eq!(a.regions(), b.regions());
        assert_eq!(a.adjacency(), b.adjacency());
        assert_eq!(a.field(), b.field());
    }

    #[test]
    fn test_win_freezes_board() {
        for seed in 0..20 {
            let mut s = session(Difficulty::Easy, seed);
            let Some(colors) = greedy_colors(&s) else {
                continue;
            };
            assert!(!s.poll_win(), "unpainted board cannot be won");

            for (i, color) in colors.iter().enumerate() {
                assert!(s.paint_region(i, Some(*color)));
            }
            assert!(s.conflicts().is_empty());
            assert!(s.is_won());
            assert!(s.poll_win());
            assert!(s.is_frozen());

            // frozen: input is ignored and the win stays
            assert_eq!(s.paint_at(Point::new(0, 0)), None);
            assert!(!s.paint_region(0, None));
            assert!(s.is_won());
            return;
        }
        panic!("no greedy-colorable board found");
    }

    #[test]
    fn test_conflict_blocks_win() {
        for seed in 0..20 {
            let mut s = session(Difficulty::Medium, seed);
            let Some((a, b)) = s.adjacency().pairs().first().copied() else {
                continue;
            };
            for i in 0..s.regions().len() {
                s.paint_region(i, Some(PaletteColor::Red));
            }
            assert!(s.has_conflict(a));
            assert!(s.has_conflict(b));
            assert!(!s.poll_win());
            assert!(!s.is_frozen());
            return;
        }
        panic!("no board with an edge found");
    }
}
