//! YAML game file and CLI override resolution.
//!
//! ```yaml
//! width: 800
//! height: 600
//! cell_size: 2
//! capacity: 100
//! difficulty: medium
//! tier_counts: [5, 70, 100]
//! seed: 42
//! hall_of_fame: hall_of_fame.txt
//! show_seeds: false
//! ```
//!
//! Every key is optional. CLI args take precedence over file values, which
//! take precedence over the built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use fourcolor_core::{Difficulty, GameConfig};

pub const DEFAULT_HALL_OF_FAME: &str = "hall_of_fame.txt";

/// YAML game file format
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSpec {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub cell_size: Option<u32>,
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tier_counts: Option<[usize; 3]>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub hall_of_fame: Option<PathBuf>,
    #[serde(default)]
    pub show_seeds: Option<bool>,
}

pub fn load_spec(path: &Path) -> anyhow::Result<GameSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    parse_spec(&contents).with_context(|| format!("failed to parse config file: {:?}", path))
}

pub fn parse_spec(contents: &str) -> anyhow::Result<GameSpec> {
    Ok(serde_yaml::from_str(contents)?)
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub cell_size: Option<u32>,
    pub capacity: Option<usize>,
    pub difficulty: Option<Difficulty>,
    pub regions: Option<usize>,
    pub seed: Option<u64>,
    pub hall_of_fame: Option<PathBuf>,
    pub show_seeds: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub game: GameConfig,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub hall_of_fame: PathBuf,
    pub show_seeds: bool,
}

/// Merge CLI overrides over the config file over defaults.
/// `fallback_seed` is used when neither source names a seed.
pub fn resolve(
    spec: Option<&GameSpec>,
    cli: &Overrides,
    fallback_seed: u64,
) -> anyhow::Result<Settings> {
    let empty = GameSpec::default();
    let spec = spec.unwrap_or(&empty);
    let defaults = GameConfig::default();

    let spec_difficulty = spec
        .difficulty
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let difficulty = cli.difficulty.or(spec_difficulty).unwrap_or_default();

    let mut game = GameConfig {
        width: cli.width.or(spec.width).unwrap_or(defaults.width),
        height: cli.height.or(spec.height).unwrap_or(defaults.height),
        cell_size: cli.cell_size.or(spec.cell_size).unwrap_or(defaults.cell_size),
        capacity: cli.capacity.or(spec.capacity).unwrap_or(defaults.capacity),
        tier_counts: spec.tier_counts.unwrap_or(defaults.tier_counts),
    };
    if let Some(regions) = cli.regions {
        game.set_tier_count(difficulty, regions);
    }
    game.validate()?;

    Ok(Settings {
        game,
        difficulty,
        seed: cli.seed.or(spec.seed).unwrap_or(fallback_seed),
        hall_of_fame: cli
            .hall_of_fame
            .clone()
            .or_else(|| spec.hall_of_fame.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HALL_OF_FAME)),
        show_seeds: cli.show_seeds || spec.show_seeds.unwrap_or(false),
    })
}
