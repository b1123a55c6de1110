//! Four color puzzle CLI
//!
//! Paint a random Voronoi map with four colors so that no two bordering
//! regions share a color.
//!
//! ## Playing
//!
//!   fourcolor --difficulty easy
//!
//! Type `help` at the prompt for commands. Wins are appended to the hall of
//! fame file (`hall_of_fame.txt` by default).
//!
//! ## YAML config file
//!
//! ```yaml
//! width: 800
//! height: 600
//! difficulty: hard
//! tier_counts: [5, 70, 100]
//! seed: 42
//! ```
//!
//! Run with: `fourcolor --config game.yaml`. CLI args take precedence.
//!
//! ## Other modes
//!
//!   fourcolor --seed 7 -o board.png --show-seeds   # render one board
//!   fourcolor --benchmark --regions 100            # time adjacency derivation
//!
//! Press Ctrl+C during a benchmark to stop early and report what ran.
//! During a game it prints the hall of fame and exits.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use fourcolor_core::{
    derive_adjacency, render_board, Adjacency, ComputeBackend, CpuBackend, Difficulty, Point,
    RegionSet, RenderOptions, SampleGrid, Session,
};

mod config;
mod hall_of_fame;
mod play;

use config::{load_spec, resolve, Overrides, Settings};
use hall_of_fame::HallOfFame;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fourcolor")]
#[command(about = "Four color map puzzle on random Voronoi regions", long_about = None)]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Difficulty tier
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Region count for the chosen tier (clamped to capacity)
    #[arg(short = 'n', long)]
    regions: Option<usize>,

    /// Play area width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Play area height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Sampling cell size in pixels (smaller is finer and slower)
    #[arg(long)]
    cell_size: Option<u32>,

    /// Maximum number of regions any board may hold
    #[arg(long)]
    capacity: Option<usize>,

    /// Random seed for reproducibility (default: current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Hall of fame file
    #[arg(long)]
    hall_of_fame: Option<PathBuf>,

    /// Classify with a linear scan instead of the spatial index
    #[arg(long)]
    linear: bool,

    /// Worker threads for sampling (0 = rayon default)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Render a single board to this PNG and exit
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Draw markers on region seed points
    #[arg(long)]
    show_seeds: bool,

    /// Time adjacency derivation for linear vs indexed classification
    #[arg(long)]
    benchmark: bool,

    /// Number of boards derived per backend in benchmark mode
    #[arg(long, default_value = "10")]
    bench_frames: usize,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            capacity: self.capacity,
            difficulty: self.difficulty.map(Difficulty::from),
            regions: self.regions,
            seed: self.seed,
            hall_of_fame: self.hall_of_fame.clone(),
            show_seeds: self.show_seeds,
        }
    }

    fn backend(&self) -> CpuBackend {
        let mut backend = if self.linear {
            CpuBackend::new_linear()
        } else {
            CpuBackend::new()
        };
        backend.num_threads = self.threads;
        backend
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let spec = args.config.as_deref().map(load_spec).transpose()?;
    let settings = resolve(spec.as_ref(), &args.overrides(), time_seed())?;
    let options = RenderOptions { show_seeds: settings.show_seeds };

    if args.benchmark {
        return run_benchmark(&settings, &args);
    }

    println!(
        "Board: {}x{} (cell size {}), {} difficulty, seed {}",
        settings.game.width,
        settings.game.height,
        settings.game.cell_size,
        settings.difficulty.name(),
        settings.seed,
    );
    let mut session = Session::new(
        settings.game.clone(),
        settings.difficulty,
        settings.seed,
        args.backend(),
    )?;

    // Single board mode: render and save as PNG
    if let Some(output) = &args.output {
        let image = render_board(session.field(), session.regions(), session.adjacency(), options);
        image.save(output)?;
        println!(
            "{} regions, {} borders. Output saved to: {:?}",
            session.regions().len(),
            session.adjacency().edge_count(),
            output
        );
        return Ok(());
    }

    // Ctrl+C still shows the standings before leaving
    {
        let hall = HallOfFame::new(&settings.hall_of_fame);
        ctrlc::set_handler(move || {
            println!();
            if let Err(e) = hall.print() {
                eprintln!("{:#}", e);
            }
            std::process::exit(130);
        })?;
    }

    let hall = HallOfFame::new(&settings.hall_of_fame);
    let stdin = std::io::stdin();
    if let play::Outcome::Won(elapsed) = play::run(&mut session, stdin.lock(), &hall, options)? {
        log::info!("{} board won in {:.2}s", session.difficulty().name(), elapsed.as_secs_f64());
    }
    hall.print()
}

/// Benchmark linear vs indexed classification
fn run_benchmark(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::SeqCst);
        })?;
    }

    let game = &settings.game;
    let count = game.region_count(settings.difficulty);
    let grid = SampleGrid::new(game.bounds(), game.cell_size)?;
    let regions = RegionSet::random(count, game.capacity, grid.bounds, settings.seed)?;
    let seeds = regions.seeds();
    let num_frames = args.bench_frames;

    println!("\n=== Adjacency Benchmark ===");
    println!("Board: {}x{}, cell size {}", game.width, game.height, game.cell_size);
    println!("Sample cells: {} ({}x{})", grid.len(), grid.cols, grid.rows);
    println!("Regions: {}", seeds.len());
    println!("Boards: {}", num_frames);
    println!();

    let mut results: Vec<(&str, Duration, usize)> = Vec::new();
    let mut linear = CpuBackend::new_linear();
    linear.num_threads = args.threads;
    let mut indexed = CpuBackend::new();
    indexed.num_threads = args.threads;
    let mut edges = Vec::new();

    for (name, backend) in [("linear", &mut linear), ("indexed", &mut indexed)] {
        println!("Benchmarking {} scan...", name);
        let (elapsed, done, edge_count) =
            benchmark_backend(backend, &seeds, &grid, game.capacity, num_frames, &interrupted)?;
        edges.push(edge_count);
        if done == 0 {
            eprintln!("  {}: interrupted before any board completed", name);
            break;
        }
        println!(
            "  {}: {:?} total, {:.2} ms/board ({} borders)",
            name,
            elapsed,
            elapsed.as_secs_f64() * 1000.0 / done as f64,
            edge_count
        );
        results.push((name, elapsed / done as u32, done));
        if interrupted.load(Ordering::Relaxed) {
            eprintln!("Interrupted after {} of {} boards", done, num_frames);
            break;
        }
    }

    if let [(_, linear_avg, _), (_, indexed_avg, _)] = results.as_slice() {
        println!();
        println!("=== Summary ===");
        let speedup = linear_avg.as_secs_f64() / indexed_avg.as_secs_f64();
        if speedup > 1.0 {
            println!("Indexed is {:.2}x faster than linear", speedup);
        } else {
            println!("Linear is {:.2}x faster than indexed", 1.0 / speedup);
        }
        if edges[0] != edges[1] {
            eprintln!("Warning: backends disagree on border count ({} vs {})", edges[0], edges[1]);
        }
    }
    Ok(())
}

/// Benchmark a single backend. Returns total time, boards completed and the
/// border count of the last board.
fn benchmark_backend(
    backend: &mut dyn ComputeBackend,
    seeds: &[Point],
    grid: &SampleGrid,
    capacity: usize,
    num_frames: usize,
    interrupted: &AtomicBool,
) -> anyhow::Result<(Duration, usize, usize)> {
    let mut adjacency = Adjacency::with_capacity(capacity)?;

    // Warmup (thread pool spin-up, index allocation)
    derive_adjacency(backend, seeds, grid, &mut adjacency)?;

    let progress = ProgressBar::new(num_frames as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut done = 0;
    for _ in 0..num_frames {
        if interrupted.load(Ordering::Relaxed) {
            progress.abandon_with_message("Interrupted");
            break;
        }
        derive_adjacency(backend, seeds, grid, &mut adjacency)?;
        done += 1;
        progress.inc(1);
    }
    let elapsed = start.elapsed();
    if !interrupted.load(Ordering::Relaxed) {
        progress.finish_and_clear();
    }
    Ok((elapsed, done, adjacency.edge_count()))
}
