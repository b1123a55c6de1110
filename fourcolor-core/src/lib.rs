//! Core of the four color puzzle.
//!
//! Partitions the plane into Voronoi regions around random seed points,
//! derives which regions touch by sampling a regular grid, and evaluates
//! the coloring rules. The sampling pass runs on the CPU, parallelized with
//! Rayon when the `parallel` feature is enabled.

mod adjacency;
mod classify;
mod geometry;
mod region;
mod render;
mod rules;
mod session;
mod voronoi;

#[cfg(feature = "cpu")]
mod cpu;

pub use adjacency::{derive_adjacency, Adjacency};
pub use classify::{classify, Classifier, GridIndex, LinearScan};
pub use geometry::{Bounds, Point, SampleGrid};
pub use region::{PaletteColor, Region, RegionSet};
pub use render::{render_board, RenderOptions};
pub use rules::{conflicting_regions, has_conflict, is_win};
pub use session::{Difficulty, GameConfig, Session};
pub use voronoi::{is_boundary_cell, ComputeBackend, SampleField};

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;

/// RGB color tuple
pub type Rgb = [u8; 3];

/// Error type for puzzle operations
#[derive(Debug, thiserror::Error)]
pub enum FourColorError {
    #[error("No regions provided")]
    NoRegions,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Allocation failed: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[cfg(feature = "parallel")]
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, FourColorError>;
