//! Coloring rules: conflicts and the win condition.

use crate::{Adjacency, Region};

/// True if region `index` is painted and shares its color with a neighbor.
/// Unpainted regions never conflict, on either side of an edge.
pub fn has_conflict(regions: &[Region], adjacency: &Adjacency, index: usize) -> bool {
    let Some(color) = regions.get(index).and_then(|r| r.paint) else {
        return false;
    };
    adjacency
        .neighbors(index)
        .filter_map(|j| regions.get(j))
        .any(|other| other.paint == Some(color))
}

/// Every region painted and no region in conflict
pub fn is_win(regions: &[Region], adjacency: &Adjacency) -> bool {
    (0..regions.len()).all(|i| regions[i].is_painted() && !has_conflict(regions, adjacency, i))
}

/// Indices of all regions currently in conflict, ascending
pub fn conflicting_regions(regions: &[Region], adjacency: &Adjacency) -> Vec<usize> {
    (0..regions.len())
        .filter(|&i| has_conflict(regions, adjacency, i))
        .collect()
}
