//! Permutation and edge-set primitives behind the variation strategies.
//!
//! Each DE variant needs a different notion of "difference between two
//! tours". The building blocks live here, as free functions over `&[usize]`
//! tours:
//!
//! # Edge sets
//!
//! - [`edge_incidence`]: the undirected edges of a closed tour
//!
//! # Movements
//!
//! - [`movements_between`]: minimal ordered swap sequence turning one tour
//!   into another
//! - [`apply_movements`]: replay a swap sequence on a tour
//!
//! # Relocation
//!
//! - [`relocation_map`]: where each position of one tour sits in another
//! - [`relocate`]: move a tour's labels according to a map
//!
//! # Continuous embedding
//!
//! - [`normalize_labels`]: node label `v` → `v / (n - 1)`
//! - [`decode_ranks`]: real vector → permutation by rank order
//!
//! # References
//!
//! - Prado et al. (2010), "Using differential evolution for combinatorial
//!   optimization: a general approach"
//! - Onwubolu & Davendra (2009), *Differential Evolution: A Handbook for
//!   Global Permutation-Based Combinatorial Optimization*

use crate::relation::SymmetricRelation;

// ============================================================================
// Edge sets
// ============================================================================

/// Builds the edge-incidence relation of a closed tour.
///
/// Pair `{tour[i], tour[i+1]}` is set for every `i`, including the closing
/// edge from the last node back to the first.
pub fn edge_incidence(tour: &[usize]) -> SymmetricRelation<bool> {
    let n = tour.len();
    let mut edges = SymmetricRelation::dense(n, false);
    for (i, &node) in tour.iter().enumerate() {
        edges.set(node, tour[(i + 1) % n], true);
    }
    edges
}

// ============================================================================
// Movements
// ============================================================================

/// A transposition of two positions of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    /// Position the node is taken from.
    pub source: usize,
    /// Position the node is moved to.
    pub target: usize,
}

/// Minimal ordered list of swaps that gives `from` the node-to-position
/// assignment of `to`.
///
/// Walks positions left to right on a working copy of `from`; whenever the
/// node `to[i]` is not already at `i`, it is found at some later position
/// `j`, swapped into place, and `Movement { source: j, target: i }` is
/// recorded.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the tours have different lengths.
pub fn movements_between(from: &[usize], to: &[usize]) -> Vec<Movement> {
    assert_eq!(from.len(), to.len(), "tours must have equal length");
    let mut work = from.to_vec();
    let mut position = positions_of(&work);
    let mut movements = Vec::new();

    for (i, &wanted) in to.iter().enumerate() {
        let j = position[wanted];
        if j != i {
            let displaced = work[i];
            work.swap(i, j);
            position[wanted] = i;
            position[displaced] = j;
            movements.push(Movement {
                source: j,
                target: i,
            });
        }
    }

    movements
}

/// Applies `movements`, in order, as swaps on a copy of `tour`.
pub fn apply_movements(tour: &[usize], movements: &[Movement]) -> Vec<usize> {
    let mut out = tour.to_vec();
    for m in movements {
        out.swap(m.source, m.target);
    }
    out
}

// ============================================================================
// Relocation
// ============================================================================

/// Builds the relocation map from `reference` to `other`.
///
/// `map[i]` is the position in `other` holding `reference[i]`, or `i` when
/// the label does not occur in `other`.
pub fn relocation_map(reference: &[usize], other: &[usize]) -> Vec<usize> {
    let labels = other.iter().copied().max().map_or(0, |m| m + 1);
    let mut position = vec![None; labels];
    for (j, &node) in other.iter().enumerate() {
        if position[node].is_none() {
            position[node] = Some(j);
        }
    }
    reference
        .iter()
        .enumerate()
        .map(|(i, &node)| position.get(node).copied().flatten().unwrap_or(i))
        .collect()
}

/// Places `tour[i]` at position `map[i]` of a new tour.
///
/// # Panics
/// Panics if `map` is shorter than `tour` or points outside it.
pub fn relocate(tour: &[usize], map: &[usize]) -> Vec<usize> {
    let mut out = vec![0; tour.len()];
    for (i, &node) in tour.iter().enumerate() {
        out[map[i]] = node;
    }
    out
}

// ============================================================================
// Continuous embedding
// ============================================================================

/// Maps each label `v` to `v / (n - 1)`, so labels span `[0, 1]`.
///
/// Tours with fewer than two nodes map to zeros.
pub fn normalize_labels(tour: &[usize]) -> Vec<f64> {
    let max_label = tour.len().saturating_sub(1) as f64;
    if max_label == 0.0 {
        return vec![0.0; tour.len()];
    }
    tour.iter().map(|&v| v as f64 / max_label).collect()
}

/// Decodes a real vector into a permutation by rank order.
///
/// The smallest value receives rank 0, the next smallest rank 1, and so on;
/// equal values are ranked by index, earliest first. The returned vector
/// holds each coordinate's rank in coordinate order.
///
/// # Complexity
/// O(n log n)
pub fn decode_ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    // Stable sort keeps ties in index order.
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0; values.len()];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = rank;
    }
    ranks
}

// ============================================================================
// Helpers
// ============================================================================

/// Whether `perm` is a permutation of `0..n`.
pub fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in perm {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

/// Inverse lookup: `position[node]` is the index of `node` in `tour`.
fn positions_of(tour: &[usize]) -> Vec<usize> {
    let mut position = vec![0; tour.len()];
    for (i, &node) in tour.iter().enumerate() {
        position[node] = i;
    }
    position
}

// ============================================================================
// Tests
// ============================================================================
