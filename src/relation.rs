//! Symmetric square relations over node pairs.
//!
//! [`SymmetricRelation`] stores one value per unordered pair `{i, j}` of a
//! square `size × size` relation: `get(i, j)` and `get(j, i)` address the
//! same cell. Two storage strategies are available:
//!
//! - [`Storage::Dense`]: a packed upper triangle, `size·(size+1)/2` cells.
//!   Used for cost matrices and edge-incidence masks.
//! - [`Storage::Sparse`]: a hash map keyed by the normalized pair. Cells
//!   that were never set read as the default value.
//!
//! Boolean relations additionally support the set algebra used by the
//! adjacency-set strategy (union, symmetric difference, containment).

use std::collections::HashMap;

/// Storage strategy for a [`SymmetricRelation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Storage {
    /// Packed upper triangle.
    Dense,
    /// Hash map of explicitly set cells.
    Sparse,
}

#[derive(Debug, Clone)]
enum Cells<T> {
    Dense(Vec<T>),
    Sparse(HashMap<(usize, usize), T>),
}

/// A symmetric relation over the pairs of `0..size`.
#[derive(Debug, Clone)]
pub struct SymmetricRelation<T> {
    size: usize,
    default: T,
    cells: Cells<T>,
}

impl<T: Clone> SymmetricRelation<T> {
    /// Creates a relation where every pair holds `default`.
    pub fn new(size: usize, default: T, storage: Storage) -> Self {
        let cells = match storage {
            Storage::Dense => Cells::Dense(vec![default.clone(); size * (size + 1) / 2]),
            Storage::Sparse => Cells::Sparse(HashMap::new()),
        };
        Self {
            size,
            default,
            cells,
        }
    }

    /// Creates a dense relation.
    pub fn dense(size: usize, default: T) -> Self {
        Self::new(size, default, Storage::Dense)
    }

    /// Creates a sparse relation.
    pub fn sparse(size: usize, default: T) -> Self {
        Self::new(size, default, Storage::Sparse)
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// The storage strategy in use.
    pub fn storage(&self) -> Storage {
        match self.cells {
            Cells::Dense(_) => Storage::Dense,
            Cells::Sparse(_) => Storage::Sparse,
        }
    }

    /// Returns the value stored for the pair `{row, column}`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn get(&self, row: usize, column: usize) -> &T {
        let key = self.key(row, column);
        match &self.cells {
            Cells::Dense(values) => &values[triangle_index(key)],
            Cells::Sparse(map) => map.get(&key).unwrap_or(&self.default),
        }
    }

    /// Stores `value` for the pair `{row, column}`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn set(&mut self, row: usize, column: usize, value: T) {
        let key = self.key(row, column);
        match &mut self.cells {
            Cells::Dense(values) => values[triangle_index(key)] = value,
            Cells::Sparse(map) => {
                map.insert(key, value);
            }
        }
    }

    /// Resets every cell to the default value.
    pub fn clear(&mut self) {
        match &mut self.cells {
            Cells::Dense(values) => values.fill(self.default.clone()),
            Cells::Sparse(map) => map.clear(),
        }
    }

    fn key(&self, row: usize, column: usize) -> (usize, usize) {
        assert!(
            row < self.size && column < self.size,
            "index ({row}, {column}) out of range for relation of size {}",
            self.size
        );
        if row <= column {
            (row, column)
        } else {
            (column, row)
        }
    }
}

/// Position of the normalized pair `(i, j)`, `i <= j`, in the packed triangle.
fn triangle_index((i, j): (usize, usize)) -> usize {
    j * (j + 1) / 2 + i
}

impl SymmetricRelation<bool> {
    /// Builds a dense boolean relation by evaluating `f` on every pair `i <= j`.
    fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut out = Self::dense(size, false);
        for j in 0..size {
            for i in 0..=j {
                if f(i, j) {
                    out.set(i, j, true);
                }
            }
        }
        out
    }

    /// Pairs present in either relation.
    ///
    /// # Panics
    /// Panics if the relations differ in size.
    pub fn union(&self, other: &Self) -> Self {
        assert_eq!(self.size, other.size, "relations must have equal size");
        Self::from_fn(self.size, |i, j| *self.get(i, j) || *other.get(i, j))
    }

    /// Pairs present in exactly one of the two relations.
    ///
    /// # Panics
    /// Panics if the relations differ in size.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        assert_eq!(self.size, other.size, "relations must have equal size");
        Self::from_fn(self.size, |i, j| *self.get(i, j) != *other.get(i, j))
    }

    /// Whether every pair set in `other` is also set in `self`.
    pub fn contains_all(&self, other: &Self) -> bool {
        other.pairs().into_iter().all(|(i, j)| *self.get(i, j))
    }

    /// Set pairs `(i, j)` with `i < j`, in row-major order.
    ///
    /// Diagonal cells are ignored; a node is never adjacent to itself.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        match &self.cells {
            Cells::Dense(_) => {
                let mut out = Vec::new();
                for i in 0..self.size {
                    for j in (i + 1)..self.size {
                        if *self.get(i, j) {
                            out.push((i, j));
                        }
                    }
                }
                out
            }
            Cells::Sparse(map) => {
                let mut out: Vec<(usize, usize)> = map
                    .iter()
                    .filter(|(key, set)| **set && key.0 != key.1)
                    .map(|(&key, _)| key)
                    .collect();
                out.sort_unstable();
                out
            }
        }
    }

    /// Number of set off-diagonal pairs.
    pub fn count(&self) -> usize {
        self.pairs().len()
    }
}
