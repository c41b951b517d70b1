//! Routing trait and default breadth-first implementation.
//!
//! # Pluggability
//!
//! The optimizer and the platform call routing via the [`Router`] trait, so
//! applications can swap in other implementations (A*, weighted costs)
//! without touching the pipeline.  The default [`BfsRouter`] is exact for
//! the unweighted 4-connected grid.
//!
//! # Determinism
//!
//! Neighbours are expanded in the fixed order up, down, left, right and each
//! cell keeps the first parent that reaches it, so identical inputs always
//! yield the identical path.

use std::collections::VecDeque;

use evl_core::Cell;

use crate::grid::GridNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ────────────────────────────────────────────────────────────────────

/// An ordered list of cells from origin to destination, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub cells: Vec<Cell>,
}

impl Route {
    /// Number of moves along the route.
    pub fn hops(&self) -> u32 {
        self.cells.len().saturating_sub(1) as u32
    }

    /// `true` if the origin and destination are the same cell.
    pub fn is_trivial(&self) -> bool {
        self.cells.len() <= 1
    }

    /// Cell centres in normalized `[0, 1]²` map space (see
    /// [`Cell::normalized`]).
    pub fn points(&self, rows: u16, cols: u16) -> Vec<(f64, f64)> {
        self.cells.iter().map(|c| c.normalized(rows, cols)).collect()
    }
}

// ── HopField ─────────────────────────────────────────────────────────────────

/// Minimum hop count from one origin to every cell of a grid.
#[derive(Debug, Clone)]
pub struct HopField {
    cols: u16,
    hops: Vec<u32>,
}

impl HopField {
    const UNREACHED: u32 = u32::MAX;

    /// Hops from the origin to `cell`, or `None` when `cell` is blocked,
    /// disconnected, or outside the grid.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<u32> {
        if cell.col >= self.cols {
            return None;
        }
        match self.hops.get(cell.flat(self.cols)) {
            Some(&h) if h != Self::UNREACHED => Some(h),
            _ => None,
        }
    }

    /// Number of cells reachable from the origin, the origin included.
    #[cfg(test)]
    pub(crate) fn reachable_count(&self) -> usize {
        self.hops.iter().filter(|&&h| h != Self::UNREACHED).count()
    }
}

// ── Router trait ─────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so hop fields can be computed on
/// Rayon worker threads.
pub trait Router: Send + Sync {
    /// Minimum-hop path from `from` to `to`.
    ///
    /// `from == to` yields a single-cell route.  Fails with
    /// [`SpatialError::Unreachable`] when no path exists.
    fn shortest_path(&self, grid: &GridNetwork, from: Cell, to: Cell) -> SpatialResult<Route>;

    /// Minimum hop count from `from` to `to` without materializing the path.
    fn hop_count(&self, grid: &GridNetwork, from: Cell, to: Cell) -> SpatialResult<u32> {
        self.shortest_path(grid, from, to).map(|r| r.hops())
    }

    /// Hop counts from `origin` to every cell.
    fn hop_field(&self, grid: &GridNetwork, origin: Cell) -> SpatialResult<HopField>;
}

// ── BfsRouter ────────────────────────────────────────────────────────────────

/// Breadth-first search over the 4-connected grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsRouter;

impl Router for BfsRouter {
    fn shortest_path(&self, grid: &GridNetwork, from: Cell, to: Cell) -> SpatialResult<Route> {
        grid.check_open(from)?;
        grid.check_open(to)?;
        if from == to {
            return Ok(Route { cells: vec![from] });
        }
        let search = bfs(grid, from, Some(to));
        if search.hops[to.flat(grid.cols)] == HopField::UNREACHED {
            return Err(SpatialError::Unreachable { from, to });
        }
        Ok(reconstruct(grid, &search.parent, from, to))
    }

    fn hop_count(&self, grid: &GridNetwork, from: Cell, to: Cell) -> SpatialResult<u32> {
        grid.check_open(from)?;
        grid.check_open(to)?;
        let search = bfs(grid, from, Some(to));
        match search.hops[to.flat(grid.cols)] {
            HopField::UNREACHED => Err(SpatialError::Unreachable { from, to }),
            h => Ok(h),
        }
    }

    fn hop_field(&self, grid: &GridNetwork, origin: Cell) -> SpatialResult<HopField> {
        grid.check_open(origin)?;
        let search = bfs(grid, origin, None);
        Ok(HopField { cols: grid.cols, hops: search.hops })
    }
}

// ── BFS internals ────────────────────────────────────────────────────────────

struct Search {
    /// Hop count per flat cell; `UNREACHED` if not visited.
    hops:   Vec<u32>,
    /// Flat index of the cell that first reached each cell.
    parent: Vec<u32>,
}

fn bfs(grid: &GridNetwork, origin: Cell, target: Option<Cell>) -> Search {
    let n = grid.cell_count();
    let cols = grid.cols;
    let mut hops   = vec![HopField::UNREACHED; n];
    let mut parent = vec![u32::MAX; n];
    let mut queue  = VecDeque::with_capacity(n.min(1024));

    let start = origin.flat(cols);
    hops[start] = 0;
    queue.push_back(origin);

    while let Some(cell) = queue.pop_front() {
        if Some(cell) == target {
            break;
        }
        let here = cell.flat(cols);
        let next = hops[here] + 1;
        for nb in grid.neighbors(cell) {
            let f = nb.flat(cols);
            if hops[f] == HopField::UNREACHED {
                hops[f] = next;
                parent[f] = here as u32;
                queue.push_back(nb);
            }
        }
    }

    Search { hops, parent }
}

fn reconstruct(grid: &GridNetwork, parent: &[u32], from: Cell, to: Cell) -> Route {
    let mut cells = vec![to];
    let mut cur = to;
    while cur != from {
        let p = parent[cur.flat(grid.cols)];
        cur = Cell::from_flat(p as usize, grid.cols);
        cells.push(cur);
    }
    cells.reverse();
    Route { cells }
}
