//! Synthetic grid network and builder.
//!
//! # Data layout
//!
//! Per-cell attributes are stored as flat row-major vectors indexed by
//! [`Cell::flat`]:
//!
//! ```text
//! cell_zone[ row * cols + col ]   blocked[ row * cols + col ]
//! ```
//!
//! Zones and hubs are dense vectors indexed by `ZoneId` and `HubId`.
//!
//! # Hub placement
//!
//! Hubs are placed one at a time.  Hub `h` prefers a free open cell in zone
//! `h % zone_count`; among the candidates it takes the one farthest from every
//! hub placed so far.  An R-tree (via `rstar`) of placed hubs answers the
//! "distance to nearest placed hub" query for each candidate.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use evl_core::{Cell, GridSizing, HubId, HubProfile, SimRng, ZoneId, ZoneLayout};

use crate::{SpatialError, SpatialResult};

/// Child-stream offsets so zone and hub draws never share a sequence.
const ZONE_STREAM: u64 = 1;
const HUB_STREAM:  u64 = 2;

const OUTSIDE: &str = "lies outside the grid";

// ── R-tree hub entry ─────────────────────────────────────────────────────────

/// Entry stored in the placement index: a `[row, col]` point and its hub.
#[derive(Clone)]
struct HubEntry {
    point: [f32; 2],
    id:    HubId,
}

impl RTreeObject for HubEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for HubEntry {
    /// Squared Euclidean distance in cell space.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dr = self.point[0] - point[0];
        let dc = self.point[1] - point[1];
        dr * dr + dc * dc
    }
}

#[inline]
fn cell_point(cell: Cell) -> [f32; 2] {
    [cell.row as f32, cell.col as f32]
}

// ── Zone / Hub ───────────────────────────────────────────────────────────────

/// A contiguous block of cells sharing pollution attributes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub id:             ZoneId,
    pub is_green:       bool,
    /// Pollution propensity before any traffic, in `[0, 1)`.
    pub base_pollution: f64,
    /// Member cells in row-major order, blocked cells included.
    pub cells:          Vec<Cell>,
    /// Number of member cells that are not blocked.
    pub open_cells:     usize,
}

/// A capacity-constrained charging/logistics hub.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hub {
    pub id:       HubId,
    pub cell:     Cell,
    pub zone:     ZoneId,
    /// Maximum trucks per time slot.
    pub capacity: u32,
}

// ── GridNetwork ──────────────────────────────────────────────────────────────

/// A 4-connected `rows × cols` grid partitioned into zones, with hubs placed
/// on open cells.
///
/// Do not construct directly; use [`GridNetworkBuilder`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridNetwork {
    pub rows: u16,
    pub cols: u16,

    // ── Per-cell data (row-major) ─────────────────────────────────────────
    pub cell_zone: Vec<ZoneId>,
    pub blocked:   Vec<bool>,

    // ── Dense tables ──────────────────────────────────────────────────────
    pub zones: Vec<Zone>,
    pub hubs:  Vec<Hub>,
}

impl GridNetwork {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[cfg(test)]
    pub(crate) fn open_cell_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| !b).count()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// `true` if `cell` is inside the grid and not an obstacle.
    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.blocked[cell.flat(self.cols)]
    }

    /// Reject cells outside the grid or on an obstacle.
    pub fn check_open(&self, cell: Cell) -> SpatialResult<()> {
        if !self.contains(cell) {
            return Err(SpatialError::CellOutOfBounds(cell));
        }
        if self.blocked[cell.flat(self.cols)] {
            return Err(SpatialError::Blocked(cell));
        }
        Ok(())
    }

    /// Zone owning `cell`.  `cell` must be inside the grid.
    #[inline]
    pub fn zone_of(&self, cell: Cell) -> ZoneId {
        self.cell_zone[cell.flat(self.cols)]
    }

    /// Open 4-neighbours of `cell` in fixed visiting order: up, down, left,
    /// right.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let Cell { row, col } = cell;
        let up    = row.checked_sub(1).map(|r| Cell::new(r, col));
        let down  = (row + 1 < self.rows).then(|| Cell::new(row + 1, col));
        let left  = col.checked_sub(1).map(|c| Cell::new(row, c));
        let right = (col + 1 < self.cols).then(|| Cell::new(row, col + 1));
        [up, down, left, right]
            .into_iter()
            .flatten()
            .filter(move |&n| !self.blocked[n.flat(self.cols)])
    }

    // ── Zone / hub lookups ────────────────────────────────────────────────

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    #[inline]
    pub fn hub(&self, id: HubId) -> &Hub {
        &self.hubs[id.index()]
    }

    /// Open member cells of `zone` in row-major order.
    pub fn open_cells_in(&self, zone: ZoneId) -> impl Iterator<Item = Cell> + '_ {
        self.zone(zone).cells.iter().copied().filter(|&c| self.is_open(c))
    }

    /// Hubs located in `zone`, in id order.
    pub fn hubs_in(&self, zone: ZoneId) -> impl Iterator<Item = &Hub> + '_ {
        self.hubs.iter().filter(move |h| h.zone == zone)
    }

    /// Ids of green zones in ascending order.
    pub fn green_zones(&self) -> Vec<ZoneId> {
        self.zones.iter().filter(|z| z.is_green).map(|z| z.id).collect()
    }
}

// ── GridNetworkBuilder ───────────────────────────────────────────────────────

/// Configure a [`GridNetwork`], then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use evl_core::{SimRng, ZoneLayout};
/// use evl_spatial::GridNetworkBuilder;
///
/// let mut rng = SimRng::new(7);
/// let grid = GridNetworkBuilder::new(12, 12)
///     .zones(ZoneLayout::default())
///     .hubs(3)
///     .build(&mut rng)
///     .unwrap();
/// assert_eq!(grid.hub_count(), 3);
/// assert_eq!(grid.zone_count(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct GridNetworkBuilder {
    rows:        u16,
    cols:        u16,
    layout:      ZoneLayout,
    hub_count:   usize,
    hub_profile: HubProfile,
    fixed_hubs:  Vec<(Cell, u32)>,
    blocked:     Vec<Cell>,
}

impl GridNetworkBuilder {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            layout:      ZoneLayout::default(),
            hub_count:   0,
            hub_profile: HubProfile::default(),
            fixed_hubs:  Vec::new(),
            blocked:     Vec::new(),
        }
    }

    /// Square grid sized by `sizing` for the given scenario, with
    /// `num_hubs` generated hubs.
    pub fn for_scenario(sizing: &GridSizing, num_trucks: usize, num_hubs: usize) -> Self {
        let side = sizing.side_for(num_trucks, num_hubs);
        Self::new(side, side).hubs(num_hubs)
    }

    pub fn zones(mut self, layout: ZoneLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Number of hubs to place automatically (after any fixed hubs).
    pub fn hubs(mut self, count: usize) -> Self {
        self.hub_count = count;
        self
    }

    pub fn hub_profile(mut self, profile: HubProfile) -> Self {
        self.hub_profile = profile;
        self
    }

    /// Place a hub at a chosen cell with a chosen capacity.  Fixed hubs get
    /// the lowest ids, in call order.
    pub fn fixed_hub(mut self, cell: Cell, capacity: u32) -> Self {
        self.fixed_hubs.push((cell, capacity));
        self
    }

    /// Mark cells as obstacles.  Hubs and truck origins never use them.
    pub fn blocked(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.blocked.extend(cells);
        self
    }

    /// Consume the builder and produce a [`GridNetwork`].
    ///
    /// Zone attributes and hub placement draw from child streams of `rng`,
    /// so the same seed always yields the same grid.
    pub fn build(self, rng: &mut SimRng) -> SpatialResult<GridNetwork> {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 {
            return Err(SpatialError::InvalidDimensions(format!("{rows}x{cols} grid is empty")));
        }
        let zone_count = self.layout.zone_count;
        if zone_count == 0 {
            return Err(SpatialError::InvalidDimensions("zone_count must be positive".into()));
        }
        let b = (zone_count as f64).sqrt().ceil() as u32;
        if b > rows as u32 || b > cols as u32 {
            return Err(SpatialError::InvalidDimensions(format!(
                "{zone_count} zones need at least {b}x{b} cells, grid is {rows}x{cols}"
            )));
        }
        if self.hub_profile.capacity_min == 0
            || self.hub_profile.capacity_min > self.hub_profile.capacity_max
        {
            return Err(SpatialError::InvalidDimensions(format!(
                "hub capacity range {}..={} is invalid",
                self.hub_profile.capacity_min, self.hub_profile.capacity_max
            )));
        }

        let mut zone_rng = rng.child(ZONE_STREAM);
        let mut hub_rng  = rng.child(HUB_STREAM);

        // ── Cells and obstacles ───────────────────────────────────────────
        let cell_count = rows as usize * cols as usize;
        let mut blocked = vec![false; cell_count];
        for &cell in &self.blocked {
            if cell.row >= rows || cell.col >= cols {
                return Err(SpatialError::InvalidPlacement { what: "obstacle", cell, reason: OUTSIDE });
            }
            blocked[cell.flat(cols)] = true;
        }

        // ── Zones by block tiling ─────────────────────────────────────────
        let mut cell_zone = Vec::with_capacity(cell_count);
        let mut zones: Vec<Zone> = (0..zone_count)
            .map(|z| {
                let is_green = self.layout.is_green(z);
                let (lo, hi) =
                    if is_green { self.layout.green_band } else { self.layout.base_band };
                Zone {
                    id: ZoneId(z),
                    is_green,
                    base_pollution: zone_rng.gen_range(lo..hi),
                    cells: Vec::new(),
                    open_cells: 0,
                }
            })
            .collect();
        for flat in 0..cell_count {
            let cell = Cell::from_flat(flat, cols);
            let block_row = cell.row as u32 * b / rows as u32;
            let block_col = cell.col as u32 * b / cols as u32;
            let z = (block_row * b + block_col).min(zone_count as u32 - 1) as u16;
            cell_zone.push(ZoneId(z));
            let zone = &mut zones[z as usize];
            zone.cells.push(cell);
            if !blocked[flat] {
                zone.open_cells += 1;
            }
        }

        // ── Hubs ──────────────────────────────────────────────────────────
        let open = blocked.iter().filter(|&&b| !b).count();
        let total_hubs = self.fixed_hubs.len() + self.hub_count;
        if total_hubs > open {
            return Err(SpatialError::TooManyHubs { hubs: total_hubs, cells: open });
        }

        let mut taken = vec![false; cell_count];
        let mut index: RTree<HubEntry> = RTree::new();
        let mut hubs = Vec::with_capacity(total_hubs);

        for &(cell, capacity) in &self.fixed_hubs {
            if cell.row >= rows || cell.col >= cols {
                return Err(SpatialError::InvalidPlacement { what: "hub", cell, reason: OUTSIDE });
            }
            let flat = cell.flat(cols);
            if blocked[flat] {
                return Err(SpatialError::InvalidPlacement { what: "hub", cell, reason: "is blocked" });
            }
            if taken[flat] {
                return Err(SpatialError::HubCollision(cell));
            }
            if capacity == 0 {
                return Err(SpatialError::InvalidDimensions(format!(
                    "fixed hub at {cell} has zero capacity"
                )));
            }
            let id = HubId(hubs.len() as u32);
            taken[flat] = true;
            index.insert(HubEntry { point: cell_point(cell), id });
            hubs.push(Hub { id, cell, zone: cell_zone[flat], capacity });
        }

        for _ in 0..self.hub_count {
            let id = HubId(hubs.len() as u32);
            let preferred = ZoneId((id.0 % zone_count as u32) as u16);
            let free = |c: &Cell| {
                let f = c.flat(cols);
                !blocked[f] && !taken[f]
            };
            let mut candidates: Vec<Cell> =
                zones[preferred.index()].cells.iter().copied().filter(free).collect();
            if candidates.is_empty() {
                candidates = (0..cell_count).map(|f| Cell::from_flat(f, cols)).filter(free).collect();
            }
            hub_rng.shuffle(&mut candidates);

            let mut best: Option<(Cell, f32)> = None;
            for &c in &candidates {
                let q = cell_point(c);
                let spread = index.nearest_neighbor(&q).map_or(f32::MAX, |e| e.distance_2(&q));
                if best.is_none_or(|(_, d)| spread > d) {
                    best = Some((c, spread));
                }
            }
            let Some((cell, _)) = best else {
                return Err(SpatialError::TooManyHubs { hubs: total_hubs, cells: open });
            };

            let flat = cell.flat(cols);
            taken[flat] = true;
            index.insert(HubEntry { point: cell_point(cell), id });
            let capacity =
                hub_rng.gen_range(self.hub_profile.capacity_min..=self.hub_profile.capacity_max);
            hubs.push(Hub { id, cell, zone: cell_zone[flat], capacity });
        }

        debug!(rows, cols, zones = zones.len(), hubs = hubs.len(), open, "grid network built");

        Ok(GridNetwork { rows, cols, cell_zone, blocked, zones, hubs })
    }
}
