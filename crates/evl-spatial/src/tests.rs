//! Unit tests for evl-spatial.
//!
//! All grids are built from fixed seeds so placements are reproducible.

#[cfg(test)]
mod helpers {
    use evl_core::{SimRng, ZoneLayout};

    use crate::{GridNetwork, GridNetworkBuilder};

    /// Single-zone layout so tiny grids are valid.
    pub fn one_zone() -> ZoneLayout {
        ZoneLayout { zone_count: 1, ..ZoneLayout::default() }
    }

    /// Obstacle-free `rows × cols` grid with one zone and no hubs.
    pub fn open_grid(rows: u16, cols: u16) -> GridNetwork {
        GridNetworkBuilder::new(rows, cols)
            .zones(one_zone())
            .build(&mut SimRng::new(1))
            .unwrap()
    }
}

// ── Builder & grid structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use std::collections::VecDeque;

    use evl_core::{Cell, GridSizing, HubProfile, SimRng, ZoneId, ZoneLayout};

    use crate::{GridNetwork, GridNetworkBuilder, SpatialError};

    fn default_grid(seed: u64, hubs: usize) -> GridNetwork {
        GridNetworkBuilder::new(12, 12).hubs(hubs).build(&mut SimRng::new(seed)).unwrap()
    }

    /// Flood-fill a zone from its first cell using only member cells.
    fn zone_is_contiguous(grid: &GridNetwork, zone: ZoneId) -> bool {
        let cells = &grid.zone(zone).cells;
        let mut seen = vec![false; grid.cell_count()];
        let mut queue = VecDeque::from([cells[0]]);
        seen[cells[0].flat(grid.cols)] = true;
        let mut reached = 1;
        while let Some(c) = queue.pop_front() {
            let around = [
                c.row.checked_sub(1).map(|r| Cell::new(r, c.col)),
                (c.row + 1 < grid.rows).then(|| Cell::new(c.row + 1, c.col)),
                c.col.checked_sub(1).map(|k| Cell::new(c.row, k)),
                (c.col + 1 < grid.cols).then(|| Cell::new(c.row, c.col + 1)),
            ];
            for n in around.into_iter().flatten() {
                let f = n.flat(grid.cols);
                if !seen[f] && grid.zone_of(n) == zone {
                    seen[f] = true;
                    reached += 1;
                    queue.push_back(n);
                }
            }
        }
        reached == cells.len()
    }

    #[test]
    fn every_cell_in_exactly_one_zone() {
        let grid = default_grid(1, 0);
        assert_eq!(grid.zone_count(), 10);
        let total: usize = grid.zones.iter().map(|z| z.cells.len()).sum();
        assert_eq!(total, grid.cell_count());
        for zone in &grid.zones {
            assert!(!zone.cells.is_empty(), "zone {} is empty", zone.id);
            for &c in &zone.cells {
                assert_eq!(grid.zone_of(c), zone.id);
            }
        }
    }

    #[test]
    fn zones_are_contiguous() {
        for (rows, cols) in [(12, 12), (13, 17), (20, 5)] {
            let grid = GridNetworkBuilder::new(rows, cols).build(&mut SimRng::new(3)).unwrap();
            for z in &grid.zones {
                assert!(zone_is_contiguous(&grid, z.id), "zone {} split on {rows}x{cols}", z.id);
            }
        }
    }

    #[test]
    fn green_zones_follow_layout() {
        let grid = default_grid(1, 0);
        let green: Vec<u16> = grid.green_zones().iter().map(|z| z.0).collect();
        assert_eq!(green, vec![0, 3, 6, 9]);
    }

    #[test]
    fn base_pollution_within_bands() {
        let layout = ZoneLayout::default();
        let grid = default_grid(9, 0);
        for z in &grid.zones {
            let (lo, hi) = if z.is_green { layout.green_band } else { layout.base_band };
            assert!(z.base_pollution >= lo && z.base_pollution < hi);
        }
    }

    #[test]
    fn hubs_distinct_and_prefer_their_zone() {
        let grid = default_grid(5, 6);
        assert_eq!(grid.hub_count(), 6);
        let mut cells: Vec<Cell> = grid.hubs.iter().map(|h| h.cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 6, "hub cells collide");
        for hub in &grid.hubs {
            assert_eq!(hub.zone.0 as u32, hub.id.0 % 10);
            assert_eq!(grid.zone_of(hub.cell), hub.zone);
        }
    }

    #[test]
    fn hub_capacity_within_profile() {
        let profile = HubProfile { capacity_min: 3, capacity_max: 4 };
        let grid = GridNetworkBuilder::new(12, 12)
            .hubs(8)
            .hub_profile(profile)
            .build(&mut SimRng::new(2))
            .unwrap();
        assert!(grid.hubs.iter().all(|h| (3..=4).contains(&h.capacity)));
    }

    #[test]
    fn more_hubs_than_zones_fall_back_to_any_cell() {
        let grid = GridNetworkBuilder::new(4, 4)
            .zones(ZoneLayout { zone_count: 4, ..ZoneLayout::default() })
            .hubs(16)
            .build(&mut SimRng::new(4))
            .unwrap();
        assert_eq!(grid.hub_count(), 16);
    }

    #[test]
    fn too_many_hubs_is_configuration_error() {
        let err = GridNetworkBuilder::new(2, 2)
            .zones(super::helpers::one_zone())
            .hubs(5)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, SpatialError::TooManyHubs { hubs: 5, cells: 4 }));
        assert!(err.is_configuration());
    }

    #[test]
    fn blocked_cells_reduce_hub_room() {
        let err = GridNetworkBuilder::new(2, 2)
            .zones(super::helpers::one_zone())
            .blocked([Cell::new(0, 0)])
            .hubs(4)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, SpatialError::TooManyHubs { hubs: 4, cells: 3 }));
    }

    #[test]
    fn grid_too_small_for_zones() {
        let err = GridNetworkBuilder::new(3, 3).build(&mut SimRng::new(1)).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidDimensions(_)));
    }

    #[test]
    fn empty_grid_rejected() {
        let err = GridNetworkBuilder::new(0, 5).build(&mut SimRng::new(1)).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidDimensions(_)));
    }

    #[test]
    fn hubs_avoid_blocked_cells() {
        let wall: Vec<Cell> = (0..12).map(|r| Cell::new(r, 5)).collect();
        let grid = GridNetworkBuilder::new(12, 12)
            .blocked(wall)
            .hubs(20)
            .build(&mut SimRng::new(8))
            .unwrap();
        assert!(grid.hubs.iter().all(|h| h.cell.col != 5));
        assert_eq!(grid.open_cell_count(), 144 - 12);
    }

    #[test]
    fn fixed_hubs_come_first() {
        let grid = GridNetworkBuilder::new(12, 12)
            .fixed_hub(Cell::new(0, 0), 7)
            .hubs(2)
            .build(&mut SimRng::new(1))
            .unwrap();
        assert_eq!(grid.hub_count(), 3);
        assert_eq!(grid.hubs[0].cell, Cell::new(0, 0));
        assert_eq!(grid.hubs[0].capacity, 7);
        assert_ne!(grid.hubs[1].cell, Cell::new(0, 0));
    }

    #[test]
    fn fixed_hub_collision() {
        let err = GridNetworkBuilder::new(12, 12)
            .fixed_hub(Cell::new(1, 1), 5)
            .fixed_hub(Cell::new(1, 1), 5)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, SpatialError::HubCollision(_)));
    }

    #[test]
    fn bad_fixed_cells_are_configuration_errors() {
        let off_grid = GridNetworkBuilder::new(12, 12)
            .fixed_hub(Cell::new(20, 1), 5)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        let on_wall = GridNetworkBuilder::new(12, 12)
            .blocked([Cell::new(2, 2)])
            .fixed_hub(Cell::new(2, 2), 5)
            .build(&mut SimRng::new(1))
            .unwrap_err();
        let wall_off_grid = GridNetworkBuilder::new(12, 12)
            .blocked([Cell::new(0, 12)])
            .build(&mut SimRng::new(1))
            .unwrap_err();
        for err in [off_grid, on_wall, wall_off_grid] {
            assert!(matches!(err, SpatialError::InvalidPlacement { .. }), "{err}");
            assert!(err.is_configuration(), "{err}");
        }

        // The same cells reached through the router stay engine errors.
        use crate::{BfsRouter, Router};
        let grid = GridNetworkBuilder::new(12, 12).build(&mut SimRng::new(1)).unwrap();
        let err = BfsRouter.shortest_path(&grid, Cell::new(0, 0), Cell::new(20, 1)).unwrap_err();
        assert!(!err.is_configuration());
    }

    #[test]
    fn same_seed_same_grid() {
        let a = default_grid(42, 5);
        let b = default_grid(42, 5);
        assert_eq!(a.hubs, b.hubs);
        assert_eq!(a.zones, b.zones);
    }

    #[test]
    fn scenario_sizing() {
        let b = GridNetworkBuilder::for_scenario(&GridSizing::default(), 10, 2);
        let grid = b.build(&mut SimRng::new(1)).unwrap();
        assert_eq!((grid.rows, grid.cols), (12, 12));
        assert_eq!(grid.hub_count(), 2);
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let grid = super::helpers::open_grid(3, 3);
        let n: Vec<Cell> = grid.neighbors(Cell::new(1, 1)).collect();
        assert_eq!(
            n,
            vec![Cell::new(0, 1), Cell::new(2, 1), Cell::new(1, 0), Cell::new(1, 2)]
        );
        let corner: Vec<Cell> = grid.neighbors(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use evl_core::{Cell, SimRng};

    use crate::{BfsRouter, GridNetworkBuilder, Router, SpatialError};

    #[test]
    fn same_cell_is_trivial() {
        let grid = super::helpers::open_grid(4, 4);
        let r = BfsRouter.shortest_path(&grid, Cell::new(2, 2), Cell::new(2, 2)).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.hops(), 0);
        assert_eq!(r.cells, vec![Cell::new(2, 2)]);
    }

    #[test]
    fn ties_resolve_upward_first() {
        let grid = super::helpers::open_grid(3, 3);
        let r = BfsRouter.shortest_path(&grid, Cell::new(1, 1), Cell::new(0, 0)).unwrap();
        assert_eq!(r.cells, vec![Cell::new(1, 1), Cell::new(0, 1), Cell::new(0, 0)]);
    }

    #[test]
    fn repeated_queries_identical() {
        let grid = super::helpers::open_grid(9, 9);
        let a = BfsRouter.shortest_path(&grid, Cell::new(8, 0), Cell::new(0, 8)).unwrap();
        let b = BfsRouter.shortest_path(&grid, Cell::new(8, 0), Cell::new(0, 8)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hops(), 16);
    }

    #[test]
    fn detours_around_obstacle() {
        // Wall across column 1 except the bottom row.
        let grid = GridNetworkBuilder::new(3, 3)
            .zones(super::helpers::one_zone())
            .blocked([Cell::new(0, 1), Cell::new(1, 1)])
            .build(&mut SimRng::new(1))
            .unwrap();
        let r = BfsRouter.shortest_path(&grid, Cell::new(0, 0), Cell::new(0, 2)).unwrap();
        assert_eq!(r.hops(), 6);
        assert!(r.cells.contains(&Cell::new(2, 1)));
        assert_eq!(BfsRouter.hop_count(&grid, Cell::new(0, 0), Cell::new(0, 2)).unwrap(), 6);
    }

    #[test]
    fn wall_makes_cells_unreachable() {
        let grid = GridNetworkBuilder::new(3, 3)
            .zones(super::helpers::one_zone())
            .blocked([Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)])
            .build(&mut SimRng::new(1))
            .unwrap();
        let err = BfsRouter.shortest_path(&grid, Cell::new(0, 0), Cell::new(0, 2)).unwrap_err();
        assert!(matches!(err, SpatialError::Unreachable { .. }));
        let field = BfsRouter.hop_field(&grid, Cell::new(0, 0)).unwrap();
        assert_eq!(field.get(Cell::new(0, 2)), None);
        assert_eq!(field.reachable_count(), 3);
    }

    #[test]
    fn invalid_endpoints() {
        let grid = GridNetworkBuilder::new(3, 3)
            .zones(super::helpers::one_zone())
            .blocked([Cell::new(1, 1)])
            .build(&mut SimRng::new(1))
            .unwrap();
        let err = BfsRouter.shortest_path(&grid, Cell::new(1, 1), Cell::new(0, 0)).unwrap_err();
        assert!(matches!(err, SpatialError::Blocked(_)));
        let err = BfsRouter.shortest_path(&grid, Cell::new(0, 0), Cell::new(5, 0)).unwrap_err();
        assert!(matches!(err, SpatialError::CellOutOfBounds(_)));
    }

    #[test]
    fn hop_field_matches_manhattan_on_open_grid() {
        let grid = super::helpers::open_grid(6, 7);
        let origin = Cell::new(2, 3);
        let field = BfsRouter.hop_field(&grid, origin).unwrap();
        assert_eq!(field.get(origin), Some(0));
        assert_eq!(field.reachable_count(), 42);
        for r in 0..6 {
            for c in 0..7 {
                let cell = Cell::new(r, c);
                assert_eq!(field.get(cell), Some(origin.manhattan(cell)));
            }
        }
        assert_eq!(field.get(Cell::new(0, 7)), None);
        assert_eq!(field.get(Cell::new(6, 0)), None);
    }

    #[test]
    fn route_points_are_cell_centres() {
        let grid = super::helpers::open_grid(2, 4);
        let r = BfsRouter.shortest_path(&grid, Cell::new(0, 0), Cell::new(0, 1)).unwrap();
        let pts = r.points(grid.rows, grid.cols);
        assert_eq!(pts, vec![(0.125, 0.25), (0.375, 0.25)]);
    }
}

// ── Properties ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use evl_core::Cell;

    use crate::{BfsRouter, Router};

    proptest! {
        #[test]
        fn path_length_equals_manhattan(
            rows in 1u16..20,
            cols in 1u16..20,
            a in (0u16..20, 0u16..20),
            b in (0u16..20, 0u16..20),
        ) {
            let grid = super::helpers::open_grid(rows, cols);
            let from = Cell::new(a.0 % rows, a.1 % cols);
            let to   = Cell::new(b.0 % rows, b.1 % cols);
            let route = BfsRouter.shortest_path(&grid, from, to).unwrap();

            prop_assert_eq!(route.hops(), from.manhattan(to));
            prop_assert_eq!(route.cells.first().copied(), Some(from));
            prop_assert_eq!(route.cells.last().copied(), Some(to));
            for w in route.cells.windows(2) {
                prop_assert_eq!(w[0].manhattan(w[1]), 1);
            }
        }
    }
}
