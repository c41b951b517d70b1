//! Presentation data: the artificial grid map and geographic layers.
//!
//! Grid coordinates are normalized into `[0, 1]²` (cell centres at
//! `x = (col + 0.5) / cols`, `y = (row + 0.5) / rows`).  Geographic layers
//! project that space into the configured [`MapBounds`].

use geojson::Value::Polygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use evl_core::{Cell, MapBounds, ZoneId};
use evl_demand::Fleet;
use evl_metrics::{HubUsage, ZonePollution};
use evl_optimize::Outcome;
use evl_spatial::{GridNetwork, Router};

use crate::PlatformResult;

// ── Artificial map ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    fn of(cell: Cell, rows: u16, cols: u16) -> Self {
        let (x, y) = cell.normalized(rows, cols);
        Self { x, y }
    }
}

/// A member cell of a zone: grid row `i`, column `j`, and its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCell {
    pub i:       u16,
    pub j:       u16,
    pub x:       f64,
    pub y:       f64,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCells {
    pub zone_id: u16,
    pub cells:   Vec<ZoneCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneMeta {
    pub zone_id:   u16,
    pub pollution: f64,
    pub is_green:  bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubMarker {
    pub hub_id: u32,
    pub row:    u16,
    pub col:    u16,
    pub x:      f64,
    pub y:      f64,
}

/// Rendered route of one assigned truck, origin first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLine {
    pub truck_id: u32,
    pub hub_id:   u32,
    pub points:   Vec<MapPoint>,
}

/// Everything needed to draw the synthetic grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtificialMap {
    pub rows:       u16,
    pub cols:       u16,
    pub zone_cells: Vec<ZoneCells>,
    pub zone_meta:  Vec<ZoneMeta>,
    pub hubs:       Vec<HubMarker>,
    pub routes:     Vec<RouteLine>,
}

impl ArtificialMap {
    /// Build the map, routing every assignment with `router`.
    ///
    /// Routes are derived from the final assignments; a route the router
    /// cannot find means the hop table and the grid disagree, which is an
    /// internal consistency error.
    pub fn build(
        grid: &GridNetwork,
        fleet: &Fleet,
        outcome: &Outcome,
        pollution: &[ZonePollution],
        router: &dyn Router,
    ) -> PlatformResult<Self> {
        let (rows, cols) = (grid.rows, grid.cols);

        let zone_cells = grid
            .zones
            .iter()
            .map(|z| ZoneCells {
                zone_id: z.id.0,
                cells:   z
                    .cells
                    .iter()
                    .map(|&c| {
                        let p = MapPoint::of(c, rows, cols);
                        ZoneCell { i: c.row, j: c.col, x: p.x, y: p.y, blocked: !grid.is_open(c) }
                    })
                    .collect(),
            })
            .collect();

        let zone_meta = pollution
            .iter()
            .map(|p| ZoneMeta { zone_id: p.zone_id, pollution: p.pollution_level, is_green: p.is_green })
            .collect();

        let hubs = grid
            .hubs
            .iter()
            .map(|h| {
                let p = MapPoint::of(h.cell, rows, cols);
                HubMarker { hub_id: h.id.0, row: h.cell.row, col: h.cell.col, x: p.x, y: p.y }
            })
            .collect();

        let mut routes = Vec::with_capacity(outcome.assignments.len());
        for a in &outcome.assignments {
            let origin = fleet.origin[a.truck.index()];
            let route = router.shortest_path(grid, origin, grid.hub(a.hub).cell)?;
            routes.push(RouteLine {
                truck_id: a.truck.0,
                hub_id:   a.hub.0,
                points:   route.points(rows, cols).into_iter().map(|(x, y)| MapPoint { x, y }).collect(),
            });
        }

        Ok(Self { rows, cols, zone_cells, zone_meta, hubs, routes })
    }
}

// ── Geographic layers ────────────────────────────────────────────────────────

/// A hub's projected position and its day total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubPosition {
    pub hub_id:   u32,
    pub zone_id:  u16,
    pub lon:      f64,
    pub lat:      f64,
    pub capacity: u32,
    pub usage:    u32,
}

/// Projected hub positions, in hub order.
pub fn hub_positions(grid: &GridNetwork, usage: &[HubUsage], bounds: &MapBounds) -> Vec<HubPosition> {
    grid.hubs
        .iter()
        .map(|h| {
            let (x, y) = h.cell.normalized(grid.rows, grid.cols);
            let at = bounds.project(x, y);
            let used = usage.iter().find(|u| u.hub_id == h.id.0).map_or(0, |u| u.assigned);
            HubPosition {
                hub_id:   h.id.0,
                zone_id:  h.zone.0,
                lon:      at.lon,
                lat:      at.lat,
                capacity: h.capacity,
                usage:    used,
            }
        })
        .collect()
}

/// One polygon feature per zone: the bounding box of the zone's cells.
///
/// Properties: `zone_id`, `pollution`, `congestion` (incoming trucks) and
/// `is_green`.
pub fn zones_geojson(grid: &GridNetwork, pollution: &[ZonePollution], bounds: &MapBounds) -> FeatureCollection {
    let features = pollution
        .iter()
        .filter_map(|p| {
            let ring = zone_ring(grid, ZoneId(p.zone_id), bounds)?;
            let mut properties = JsonObject::new();
            properties.insert("zone_id".into(), JsonValue::from(p.zone_id));
            properties.insert("pollution".into(), JsonValue::from(p.pollution_level));
            properties.insert("congestion".into(), JsonValue::from(p.truck_count));
            properties.insert("is_green".into(), JsonValue::from(p.is_green));
            Some(Feature {
                geometry: Some(Geometry::new(Polygon(vec![ring]))),
                properties: Some(properties),
                ..Default::default()
            })
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// Closed exterior ring around a zone's cells, or `None` for an empty zone.
fn zone_ring(grid: &GridNetwork, zone: ZoneId, bounds: &MapBounds) -> Option<Vec<Vec<f64>>> {
    let cells = &grid.zones.get(zone.index())?.cells;
    let min_row = cells.iter().map(|c| c.row).min()?;
    let max_row = cells.iter().map(|c| c.row).max()?;
    let min_col = cells.iter().map(|c| c.col).min()?;
    let max_col = cells.iter().map(|c| c.col).max()?;

    let x0 = min_col as f64 / grid.cols as f64;
    let x1 = (max_col + 1) as f64 / grid.cols as f64;
    let y0 = min_row as f64 / grid.rows as f64;
    let y1 = (max_row + 1) as f64 / grid.rows as f64;

    // y grows southward, so this walks the box counter-clockwise on the map.
    let corners = [(x0, y1), (x1, y1), (x1, y0), (x0, y0), (x0, y1)];
    Some(corners.iter().map(|&(x, y)| bounds.project(x, y).position()).collect())
}
