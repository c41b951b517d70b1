//! Geographic coordinates for presentation data.
//!
//! The synthetic grid has no real geography.  For map layers the normalized
//! `[0, 1]²` grid space is projected linearly into a fixed bounding box so
//! the same zone layout always lands on the same coordinates.

/// A WGS-84 coordinate.  `f64` because it feeds GeoJSON directly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `[lon, lat]` position, the GeoJSON axis order.
    #[inline]
    pub fn position(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Bounding box the normalized grid is projected into.
///
/// `y = 0` (the top grid row) maps to `north`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapBounds {
    pub west:  f64,
    pub south: f64,
    pub east:  f64,
    pub north: f64,
}

impl MapBounds {
    /// Project a normalized `(x, y)` point into the box.
    #[inline]
    pub fn project(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            self.west + x * (self.east - self.west),
            self.north - y * (self.north - self.south),
        )
    }
}

impl Default for MapBounds {
    /// Hunts Point, Bronx.
    fn default() -> Self {
        Self { west: -73.89, south: 40.81, east: -73.87, north: 40.83 }
    }
}
