//! Map centering for alert geometries
//!
//! Centers are a plain average of ring vertices, good enough to pan a map
//! to the affected area. GeoJSON positions are `[lon, lat]`; map centers
//! are `[lat, lon]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geographic center of the contiguous US
pub const US_CENTER: [f64; 2] = [39.8283, -98.5795];
pub const DEFAULT_ZOOM: u8 = 4;

const POINT_ZOOM: u8 = 8;
const POLYGON_ZOOM: u8 = 7;
const MULTI_POLYGON_ZOOM: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: US_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Point(Vec<f64>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Average of the valid `[lon, lat, ..]` positions of a ring
fn ring_center(ring: &[Vec<f64>]) -> Option<[f64; 2]> {
    let (sum_lat, sum_lon, n) = ring
        .iter()
        .filter(|c| c.len() >= 2)
        .fold((0.0, 0.0, 0usize), |(lat, lon, n), c| (lat + c[1], lon + c[0], n + 1));

    if n == 0 {
        None
    } else {
        Some([sum_lat / n as f64, sum_lon / n as f64])
    }
}

/// Center and zoom for an alert geometry; anything unusable falls back to
/// the whole-US view.
pub fn map_view(geometry: Option<&Value>) -> MapView {
    let Some(geometry) = geometry else {
        return MapView::default();
    };

    let parsed = match Geometry::deserialize(geometry) {
        Ok(g) => g,
        Err(e) => {
            tracing::debug!("Unsupported alert geometry: {}", e);
            return MapView::default();
        }
    };

    let view = match parsed {
        Geometry::Point(c) if c.len() == 2 => Some(MapView {
            center: [c[1], c[0]],
            zoom: POINT_ZOOM,
        }),
        Geometry::Point(_) => None,
        Geometry::Polygon(rings) => rings.first().and_then(|r| ring_center(r)).map(|center| MapView {
            center,
            zoom: POLYGON_ZOOM,
        }),
        Geometry::MultiPolygon(polygons) => polygons
            .first()
            .and_then(|p| p.first())
            .and_then(|r| ring_center(r))
            .map(|center| MapView {
                center,
                zoom: MULTI_POLYGON_ZOOM,
            }),
    };

    view.unwrap_or_default()
}
