//! Map zones built from classified points

use crate::aggregator::ClassifiedPoint;
use serde::Serialize;

/// Half-width of a zone square in degrees
pub const ZONE_HALF_WIDTH_DEG: f64 = 0.55;

/// Square overlay centred on a probe point
#[derive(Debug, Clone, Serialize)]
pub struct HeatZone {
    pub id: String,
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
    pub level: u8,
    pub region: String,
    pub color: &'static str,
    pub opacity: f64,
    pub description: &'static str,
}

impl HeatZone {
    pub fn from_point(index: usize, point: &ClassifiedPoint) -> Self {
        let info = point.value.info();
        Self {
            id: format!("zone-{}", index),
            bounds: [
                [point.latitude - ZONE_HALF_WIDTH_DEG, point.longitude - ZONE_HALF_WIDTH_DEG],
                [point.latitude + ZONE_HALF_WIDTH_DEG, point.longitude + ZONE_HALF_WIDTH_DEG],
            ],
            level: info.level,
            region: if point.region.is_empty() {
                "Unknown".to_string()
            } else {
                point.region.clone()
            },
            color: info.color,
            opacity: info.opacity,
            description: info.description,
        }
    }
}

pub fn zones_from_points(points: &[ClassifiedPoint]) -> Vec<HeatZone> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| HeatZone::from_point(i, p))
        .collect()
}
