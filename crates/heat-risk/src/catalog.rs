//! Probe Point Catalog
//!
//! Fixed sample locations used to estimate heat risk across the US.
//! The built-in set covers 53 major metro areas, Honolulu and Anchorage
//! included; a JSON file can replace it at startup.

use crate::{HeatRiskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// A named sample location. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbePoint {
    pub name: String,
    /// Two-letter postal code
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ProbePoint {
    pub fn new(name: &str, state: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            state: state.to_string(),
            latitude,
            longitude,
        }
    }
}

fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Built-in nationwide catalog
pub fn major_cities() -> Vec<ProbePoint> {
    let cities = [
        ("New York, NY", "NY", 40.7128, -74.0060),
        ("Los Angeles, CA", "CA", 34.0522, -118.2437),
        ("Chicago, IL", "IL", 41.8781, -87.6298),
        ("Houston, TX", "TX", 29.7604, -95.3698),
        ("Phoenix, AZ", "AZ", 33.4484, -112.0740),
        ("Philadelphia, PA", "PA", 39.9526, -75.1652),
        ("San Antonio, TX", "TX", 29.4241, -98.4936),
        ("San Diego, CA", "CA", 32.7157, -117.1611),
        ("Dallas, TX", "TX", 32.7767, -96.7970),
        ("San Jose, CA", "CA", 37.3382, -121.8863),
        ("Austin, TX", "TX", 30.2672, -97.7431),
        ("Jacksonville, FL", "FL", 30.3322, -81.6557),
        ("Fort Worth, TX", "TX", 32.7555, -97.3308),
        ("Columbus, OH", "OH", 39.9612, -82.9988),
        ("Charlotte, NC", "NC", 35.2271, -80.8431),
        ("San Francisco, CA", "CA", 37.7749, -122.4194),
        ("Indianapolis, IN", "IN", 39.7684, -86.1581),
        ("Seattle, WA", "WA", 47.6062, -122.3321),
        ("Denver, CO", "CO", 39.7392, -104.9903),
        ("Washington, DC", "DC", 38.9072, -77.0369),
        ("Boston, MA", "MA", 42.3601, -71.0589),
        ("El Paso, TX", "TX", 31.7619, -106.4850),
        ("Nashville, TN", "TN", 36.1627, -86.7816),
        ("Detroit, MI", "MI", 42.3314, -83.0458),
        ("Oklahoma City, OK", "OK", 35.4676, -97.5164),
        ("Portland, OR", "OR", 45.5051, -122.6750),
        ("Las Vegas, NV", "NV", 36.1699, -115.1398),
        ("Memphis, TN", "TN", 35.1495, -90.0490),
        ("Louisville, KY", "KY", 38.2527, -85.7585),
        ("Baltimore, MD", "MD", 39.2904, -76.6122),
        ("Milwaukee, WI", "WI", 43.0389, -87.9065),
        ("Albuquerque, NM", "NM", 35.0844, -106.6504),
        ("Tucson, AZ", "AZ", 32.2226, -110.9747),
        ("Fresno, CA", "CA", 36.7378, -119.7871),
        ("Mesa, AZ", "AZ", 33.4152, -111.8315),
        ("Sacramento, CA", "CA", 38.5816, -121.4944),
        ("Atlanta, GA", "GA", 33.7490, -84.3880),
        ("Kansas City, MO", "MO", 39.0997, -94.5786),
        ("Colorado Springs, CO", "CO", 38.8339, -104.8214),
        ("Omaha, NE", "NE", 41.2565, -95.9345),
        ("Raleigh, NC", "NC", 35.7796, -78.6382),
        ("Miami, FL", "FL", 25.7617, -80.1918),
        ("Minneapolis, MN", "MN", 44.9778, -93.2650),
        ("Tulsa, OK", "OK", 36.1539, -95.9928),
        ("Wichita, KS", "KS", 37.6872, -97.3301),
        ("New Orleans, LA", "LA", 29.9511, -90.0715),
        ("Arlington, TX", "TX", 32.7357, -97.1081),
        ("Cleveland, OH", "OH", 41.4993, -81.6944),
        ("Bakersfield, CA", "CA", 35.3733, -119.0187),
        ("Tampa, FL", "FL", 27.9506, -82.4572),
        ("Aurora, CO", "CO", 39.7294, -104.8319),
        ("Honolulu, HI", "HI", 21.3069, -157.8583),
        ("Anchorage, AK", "AK", 61.2181, -149.9003),
    ];

    cities
        .iter()
        .map(|(name, state, lat, lon)| ProbePoint::new(name, state, *lat, *lon))
        .collect()
}

/// Load a catalog from a JSON array of probe points.
///
/// Points with out-of-range coordinates are skipped; an empty result is an
/// error since the service would have nothing to sample.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<ProbePoint>> {
    let path = path.as_ref();
    info!("Loading probe catalog from {:?}", path);

    let file = File::open(path)?;
    let raw: Vec<ProbePoint> = serde_json::from_reader(BufReader::new(file))?;

    let mut skipped = 0;
    let points: Vec<ProbePoint> = raw
        .into_iter()
        .filter(|p| {
            let ok = is_valid_latitude(p.latitude) && is_valid_longitude(p.longitude);
            if !ok {
                warn!("Skipping probe point {} with invalid coordinates", p.name);
                skipped += 1;
            }
            ok
        })
        .collect();

    let points = dedupe_by_name(points);
    if points.is_empty() {
        return Err(HeatRiskError::EmptyCatalog(path.display().to_string()));
    }

    info!("Loaded {} probe points ({} skipped)", points.len(), skipped);
    Ok(points)
}

/// Keep the first point for each name
pub fn dedupe_by_name(points: Vec<ProbePoint>) -> Vec<ProbePoint> {
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.name.clone());
            if !fresh {
                warn!("Duplicate probe point {} ignored", p.name);
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_major_cities() {
        let cities = major_cities();
        assert_eq!(cities.len(), 53);

        let names: HashSet<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), cities.len(), "names must be unique");

        assert!(cities
            .iter()
            .all(|c| is_valid_latitude(c.latitude) && is_valid_longitude(c.longitude)));
        assert!(cities.iter().all(|c| c.state.len() == 2));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let points = vec![
            ProbePoint::new("Reno, NV", "NV", 39.5296, -119.8138),
            ProbePoint::new("Reno, NV", "NV", 0.0, 0.0),
            ProbePoint::new("Boise, ID", "ID", 43.6150, -116.2023),
        ];
        let deduped = dedupe_by_name(points);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].latitude, 39.5296);
    }

    #[test]
    fn test_load_catalog_skips_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "Reno, NV", "state": "NV", "latitude": 39.5296, "longitude": -119.8138}},
                {{"name": "Nowhere", "state": "XX", "latitude": 123.0, "longitude": 0.0}}
            ]"#
        )
        .unwrap();

        let points = load_catalog(file.path()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Reno, NV");
    }

    #[test]
    fn test_load_catalog_empty_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        assert!(matches!(
            load_catalog(file.path()),
            Err(HeatRiskError::EmptyCatalog(_))
        ));
    }
}
