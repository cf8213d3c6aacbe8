use geo::MultiPolygon;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Boundary {
    pub name: String,
    pub district: String,
    pub geometry: MultiPolygon<f64>,
}

/// Geographic position. GeoJSON stores coordinates as (lng, lat); this is the
/// (lat, lng) order the map widget expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub raw_name: String,
    pub display_name: String,
    pub district: String,
    pub position: LatLng,
}
