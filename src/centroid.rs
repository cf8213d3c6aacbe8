use crate::config::CentroidOverride;
use crate::resolver::NameResolver;
use crate::types::{Boundary, LatLng, Marker};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::{LineString, MultiPolygon};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Label/pin placement for taluka polygons.
///
/// Uses the midpoint of a ring's bounding box rather than an area-weighted
/// centroid, then applies any manual per-taluka offset.
#[derive(Debug, Clone, Default)]
pub struct CentroidEstimator {
    overrides: HashMap<String, CentroidOverride>,
}

impl CentroidEstimator {
    pub fn new(overrides: HashMap<String, CentroidOverride>) -> Self {
        Self { overrides }
    }

    /// Bounding-box midpoint of `rings[ring_index]`. Coordinates are (lng, lat).
    pub fn centroid(rings: &[LineString<f64>], ring_index: usize) -> Option<LatLng> {
        let rect = rings.get(ring_index)?.bounding_rect()?;
        let (min, max) = (rect.min(), rect.max());
        Some(LatLng::new((min.y + max.y) / 2.0, (min.x + max.x) / 2.0))
    }

    /// Only the exterior ring of the first polygon counts; holes and further
    /// polygons are ignored.
    pub fn centroid_of(geometry: &MultiPolygon<f64>) -> Option<LatLng> {
        let first = geometry.0.first()?;
        Self::centroid(std::slice::from_ref(first.exterior()), 0)
    }

    pub fn apply_override(&self, name: &str, centroid: LatLng) -> LatLng {
        match self.overrides.get(name) {
            Some(delta) => LatLng::new(centroid.lat + delta.lat_delta, centroid.lng + delta.lng_delta),
            None => centroid,
        }
    }

    pub fn markers(&self, boundaries: &[Boundary], resolver: &NameResolver) -> Vec<Marker> {
        boundaries
            .par_iter()
            .filter_map(|boundary| {
                let Some(centroid) = Self::centroid_of(&boundary.geometry) else {
                    debug!(taluka = %boundary.name, "no usable ring, skipping marker");
                    return None;
                };
                let display_name = resolver.canonical_name(&boundary.name);
                let key = if self.overrides.contains_key(display_name) {
                    display_name
                } else {
                    boundary.name.as_str()
                };
                Some(Marker {
                    raw_name: boundary.name.clone(),
                    display_name: display_name.to_string(),
                    district: boundary.district.clone(),
                    position: self.apply_override(key, centroid),
                })
            })
            .collect()
    }
}
