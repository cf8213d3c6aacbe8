use crate::config::InputConfig;
use crate::stats::StatisticsTable;
use crate::types::Boundary;
use geo::MultiPolygon;
use geojson::{Feature, GeoJson};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

const UNNAMED_TALUKA: &str = "Taluka";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("failed to parse statistics JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON must be a FeatureCollection")]
    NotFeatureCollection,
}

/// Both datasets after loading. A source that failed is empty.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub boundaries: Vec<Boundary>,
    pub statistics: StatisticsTable,
}

/// Issues both loads at once. Each failure is logged and leaves its dataset
/// empty; nothing is retried.
pub async fn load_sources(input: &InputConfig) -> LoadedData {
    let (boundaries, statistics) = tokio::join!(load_boundaries(input), load_statistics(&input.statistics));

    let boundaries = boundaries.unwrap_or_else(|e| {
        error!(path = ?input.geometry, error = %e, "failed to load geometry");
        Vec::new()
    });
    let statistics = statistics.unwrap_or_else(|e| {
        error!(path = ?input.statistics, error = %e, "failed to load statistics");
        StatisticsTable::new()
    });

    info!(
        boundaries = boundaries.len(),
        statistics = statistics.len(),
        "data sources loaded"
    );
    LoadedData { boundaries, statistics }
}

pub async fn load_boundaries(input: &InputConfig) -> Result<Vec<Boundary>, SourceError> {
    let content = read(&input.geometry).await?;
    parse_boundaries(&content, input)
}

pub async fn load_statistics(path: &Path) -> Result<StatisticsTable, SourceError> {
    let content = read(path).await?;
    parse_statistics(&content)
}

async fn read(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub fn parse_statistics(content: &str) -> Result<StatisticsTable, SourceError> {
    Ok(serde_json::from_str(content)?)
}

pub fn parse_boundaries(content: &str, input: &InputConfig) -> Result<Vec<Boundary>, SourceError> {
    let collection = match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(SourceError::NotFeatureCollection),
    };

    let boundaries: Vec<Boundary> = collection
        .features
        .into_iter()
        .filter_map(|feature| to_boundary(feature, input))
        .collect();

    debug!(count = boundaries.len(), "parsed boundaries");
    Ok(boundaries)
}

fn to_boundary(feature: Feature, input: &InputConfig) -> Option<Boundary> {
    let name = feature_name(&feature, input);
    let district = property_str(&feature, &input.district_property)
        .unwrap_or_default()
        .to_string();

    let geometry = match feature.geometry {
        Some(geom) => match geo::Geometry::<f64>::try_from(geom.value) {
            Ok(geo::Geometry::MultiPolygon(mp)) => mp,
            Ok(geo::Geometry::Polygon(p)) => MultiPolygon::new(vec![p]),
            Ok(_) => {
                warn!(taluka = %name, "skipping non-polygon feature");
                return None;
            }
            Err(e) => {
                warn!(taluka = %name, error = %e, "skipping feature with invalid geometry");
                return None;
            }
        },
        None => {
            warn!(taluka = %name, "skipping feature without geometry");
            return None;
        }
    };

    Some(Boundary {
        name,
        district,
        geometry,
    })
}

fn feature_name(feature: &Feature, input: &InputConfig) -> String {
    property_str(feature, &input.name_property)
        .or_else(|| property_str(feature, &input.fallback_name_property))
        .unwrap_or(UNNAMED_TALUKA)
        .to_string()
}

fn property_str<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use serde_json::json;

    fn input() -> InputConfig {
        AppConfig::with_inputs("talukas.geojson", "stats.json").input
    }

    fn collection(features: serde_json::Value) -> String {
        json!({ "type": "FeatureCollection", "features": features }).to_string()
    }

    fn square_feature(props: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": props,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[73.7, 15.6], [73.9, 15.6], [73.9, 15.8], [73.7, 15.8], [73.7, 15.6]]]
            }
        })
    }

    #[test]
    fn reads_name_and_district() {
        let content = collection(json!([square_feature(json!({ "NAME_3": " Pernem ", "NAME_2": "North Goa" }))]));
        let boundaries = parse_boundaries(&content, &input()).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Pernem");
        assert_eq!(boundaries[0].district, "North Goa");
        assert_eq!(boundaries[0].geometry.0.len(), 1);
    }

    #[test]
    fn name_falls_back_to_district_then_literal() {
        let content = collection(json!([
            square_feature(json!({ "NAME_2": "South Goa" })),
            square_feature(json!({})),
        ]));
        let boundaries = parse_boundaries(&content, &input()).unwrap();
        assert_eq!(boundaries[0].name, "South Goa");
        assert_eq!(boundaries[1].name, "Taluka");
        assert_eq!(boundaries[1].district, "");
    }

    #[test]
    fn non_polygon_and_missing_geometry_are_skipped() {
        let content = collection(json!([
            { "type": "Feature", "properties": { "NAME_3": "Point" },
              "geometry": { "type": "Point", "coordinates": [74.0, 15.4] } },
            { "type": "Feature", "properties": { "NAME_3": "Nothing" }, "geometry": null },
            square_feature(json!({ "NAME_3": "Bardez" })),
        ]));
        let boundaries = parse_boundaries(&content, &input()).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Bardez");
    }

    #[test]
    fn bare_geometry_is_rejected() {
        let content = json!({ "type": "Point", "coordinates": [74.0, 15.4] }).to_string();
        assert!(matches!(
            parse_boundaries(&content, &input()),
            Err(SourceError::NotFeatureCollection)
        ));
    }

    #[test]
    fn statistics_table_parses() {
        let table = parse_statistics(r#"{ "Pernem": { "literacy_rate": 89.5 } }"#).unwrap();
        assert_eq!(table["Pernem"].literacy_rate.value(), Some(89.5));
        assert!(parse_statistics("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn missing_files_leave_sources_empty() {
        let input = AppConfig::with_inputs("/nonexistent/a.geojson", "/nonexistent/b.json").input;
        let loaded = load_sources(&input).await;
        assert!(loaded.boundaries.is_empty());
        assert!(loaded.statistics.is_empty());
    }
}
