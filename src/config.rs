use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub merge_groups: Vec<MergeGroup>,
    #[serde(default)]
    pub centroid_overrides: HashMap<String, CentroidOverride>,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub geometry: PathBuf,
    pub statistics: PathBuf,
    #[serde(default = "default_name_property")]
    pub name_property: String,
    #[serde(default = "default_fallback_name_property")]
    pub fallback_name_property: String,
    #[serde(default = "default_district_property")]
    pub district_property: String,
}

/// Adjacent units shown and queried as one taluka. Statistics come from `primary`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MergeGroup {
    pub display_name: String,
    pub primary: String,
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct CentroidOverride {
    #[serde(default)]
    pub lat_delta: f64,
    #[serde(default)]
    pub lng_delta: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StyleConfig {
    pub fill_color: String,
    pub hover_fill_color: String,
    pub stroke_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub hover_fill_opacity: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub asset_dir: PathBuf,
}

fn default_name_property() -> String {
    "NAME_3".to_string()
}

fn default_fallback_name_property() -> String {
    "NAME_2".to_string()
}

fn default_district_property() -> String {
    "NAME_2".to_string()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill_color: "#cbd5e1".to_string(),
            hover_fill_color: "#2563eb".to_string(),
            stroke_color: "#334155".to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.5,
            hover_fill_opacity: 0.7,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [15.4, 74.0],
            zoom: 9,
            min_zoom: 7,
            max_zoom: 13,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            asset_dir: PathBuf::from("public"),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Config with default sections and the given input files.
    pub fn with_inputs(geometry: impl Into<PathBuf>, statistics: impl Into<PathBuf>) -> Self {
        Self {
            input: InputConfig {
                geometry: geometry.into(),
                statistics: statistics.into(),
                name_property: default_name_property(),
                fallback_name_property: default_fallback_name_property(),
                district_property: default_district_property(),
            },
            merge_groups: Vec::new(),
            centroid_overrides: HashMap::new(),
            style: StyleConfig::default(),
            view: ViewConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [input]
            geometry = "public/map/goa-talukas.geojson"
            statistics = "public/data/goa-education.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.name_property, "NAME_3");
        assert_eq!(config.input.fallback_name_property, "NAME_2");
        assert!(config.merge_groups.is_empty());
        assert_eq!(config.view.center, [15.4, 74.0]);
        assert_eq!(config.view.zoom, 9);
        assert_eq!(config.style.hover_fill_color, "#2563eb");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn merge_groups_and_overrides_parse() {
        let config = AppConfig::from_toml(
            r#"
            [input]
            geometry = "talukas.geojson"
            statistics = "stats.json"

            [[merge_groups]]
            display_name = "Mormugao"
            primary = "Mormugao"
            members = ["Mormugao", "Marmagao"]

            [centroid_overrides.Salcete]
            lat_delta = 0.02
            lng_delta = -0.01

            [server]
            port = 8080
            asset_dir = "site"
            "#,
        )
        .unwrap();

        assert_eq!(config.merge_groups.len(), 1);
        assert_eq!(config.merge_groups[0].members, vec!["Mormugao", "Marmagao"]);
        let salcete = config.centroid_overrides["Salcete"];
        assert_eq!(salcete.lat_delta, 0.02);
        assert_eq!(salcete.lng_delta, -0.01);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.asset_dir, PathBuf::from("site"));
    }

    #[test]
    fn missing_input_section_is_rejected() {
        assert!(AppConfig::from_toml("[server]\nport = 1\nasset_dir = \".\"").is_err());
    }
}
