use crate::centroid::CentroidEstimator;
use crate::config::{AppConfig, StyleConfig, ViewConfig};
use crate::data::LoadedData;
use crate::hover::{HoverController, HoverHandler};
use crate::resolver::{ConfigError, NameResolver};
use crate::stats::{self, StatisticsRecord, StatisticsTable};
use crate::types::{Boundary, LatLng, Marker};
use serde::Serialize;

/// Style values the map widget applies per feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub district: String,
    pub statistics: StatisticsRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSettings {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub ready: bool,
}

/// One map view: loaded datasets, precomputed markers, hover and zoom state.
pub struct MapSession {
    boundaries: Vec<Boundary>,
    statistics: StatisticsTable,
    markers: Vec<Marker>,
    hover: HoverController,
    style: StyleConfig,
    view: ViewConfig,
    zoom: u8,
}

impl MapSession {
    pub fn new(config: &AppConfig, data: LoadedData) -> Result<Self, ConfigError> {
        let (min_zoom, max_zoom) = (config.view.min_zoom, config.view.max_zoom);
        if min_zoom > max_zoom {
            return Err(ConfigError::InvalidZoomRange {
                min: min_zoom,
                max: max_zoom,
            });
        }
        let resolver = NameResolver::new(config.merge_groups.clone())?;
        let estimator = CentroidEstimator::new(config.centroid_overrides.clone());
        let markers = estimator.markers(&data.boundaries, &resolver);
        let zoom = config.view.zoom.clamp(min_zoom, max_zoom);

        Ok(Self {
            boundaries: data.boundaries,
            statistics: data.statistics,
            markers,
            hover: HoverController::new(resolver),
            style: config.style.clone(),
            view: config.view.clone(),
            zoom,
        })
    }

    /// False until geometry is available; the client keeps its loading placeholder.
    pub fn is_ready(&self) -> bool {
        !self.boundaries.is_empty()
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn resolver(&self) -> &NameResolver {
        self.hover.resolver()
    }

    pub fn hover(&self) -> &HoverController {
        &self.hover
    }

    pub fn style_for(&self, raw_name: &str) -> FeatureStyle {
        style_for(&self.style, self.hover.highlighted(raw_name))
    }

    pub fn lookup(&self, name: &str) -> StatisticsRecord {
        stats::lookup(&self.statistics, self.resolver(), name)
    }

    /// Tooltip for an arbitrary name, independent of the hover state.
    pub fn describe(&self, raw_name: &str) -> Tooltip {
        let resolver = self.resolver();
        let canonical = resolver.canonical_name(raw_name);
        let district = self
            .boundaries
            .iter()
            .find(|b| b.name == raw_name || resolver.canonical_name(&b.name) == canonical)
            .map(|b| b.district.clone())
            .unwrap_or_default();

        Tooltip {
            name: canonical.to_string(),
            district,
            statistics: self.lookup(raw_name),
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.hover.active().map(|name| self.describe(name))
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> u8 {
        self.zoom = self.zoom.saturating_add(1).min(self.view.max_zoom);
        self.zoom
    }

    pub fn zoom_out(&mut self) -> u8 {
        self.zoom = self.zoom.saturating_sub(1).max(self.view.min_zoom);
        self.zoom
    }

    pub fn settings(&self) -> ViewSettings {
        view_settings(&self.view, self.zoom, self.is_ready())
    }
}

impl HoverHandler for MapSession {
    fn on_enter(&mut self, raw_name: &str) {
        self.hover.on_enter(raw_name);
    }

    fn on_leave(&mut self) {
        self.hover.on_leave();
    }
}

pub fn style_for(style: &StyleConfig, highlighted: bool) -> FeatureStyle {
    let (fill_color, fill_opacity) = if highlighted {
        (&style.hover_fill_color, style.hover_fill_opacity)
    } else {
        (&style.fill_color, style.fill_opacity)
    };
    FeatureStyle {
        fill_color: fill_color.clone(),
        weight: style.weight,
        opacity: style.opacity,
        color: style.stroke_color.clone(),
        fill_opacity,
    }
}

pub fn view_settings(view: &ViewConfig, zoom: u8, ready: bool) -> ViewSettings {
    ViewSettings {
        center: LatLng::new(view.center[0], view.center[1]),
        zoom,
        min_zoom: view.min_zoom,
        max_zoom: view.max_zoom,
        ready,
    }
}
