//! Map layer orchestration
//!
//! The map renderer itself is external; [`MapSurface`] is the capability the
//! controller needs from it. [`MapScene`] is a surface that records the
//! resulting state as JSON, which is what the `map` command prints.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::geolocation::Position;
use crate::models::{CentreFeatureCollection, Identifier, WardFeatureCollection};

pub const WARDS_SOURCE: &str = "wards";
pub const WARDS_FILL_LAYER: &str = "wards-fill";
pub const WARDS_OUTLINE_LAYER: &str = "wards-outline";
pub const CENTRES_SOURCE: &str = "centres";
pub const CENTRES_LAYER: &str = "centres-circle";

/// Initial view over downtown Toronto, `[lng, lat]`
pub const TORONTO_CENTER: [f64; 2] = [-79.3832, 43.6532];
pub const DEFAULT_ZOOM: f64 = 11.0;
pub const USER_LOCATION_ZOOM: f64 = 13.0;
const USER_MARKER_COLOR: &str = "#10b981";

/// `(total_programs, radius_px)` stops for centre markers
const RADIUS_STOPS: [(f64, f64); 4] = [(0.0, 8.0), (10.0, 12.0), (50.0, 16.0), (100.0, 20.0)];

/// Marker radius for a centre, linear between stops and clamped outside them
#[must_use]
pub fn marker_radius(total_programs: f64) -> f64 {
    let (first_x, first_y) = RADIUS_STOPS[0];
    if total_programs.is_nan() || total_programs <= first_x {
        return first_y;
    }
    for pair in RADIUS_STOPS.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if total_programs <= x1 {
            return y0 + (total_programs - x0) * (y1 - y0) / (x1 - x0);
        }
    }
    RADIUS_STOPS[RADIUS_STOPS.len() - 1].1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
}

/// Layer definition handed to the surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: &'static str,
    pub paint: Value,
}

impl LayerSpec {
    fn wards_fill() -> Self {
        Self {
            id: WARDS_FILL_LAYER,
            kind: LayerKind::Fill,
            source: WARDS_SOURCE,
            paint: json!({ "fill-color": "#94a3b8", "fill-opacity": 0.15 }),
        }
    }

    fn wards_outline() -> Self {
        Self {
            id: WARDS_OUTLINE_LAYER,
            kind: LayerKind::Line,
            source: WARDS_SOURCE,
            paint: json!({ "line-color": "#1e293b", "line-width": 2.5, "line-opacity": 0.9 }),
        }
    }

    fn centres() -> Self {
        let mut interpolate = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["get", "total_programs"]),
        ];
        for (programs, radius) in RADIUS_STOPS {
            interpolate.push(json!(programs));
            interpolate.push(json!(radius));
        }
        Self {
            id: CENTRES_LAYER,
            kind: LayerKind::Circle,
            source: CENTRES_SOURCE,
            paint: json!({
                "circle-radius": interpolate,
                "circle-color": "#3b82f6",
                "circle-opacity": 0.8,
                "circle-stroke-width": 2,
                "circle-stroke-color": "#ffffff",
            }),
        }
    }
}

/// Axis-aligned lng/lat rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// Smallest rectangle around `[lng, lat]` points; `None` for no points
    pub fn around<I: IntoIterator<Item = [f64; 2]>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, [lng, lat]| {
            Some(match acc {
                None => Bounds {
                    west: lng,
                    south: lat,
                    east: lng,
                    north: lat,
                },
                Some(b) => Bounds {
                    west: b.west.min(lng),
                    south: b.south.min(lat),
                    east: b.east.max(lng),
                    north: b.north.max(lat),
                },
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitOptions {
    pub padding: u32,
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: 100,
            max_zoom: 13.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerHandle(pub u64);

/// What the controller needs from a map renderer
pub trait MapSurface {
    fn has_source(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, data: Value);
    fn set_source_data(&mut self, id: &str, data: Value);
    fn add_layer(&mut self, layer: LayerSpec);
    fn set_layer_visibility(&mut self, layer_id: &str, visible: bool);
    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions);
    fn add_marker(&mut self, lng_lat: [f64; 2], color: &str) -> MarkerHandle;
    fn remove_marker(&mut self, marker: MarkerHandle);
    fn fly_to(&mut self, center: [f64; 2], zoom: f64);
}

/// Legend toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerVisibility {
    pub centres: bool,
    pub wards: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            centres: true,
            wards: true,
        }
    }
}

/// Applies ward, centre and user-location state to a [`MapSurface`]
pub struct MapController<M> {
    surface: M,
    visibility: LayerVisibility,
    user_marker: Option<MarkerHandle>,
}

impl<M: MapSurface> MapController<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            visibility: LayerVisibility::default(),
            user_marker: None,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn into_surface(self) -> M {
        self.surface
    }

    #[must_use]
    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    /// Create or refresh the ward layers
    pub fn show_wards(&mut self, wards: &WardFeatureCollection) {
        let data = wards.to_geojson();
        if self.surface.has_source(WARDS_SOURCE) {
            self.surface.set_source_data(WARDS_SOURCE, data);
        } else {
            self.surface.add_source(WARDS_SOURCE, data);
            self.surface.add_layer(LayerSpec::wards_fill());
            self.surface.add_layer(LayerSpec::wards_outline());
        }
        self.apply_ward_visibility();
    }

    /// Create or refresh the centre layer and frame the centres
    pub fn show_centres(&mut self, centres: &CentreFeatureCollection) {
        let data = centres.to_geojson();
        if self.surface.has_source(CENTRES_SOURCE) {
            self.surface.set_source_data(CENTRES_SOURCE, data);
        } else {
            self.surface.add_source(CENTRES_SOURCE, data);
            self.surface.add_layer(LayerSpec::centres());
        }
        self.apply_centre_visibility();

        if let Some(bounds) = Bounds::around(centres.features.iter().map(|f| f.geometry.coordinates)) {
            debug!("Fitting map to {} centres", centres.features.len());
            self.surface.fit_bounds(bounds, FitOptions::default());
        }
    }

    /// Apply legend toggles to whichever layers exist
    pub fn set_visibility(&mut self, visibility: LayerVisibility) {
        self.visibility = visibility;
        self.apply_ward_visibility();
        self.apply_centre_visibility();
    }

    fn apply_ward_visibility(&mut self) {
        if self.surface.has_source(WARDS_SOURCE) {
            let visible = self.visibility.wards;
            self.surface.set_layer_visibility(WARDS_FILL_LAYER, visible);
            self.surface.set_layer_visibility(WARDS_OUTLINE_LAYER, visible);
        }
    }

    fn apply_centre_visibility(&mut self) {
        if self.surface.has_source(CENTRES_SOURCE) {
            self.surface
                .set_layer_visibility(CENTRES_LAYER, self.visibility.centres);
        }
    }

    /// Replace the user marker; `None` just removes it
    pub fn show_user_location(&mut self, position: Option<Position>) {
        if let Some(marker) = self.user_marker.take() {
            self.surface.remove_marker(marker);
        }
        if let Some(position) = position {
            let at = position.lng_lat();
            self.user_marker = Some(self.surface.add_marker(at, USER_MARKER_COLOR));
            self.surface.fly_to(at, USER_LOCATION_ZOOM);
        }
    }
}

/// Centre id carried by a clicked feature's properties
#[must_use]
pub fn clicked_centre_id(properties: &serde_json::Map<String, Value>) -> Option<Identifier> {
    serde_json::from_value(properties.get("id")?.clone()).ok()
}

/// In-memory surface that records the map state as JSON
#[derive(Debug, Serialize)]
pub struct MapScene {
    pub sources: serde_json::Map<String, Value>,
    pub layers: Vec<LayerSpec>,
    pub hidden_layers: Vec<String>,
    pub bounds: Option<(Bounds, FitOptions)>,
    pub markers: Vec<(MarkerHandle, [f64; 2], String)>,
    pub camera: Option<([f64; 2], f64)>,
    #[serde(skip)]
    next_marker: u64,
}

impl Default for MapScene {
    /// Fresh map looking at downtown Toronto
    fn default() -> Self {
        Self {
            sources: serde_json::Map::new(),
            layers: Vec::new(),
            hidden_layers: Vec::new(),
            bounds: None,
            markers: Vec::new(),
            camera: Some((TORONTO_CENTER, DEFAULT_ZOOM)),
            next_marker: 0,
        }
    }
}

impl MapSurface for MapScene {
    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: Value) {
        self.sources.insert(id.to_string(), data);
    }

    fn set_source_data(&mut self, id: &str, data: Value) {
        self.sources.insert(id.to_string(), data);
    }

    fn add_layer(&mut self, layer: LayerSpec) {
        self.layers.push(layer);
    }

    fn set_layer_visibility(&mut self, layer_id: &str, visible: bool) {
        self.hidden_layers.retain(|l| l != layer_id);
        if !visible {
            self.hidden_layers.push(layer_id.to_string());
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions) {
        self.bounds = Some((bounds, options));
    }

    fn add_marker(&mut self, lng_lat: [f64; 2], color: &str) -> MarkerHandle {
        self.next_marker += 1;
        let handle = MarkerHandle(self.next_marker);
        self.markers.push((handle, lng_lat, color.to_string()));
        handle
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.retain(|(h, _, _)| *h != marker);
    }

    fn fly_to(&mut self, center: [f64; 2], zoom: f64) {
        self.camera = Some((center, zoom));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn centres() -> CentreFeatureCollection {
        serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"geometry": {"coordinates": [-79.40, 43.64]}, "properties": {"id": 1, "total_programs": 12}},
                {"geometry": {"coordinates": [-79.30, 43.70]}, "properties": {"id": 2}}
            ]
        }))
        .unwrap()
    }

    fn wards() -> WardFeatureCollection {
        serde_json::from_value(json!({
            "features": [{"geometry": {"type": "Polygon", "coordinates": []}, "properties": {"area_name": "Spadina-Fort York"}}]
        }))
        .unwrap()
    }

    #[rstest]
    #[case(0.0, 8.0)]
    #[case(-3.0, 8.0)]
    #[case(5.0, 10.0)]
    #[case(10.0, 12.0)]
    #[case(30.0, 14.0)]
    #[case(100.0, 20.0)]
    #[case(400.0, 20.0)]
    fn test_marker_radius(#[case] programs: f64, #[case] radius: f64) {
        assert!((marker_radius(programs) - radius).abs() < 1e-9);
    }

    #[test]
    fn test_layers_added_once_then_refreshed() {
        let mut map = MapController::new(MapScene::default());
        map.show_wards(&wards());
        map.show_centres(&centres());
        map.show_centres(&centres());
        map.show_wards(&wards());

        let scene = map.surface();
        let ids: Vec<&str> = scene.layers.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![WARDS_FILL_LAYER, WARDS_OUTLINE_LAYER, CENTRES_LAYER]);
        assert_eq!(
            scene.sources[CENTRES_SOURCE]["features"][1]["properties"]["total_programs"],
            0
        );
        assert!(scene.hidden_layers.is_empty());
    }

    #[test]
    fn test_bounds_fit_with_padding_and_max_zoom() {
        let mut map = MapController::new(MapScene::default());
        map.show_centres(&centres());
        let (bounds, options) = map.surface().bounds.unwrap();
        assert_eq!(
            bounds,
            Bounds {
                west: -79.40,
                south: 43.64,
                east: -79.30,
                north: 43.70
            }
        );
        assert_eq!(options, FitOptions { padding: 100, max_zoom: 13.0 });
    }

    #[test]
    fn test_empty_centres_do_not_move_the_map() {
        let mut map = MapController::new(MapScene::default());
        map.show_centres(&CentreFeatureCollection::default());
        assert!(map.surface().bounds.is_none());
        assert!(map.surface().has_source(CENTRES_SOURCE));
    }

    #[test]
    fn test_legend_toggles_hide_layers() {
        let mut map = MapController::new(MapScene::default());
        map.show_wards(&wards());
        map.show_centres(&centres());
        map.set_visibility(LayerVisibility {
            centres: true,
            wards: false,
        });
        assert_eq!(
            map.surface().hidden_layers,
            vec![WARDS_FILL_LAYER.to_string(), WARDS_OUTLINE_LAYER.to_string()]
        );

        map.set_visibility(LayerVisibility::default());
        assert!(map.surface().hidden_layers.is_empty());
    }

    #[test]
    fn test_user_marker_replaced_and_camera_moves() {
        let mut map = MapController::new(MapScene::default());
        assert_eq!(map.surface().camera, Some((TORONTO_CENTER, DEFAULT_ZOOM)));
        map.show_user_location(Some(Position::new(43.65, -79.38)));
        map.show_user_location(Some(Position::new(43.70, -79.40)));

        let scene = map.surface();
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].1, [-79.40, 43.70]);
        assert_eq!(scene.camera, Some(([-79.40, 43.70], USER_LOCATION_ZOOM)));

        map.show_user_location(None);
        assert!(map.surface().markers.is_empty());
    }

    #[test]
    fn test_clicked_centre_id() {
        let features = centres().to_geojson();
        let properties = features["features"][0]["properties"].as_object().unwrap();
        assert_eq!(clicked_centre_id(properties), Some(Identifier::Number(1)));
        assert_eq!(clicked_centre_id(&serde_json::Map::new()), None);
    }
}
