//! GeoJSON feature collections for wards and centres

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ids::Identifier;

/// `jsonb_agg` over zero rows yields `null`; treat that as no features
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ward boundary polygons
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardFeatureCollection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<WardFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardFeature {
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Polygon or MultiPolygon, passed through to the map untouched
    pub geometry: Value,
}

impl WardFeature {
    #[must_use]
    pub fn area_name(&self) -> Option<&str> {
        self.properties.get("area_name").and_then(Value::as_str)
    }
}

/// Centre point features
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CentreFeatureCollection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<CentreFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentreFeature {
    pub properties: CentreProperties,
    pub geometry: PointGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentreProperties {
    pub id: Identifier,
    #[serde(default)]
    pub name: Option<String>,
    /// Drives marker sizing
    #[serde(default)]
    pub total_programs: Option<u32>,
    #[serde(default)]
    pub dropin_count: Option<u32>,
    #[serde(default)]
    pub registered_count: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CentreFeature {
    #[must_use]
    pub fn name(&self) -> &str {
        self.properties.name.as_deref().unwrap_or("Unnamed centre")
    }
}

impl CentreFeatureCollection {
    /// Feature collection as a plain JSON value, for handing to a map surface
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                let mut properties = f.properties.extra.clone();
                properties.insert("id".into(), serde_json::json!(f.properties.id));
                properties.insert("name".into(), serde_json::json!(f.properties.name));
                properties.insert(
                    "total_programs".into(),
                    serde_json::json!(f.properties.total_programs.unwrap_or(0)),
                );
                serde_json::json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": f.geometry.coordinates },
                    "properties": properties,
                })
            })
            .collect();
        serde_json::json!({ "type": "FeatureCollection", "features": features })
    }
}

impl WardFeatureCollection {
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                serde_json::json!({
                    "type": "Feature",
                    "geometry": f.geometry,
                    "properties": f.properties,
                })
            })
            .collect();
        serde_json::json!({ "type": "FeatureCollection", "features": features })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_features_decode_as_empty() {
        let centres: CentreFeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": null}"#).unwrap();
        assert!(centres.features.is_empty());

        let wards: WardFeatureCollection =
            serde_json::from_str(r#"{"type": "FeatureCollection"}"#).unwrap();
        assert!(wards.features.is_empty());
    }

    #[test]
    fn test_centre_feature_decodes_properties_bag() {
        let centres: CentreFeatureCollection = serde_json::from_str(
            r#"{"type": "FeatureCollection", "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-79.38, 43.65]},
                "properties": {"id": 5, "name": "Regent Park CC", "total_programs": 14, "ward": "13"}
            }]}"#,
        )
        .unwrap();
        let feature = &centres.features[0];
        assert_eq!(feature.properties.id, Identifier::Number(5));
        assert_eq!(feature.name(), "Regent Park CC");
        assert_eq!(feature.properties.total_programs, Some(14));
        assert_eq!(feature.properties.extra.get("ward"), Some(&Value::from("13")));
        assert_eq!(feature.geometry.latitude(), 43.65);

        let geojson = centres.to_geojson();
        assert_eq!(geojson["features"][0]["properties"]["total_programs"], 14);
        assert_eq!(geojson["features"][0]["properties"]["ward"], "13");
    }
}
