use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AoiError;

/// Feature type suffix appended to every product workspace.
pub const TYPE_NAME_SUFFIX: &str = "datapoints";

/// Geometry column the spatial predicate is evaluated against.
pub const GEOMETRY_FIELD: &str = "geom";

pub const GEOJSON_OUTPUT_FORMAT: &str = "application/json";

pub const DEFAULT_LAYER_NAME: &str = "Filtered Data";

/// Decimal places used when a bounding box is written back as text (~0.1 m).
pub const COORDINATE_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point2D {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Earth-centred, Earth-fixed position in metres, as reported by a globe pick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl BoundingBox {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True when the rectangle was produced across the antimeridian and left > right.
    pub fn crosses_antimeridian(&self) -> bool {
        self.left > self.right
    }
}

/// The closed set of data products a query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Tmc1,
    Tmc2,
    Ohrc,
}

impl Product {
    pub const ALL: [Product; 3] = [Product::Tmc1, Product::Tmc2, Product::Ohrc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Tmc1 => "tmc1",
            Product::Tmc2 => "tmc2",
            Product::Ohrc => "ohrc",
        }
    }

    /// Qualified feature type name, e.g. `tmc1:datapoints`.
    pub fn type_name(&self) -> String {
        format!("{}:{}", self.as_str(), TYPE_NAME_SUFFIX)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|product| product.as_str() == s.trim())
            .ok_or_else(|| AoiError::UnknownProduct { id: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordField {
    Top,
    Bottom,
    Left,
    Right,
}

impl CoordField {
    pub const ALL: [CoordField; 4] = [
        CoordField::Top,
        CoordField::Bottom,
        CoordField::Left,
        CoordField::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordField::Top => "top",
            CoordField::Bottom => "bottom",
            CoordField::Left => "left",
            CoordField::Right => "right",
        }
    }
}

impl fmt::Display for CoordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordField {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AoiError::UnknownField {
                name: s.to_string(),
            })
    }
}

/// A fully built WFS GetFeature query. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialQuery {
    pub geometry_wkt: String,
    pub type_names: Vec<String>,
    pub output_format: String,
}

/// The GeoJSON document returned by the feature service, kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult(pub serde_json::Value);

impl QueryResult {
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }

    /// Number of features when the document is a FeatureCollection.
    pub fn feature_count(&self) -> Option<usize> {
        match geojson::GeoJson::from_json_value(self.0.clone()) {
            Ok(geojson::GeoJson::FeatureCollection(collection)) => Some(collection.features.len()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Geojson,
}

/// What the host catalog receives to display a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadableLayerRecord {
    pub name: String,
    pub kind: LayerKind,
    pub payload: QueryResult,
    pub enabled: bool,
}

/// Sequence number of an issued query. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parsing() {
        assert_eq!("tmc1".parse::<Product>().unwrap(), Product::Tmc1);
        assert_eq!("ohrc".parse::<Product>().unwrap(), Product::Ohrc);
        assert!(matches!(
            "dtm".parse::<Product>(),
            Err(AoiError::UnknownProduct { .. })
        ));
        assert_eq!(Product::Tmc2.type_name(), "tmc2:datapoints");
    }

    #[test]
    fn test_coord_field_parsing() {
        assert_eq!("top".parse::<CoordField>().unwrap(), CoordField::Top);
        assert_eq!("Right".parse::<CoordField>().unwrap(), CoordField::Right);
        assert!("north".parse::<CoordField>().is_err());
    }

    #[test]
    fn test_feature_count() {
        let empty = QueryResult(serde_json::json!({"type": "FeatureCollection", "features": []}));
        assert_eq!(empty.feature_count(), Some(0));

        let not_geojson = QueryResult(serde_json::json!({"error": "nope"}));
        assert_eq!(not_geojson.feature_count(), None);
    }

    #[test]
    fn test_layer_record_serialization() {
        let record = LoadableLayerRecord {
            name: DEFAULT_LAYER_NAME.to_string(),
            kind: LayerKind::Geojson,
            payload: QueryResult(serde_json::json!({"type": "FeatureCollection", "features": []})),
            enabled: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Filtered Data",
                "kind": "geojson",
                "payload": {"type": "FeatureCollection", "features": []},
                "enabled": true
            })
        );
    }
}
