use crate::core::filter_state::FilterStateStore;
use crate::domain::model::{CoordField, SpatialQuery, GEOJSON_OUTPUT_FORMAT, GEOMETRY_FIELD};
use crate::utils::error::ValidationError;
use crate::utils::validation::parse_coordinate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const WFS_SERVICE: &str = "WFS";
pub const WFS_VERSION: &str = "1.1.0";
pub const WFS_REQUEST: &str = "GetFeature";

/// Characters left as-is when encoding a URL component (`encodeURIComponent`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Validates the filter state and builds the spatial query for it.
    ///
    /// Checks run in order: all four coordinates present, at least one product
    /// selected, every coordinate numeric. Values outside valid degree ranges
    /// are passed through.
    pub fn build(&self, state: &FilterStateStore) -> Result<SpatialQuery, ValidationError> {
        if CoordField::ALL
            .iter()
            .any(|field| state.field(*field).trim().is_empty())
        {
            return Err(ValidationError::AoiIncomplete);
        }

        let type_names: Vec<String> = state
            .selected_products()
            .map(|product| product.type_name())
            .collect();
        if type_names.is_empty() {
            return Err(ValidationError::NoProductSelected);
        }

        let top = coordinate(state, CoordField::Top)?;
        let bottom = coordinate(state, CoordField::Bottom)?;
        let left = coordinate(state, CoordField::Left)?;
        let right = coordinate(state, CoordField::Right)?;

        Ok(SpatialQuery {
            geometry_wkt: rectangle_wkt(top, bottom, left, right),
            type_names,
            output_format: GEOJSON_OUTPUT_FORMAT.to_string(),
        })
    }
}

fn coordinate(state: &FilterStateStore, field: CoordField) -> Result<&str, ValidationError> {
    let raw = state.field(field);
    parse_coordinate(raw)
        .map(|(text, _)| text)
        .ok_or_else(|| ValidationError::InvalidCoordinate {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Closed ring: (left,bottom) (right,bottom) (right,top) (left,top) (left,bottom).
fn rectangle_wkt(top: &str, bottom: &str, left: &str, right: &str) -> String {
    format!(
        "POLYGON(({l} {b}, {r} {b}, {r} {t}, {l} {t}, {l} {b}))",
        l = left,
        b = bottom,
        r = right,
        t = top
    )
}

impl SpatialQuery {
    pub fn type_name_list(&self) -> String {
        self.type_names.join(",")
    }

    /// CQL predicate, e.g. `INTERSECTS(geom, POLYGON((...)))`.
    pub fn cql_filter(&self) -> String {
        format!("INTERSECTS({}, {})", GEOMETRY_FIELD, self.geometry_wkt)
    }

    /// GetFeature URL for this query against `endpoint`.
    pub fn to_request_url(&self, endpoint: &str) -> String {
        let separator = if endpoint.ends_with('?') || endpoint.ends_with('&') {
            ""
        } else if endpoint.contains('?') {
            "&"
        } else {
            "?"
        };
        format!(
            "{}{}service={}&version={}&request={}&typeName={}&cql_filter={}&outputFormat={}",
            endpoint,
            separator,
            WFS_SERVICE,
            WFS_VERSION,
            WFS_REQUEST,
            self.type_name_list(),
            utf8_percent_encode(&self.cql_filter(), URI_COMPONENT),
            self.output_format
        )
    }
}
