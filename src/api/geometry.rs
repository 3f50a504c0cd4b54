//! Geometry adapter: boundary records to GeoJSON features.
//!
//! The backend serves boundary collections (counties, tracts) as plain
//! record arrays in which the geometry is a JSON-encoded string column.
//! This adapter decodes that column into a structured geometry and carries
//! every other field over as feature properties, adding the `id` and
//! `name` the map and legend key off.

use super::client::ApiClient;
use super::transport::HttpTransport;
use super::ApiError;
use geojson::{Feature, Geometry};
use serde_json::Value;

/// Record field holding the JSON-encoded geometry string.
const GEOMETRY_FIELD: &str = "geometry";

/// Property fields tried, in order, when deriving a feature's `name`.
const NAME_FIELDS: [&str; 2] = ["full", "name"];

/// Fetches a boundary collection and converts each record into a GeoJSON
/// feature.
///
/// `collection` is the API path segment (e.g. `"county"`); `id_field`
/// names the record field copied into the `id` property (e.g. `"FIPS"`).
/// One feature per input record, in input order. A record with a missing
/// or malformed geometry string fails the whole call.
pub async fn get_geometry<T: HttpTransport>(
    client: &ApiClient<T>,
    collection: &str,
    id_field: &str,
) -> Result<Vec<Feature>, ApiError> {
    let url = client.url(collection);
    let raw = client.get_json(&url).await?;

    let records = raw.as_array().ok_or_else(|| {
        ApiError::Decode(format!("expected an array of {} records", collection))
    })?;

    let features = records
        .iter()
        .map(|record| feature_from_record(record, id_field))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Loaded {} {} boundaries", features.len(), collection);
    Ok(features)
}

/// Converts one raw record into a feature.
fn feature_from_record(record: &Value, id_field: &str) -> Result<Feature, ApiError> {
    let fields = record
        .as_object()
        .ok_or_else(|| ApiError::Decode("geometry record is not an object".to_string()))?;

    let encoded = fields
        .get(GEOMETRY_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ApiError::Decode(format!("record has no {} string field", GEOMETRY_FIELD))
        })?;
    let geometry: Geometry =
        serde_json::from_str(encoded).map_err(|e| ApiError::Decode(e.to_string()))?;

    // All original fields minus the raw geometry string, plus the derived
    // id and name.
    let mut properties = serde_json::Map::new();
    for (key, value) in fields {
        if key != GEOMETRY_FIELD {
            properties.insert(key.clone(), value.clone());
        }
    }

    let id = fields.get(id_field).cloned().unwrap_or(Value::Null);
    let name = NAME_FIELDS
        .iter()
        .find_map(|field| {
            fields
                .get(*field)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
        .unwrap_or("");

    properties.insert("id".to_string(), id);
    properties.insert("name".to_string(), Value::String(name.to_string()));

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;
    use crate::config::ApiConfig;
    use serde_json::json;

    fn county_body() -> String {
        json!([
            {
                "FIPS": 19153,
                "full": "Polk County",
                "name": "Polk",
                "geometry": "{\"type\": \"Point\", \"coordinates\": [-93.6, 41.6]}"
            },
            {
                "FIPS": 19113,
                "name": "Linn",
                "geometry": "{\"type\": \"Point\", \"coordinates\": [-91.6, 42.0]}"
            },
            {
                "FIPS": 19013,
                "geometry": "{\"type\": \"Point\", \"coordinates\": [-92.3, 42.5]}"
            }
        ])
        .to_string()
    }

    fn client(body: &str) -> ApiClient<StubTransport> {
        ApiClient::new(
            ApiConfig::new("/api"),
            StubTransport::new().respond("/api/county", 200, body),
        )
    }

    #[test]
    fn test_one_feature_per_record() {
        let api = client(&county_body());
        let features = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap();
        assert_eq!(features.len(), 3);
    }

    #[test]
    fn test_properties_carry_id_and_drop_raw_geometry() {
        let api = client(&county_body());
        let features = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap();

        let properties = features[0].properties.as_ref().unwrap();
        assert_eq!(properties.get("id"), Some(&json!(19153)));
        assert_eq!(properties.get("FIPS"), Some(&json!(19153)));
        assert!(!properties.contains_key("geometry"));
        assert!(features[0].geometry.is_some());
    }

    #[test]
    fn test_name_prefers_full_then_name_then_empty() {
        let api = client(&county_body());
        let features = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap();

        let name = |i: usize| {
            features[i].properties.as_ref().unwrap()["name"]
                .as_str()
                .unwrap()
                .to_string()
        };
        assert_eq!(name(0), "Polk County");
        assert_eq!(name(1), "Linn");
        assert_eq!(name(2), "");
    }

    #[test]
    fn test_missing_id_field_maps_to_null() {
        let api = client(&county_body());
        let features = pollster::block_on(get_geometry(&api, "county", "GEOID")).unwrap();
        assert_eq!(
            features[0].properties.as_ref().unwrap().get("id"),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_malformed_geometry_fails_the_whole_call() {
        let body = json!([
            {"FIPS": 1, "geometry": "{\"type\": \"Point\", \"coordinates\": [0.0, 0.0]}"},
            {"FIPS": 2, "geometry": "not json"}
        ])
        .to_string();
        let api = client(&body);

        let err = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_warm_cache_yields_identical_output_without_network() {
        let api = client(&county_body());

        let first = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap();
        let second = pollster::block_on(get_geometry(&api, "county", "FIPS")).unwrap();

        assert_eq!(first, second);
        assert_eq!(api.transport().calls(), 1);
    }
}
