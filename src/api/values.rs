//! Per-region statistical values fetcher.
//!
//! One call per (level, category, measure) selection. The response is the
//! backend's shape passed through: a value range for color-scale
//! normalization plus a FIPS -> value mapping keyed like the geometry
//! features' `id` property.

use super::client::ApiClient;
use super::transport::HttpTransport;
use super::ApiError;
use crate::query;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value for one region. Cancer measures also carry the age-adjusted
/// count alongside the mapped rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FipsValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aac: Option<f64>,
}

/// Result of a values fetch. `min`/`max` are null when the measure has no
/// rows for the selected level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesResult {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub values: HashMap<String, FipsValue>,
}

/// Fetches the values for a (level, category, measure) triple.
pub async fn get_values<T: HttpTransport>(
    client: &ApiClient<T>,
    level: &str,
    category: &str,
    measure: &str,
) -> Result<ValuesResult, ApiError> {
    let url = client.url(&format!(
        "stats/{}/{}/fips-value?measure={}",
        level,
        category,
        query::percent_encode(measure)
    ));
    let raw = client.get_json(&url).await?;

    let result: ValuesResult =
        serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))?;

    log::info!(
        "Loaded {} value(s) for {}/{}/{}",
        result.values.len(),
        level,
        category,
        measure
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubTransport;
    use crate::config::ApiConfig;

    const VALUES_URL: &str = "/api/stats/county/cancer/fips-value?measure=Lung%20%26%20Bronchus";

    fn client(body: &str) -> ApiClient<StubTransport> {
        ApiClient::new(
            ApiConfig::new("/api"),
            StubTransport::new().respond(VALUES_URL, 200, body),
        )
    }

    #[test]
    fn test_measure_is_percent_encoded_into_the_url() {
        let body = r#"{"min": 10.0, "max": 80.5, "values": {}}"#;
        let api = client(body);

        let result =
            pollster::block_on(get_values(&api, "county", "cancer", "Lung & Bronchus")).unwrap();
        assert_eq!(result.min, Some(10.0));
        assert_eq!(result.max, Some(80.5));
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_values_parse_with_and_without_aac() {
        let body = r#"{
            "min": 41.2,
            "max": 67.9,
            "values": {
                "19153": {"value": 67.9, "aac": 312.0},
                "19113": {"value": 41.2}
            }
        }"#;
        let api = client(body);

        let result =
            pollster::block_on(get_values(&api, "county", "cancer", "Lung & Bronchus")).unwrap();
        assert_eq!(
            result.values["19153"],
            FipsValue {
                value: 67.9,
                aac: Some(312.0)
            }
        );
        assert_eq!(result.values["19113"].aac, None);
    }

    #[test]
    fn test_null_range_for_empty_measure() {
        let body = r#"{"min": null, "max": null, "values": {}}"#;
        let api = client(body);

        let result =
            pollster::block_on(get_values(&api, "county", "cancer", "Lung & Bronchus")).unwrap();
        assert_eq!(result.min, None);
        assert_eq!(result.max, None);
    }
}
