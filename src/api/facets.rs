//! Facet tree builder.
//!
//! The measures catalog arrives as three levels of differently named
//! nesting (geographic level -> category -> measure). The legend and
//! drill-down pickers want one uniform shape instead, so every level is
//! reshaped into the same `{id, label, list}` node. Child order follows
//! the document order of the catalog, not alphabetical order.

use super::client::ApiClient;
use super::transport::HttpTransport;
use super::ApiError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One node of the facet tree. `list` is empty at the leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub list: IndexMap<String, Facet>,
}

impl Facet {
    fn leaf(id: &str, label: String) -> Self {
        Self {
            id: id.to_string(),
            label,
            list: IndexMap::new(),
        }
    }
}

/// The full facet hierarchy, keyed by geographic level.
pub type FacetTree = IndexMap<String, Facet>;

// Raw catalog shape as served by `{api}/stats/measures`.

#[derive(Deserialize)]
struct RawMeasure {
    label: String,
}

#[derive(Deserialize)]
struct RawCategory {
    label: String,
    measures: IndexMap<String, RawMeasure>,
}

#[derive(Deserialize)]
struct RawLevel {
    label: String,
    categories: IndexMap<String, RawCategory>,
}

/// Fetches the measures catalog and reshapes it into the uniform tree.
pub async fn get_facets<T: HttpTransport>(client: &ApiClient<T>) -> Result<FacetTree, ApiError> {
    let url = client.url("stats/measures");
    let raw = client.get_json(&url).await?;

    let levels: IndexMap<String, RawLevel> =
        serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))?;

    let tree: FacetTree = levels
        .into_iter()
        .map(|(level_id, level)| {
            let facet = facet_from_level(&level_id, level);
            (level_id, facet)
        })
        .collect();

    log::info!("Loaded facet tree with {} level(s)", tree.len());
    Ok(tree)
}

fn facet_from_level(id: &str, raw: RawLevel) -> Facet {
    let list = raw
        .categories
        .into_iter()
        .map(|(category_id, category)| {
            let facet = facet_from_category(&category_id, category);
            (category_id, facet)
        })
        .collect();

    Facet {
        id: id.to_string(),
        label: raw.label,
        list,
    }
}

fn facet_from_category(id: &str, raw: RawCategory) -> Facet {
    let list = raw
        .measures
        .into_iter()
        .map(|(measure_id, measure)| {
            let facet = Facet::leaf(&measure_id, measure.label);
            (measure_id, facet)
        })
        .collect();

    Facet {
        id: id.to_string(),
        label: raw.label,
        list,
    }
}
