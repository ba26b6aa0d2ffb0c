//! Query construction and hit projection.
//!
//! One query shape: a multi_match over the boosted product fields with
//! `cross_fields` scoring, so a multi-term query can match one term in
//! `name` and another in `description` and still score as a single
//! coherent match. Product attributes are split across fields but describe
//! one entity, which is exactly the case cross_fields exists for.

use serde_json::{Value, json};
use tracing::warn;

use crate::engine::RawHit;
use crate::model::{Categories, SearchHit};

/// Boosted field list for the product query. `name` and `description`
/// carry double weight. The field is `short_description` — the stored
/// field name — not the `sort_description` typo the legacy tool queried.
pub const SEARCH_FIELDS: [&str; 5] = [
    "name^2",
    "categories",
    "description^2",
    "short_description",
    "country_of_manufacture",
];

/// Build the engine query body for a free-text query. Result size is left
/// at the engine default.
pub fn build_query(query: &str) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": query,
                "fields": SEARCH_FIELDS,
                "type": "cross_fields"
            }
        }
    })
}

/// Map raw hits into `SearchHit`s, preserving engine order. A hit whose
/// stored source is missing a required field is dropped with a warning
/// instead of failing the whole page.
pub fn project_hits(hits: Vec<RawHit>) -> Vec<SearchHit> {
    hits.into_iter()
        .filter_map(|hit| {
            project_hit(&hit).or_else(|| {
                warn!(score = hit.score, "skipping malformed hit from engine");
                None
            })
        })
        .collect()
}

fn project_hit(hit: &RawHit) -> Option<SearchHit> {
    let src = hit.source.as_object()?;
    let text = |field: &str| -> Option<String> {
        Some(src.get(field)?.as_str()?.to_string())
    };

    Some(SearchHit {
        sku: text("sku")?,
        name: text("name")?,
        description: text("description")?,
        short_description: text("short_description")?,
        price: crate::model::types::coerce_f64(src.get("price")?.clone())?,
        special_price: match src.get("special_price") {
            None | Some(Value::Null) => None,
            Some(v) => crate::model::types::coerce_f64(v.clone()),
        },
        country_of_manufacture: text("country_of_manufacture")?,
        categories: serde_json::from_value::<Categories>(src.get("categories")?.clone()).ok()?,
        score: hit.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(sku: &str) -> Value {
        json!({
            "sku": sku,
            "name": "Shower gel",
            "description": "Body and face wash",
            "short_description": "wash gel",
            "price": 12.5,
            "special_price": null,
            "country_of_manufacture": "France",
            "categories": ["Body", "Face"],
        })
    }

    #[test]
    fn query_is_cross_fields_multi_match() {
        let body = build_query("face wash");
        assert_eq!(body["query"]["multi_match"]["query"], "face wash");
        assert_eq!(body["query"]["multi_match"]["type"], "cross_fields");
        let fields: Vec<&str> = body["query"]["multi_match"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec![
                "name^2",
                "categories",
                "description^2",
                "short_description",
                "country_of_manufacture"
            ]
        );
        // The legacy field-name typo must not come back.
        assert!(!fields.contains(&"sort_description"));
        // No explicit size: the engine default page applies.
        assert!(body.get("size").is_none());
    }

    #[test]
    fn hits_project_in_engine_order() {
        let hits = vec![
            RawHit { score: 9.1, source: source("A") },
            RawHit { score: 3.4, source: source("B") },
        ];
        let projected = project_hits(hits);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].sku, "A");
        assert_eq!(projected[0].score, 9.1);
        assert_eq!(projected[1].sku, "B");
        assert_eq!(projected[1].categories.to_string(), "Body, Face");
    }

    #[test]
    fn numeric_string_price_is_coerced() {
        let mut src = source("A");
        src["price"] = json!("7.99");
        src["special_price"] = json!("5.00");
        let hit = project_hits(vec![RawHit { score: 1.0, source: src }]);
        assert_eq!(hit[0].price, 7.99);
        assert_eq!(hit[0].special_price, Some(5.0));
    }

    #[test]
    fn missing_special_price_is_none() {
        let mut src = source("A");
        src.as_object_mut().unwrap().remove("special_price");
        let hit = project_hits(vec![RawHit { score: 1.0, source: src }]);
        assert_eq!(hit[0].special_price, None);
    }

    #[test]
    fn malformed_hit_is_dropped_not_fatal() {
        let mut bad = source("B");
        bad.as_object_mut().unwrap().remove("sku");
        let hits = vec![
            RawHit { score: 2.0, source: source("A") },
            RawHit { score: 1.0, source: bad },
        ];
        let projected = project_hits(hits);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].sku, "A");
    }

    #[test]
    fn string_categories_are_accepted() {
        let mut src = source("A");
        src["categories"] = json!("Body care");
        let projected = project_hits(vec![RawHit { score: 1.0, source: src }]);
        assert_eq!(projected[0].categories.to_string(), "Body care");
    }
}
