//! Loosely typed value tree for responses that may carry non-finite floats.
//!
//! JSON cannot encode `inf` or `NaN`; [`sanitize`] rewrites them as text so
//! the tree always serializes.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::spreadsheet::CellValue;

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<JsonNode>),
    /// Keys keep insertion order
    Map(Vec<(String, JsonNode)>),
}

impl JsonNode {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, JsonNode)>) -> Self {
        JsonNode::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn text(value: impl Into<String>) -> Self {
        JsonNode::Text(value.into())
    }
}

impl From<&CellValue> for JsonNode {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Null => JsonNode::Null,
            CellValue::Boolean(flag) => JsonNode::Bool(*flag),
            CellValue::Text(text) => JsonNode::Text(text.clone()),
            CellValue::Number(value)
                if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT =>
            {
                JsonNode::Int(*value as i64)
            }
            CellValue::Number(value) => JsonNode::Float(*value),
        }
    }
}

/// Replaces every non-finite float, at any depth, with "inf", "-inf" or "nan"
pub fn sanitize(node: JsonNode) -> JsonNode {
    match node {
        JsonNode::Float(value) if !value.is_finite() => JsonNode::Text(non_finite_text(value)),
        JsonNode::List(items) => JsonNode::List(items.into_iter().map(sanitize).collect()),
        JsonNode::Map(entries) => JsonNode::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, sanitize(value)))
                .collect(),
        ),
        other => other,
    }
}

fn non_finite_text(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonNode::Null => serializer.serialize_unit(),
            JsonNode::Bool(flag) => serializer.serialize_bool(*flag),
            JsonNode::Int(value) => serializer.serialize_i64(*value),
            JsonNode::Float(value) => serializer.serialize_f64(*value),
            JsonNode::Text(text) => serializer.serialize_str(text),
            JsonNode::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            JsonNode::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_salary(salary: f64) -> JsonNode {
        JsonNode::map([
            ("inserted_count", JsonNode::Int(0)),
            (
                "invalid_rows",
                JsonNode::List(vec![JsonNode::map([
                    (
                        "row",
                        JsonNode::map([
                            ("id", JsonNode::Int(1)),
                            ("name", JsonNode::Null),
                            ("age", JsonNode::Float(30.5)),
                            ("salary", JsonNode::Float(salary)),
                        ]),
                    ),
                    ("error", JsonNode::text("Missing required fields")),
                ])]),
            ),
        ])
    }

    #[test]
    fn test_sanitize_finite_tree_is_noop() {
        let tree = report_with_salary(4000.25);
        assert_eq!(sanitize(tree.clone()), tree);
    }

    #[test]
    fn test_sanitize_replaces_only_non_finite_leaf() {
        let sanitized = sanitize(report_with_salary(f64::INFINITY));
        assert_eq!(
            sanitized,
            JsonNode::map([
                ("inserted_count", JsonNode::Int(0)),
                (
                    "invalid_rows",
                    JsonNode::List(vec![JsonNode::map([
                        (
                            "row",
                            JsonNode::map([
                                ("id", JsonNode::Int(1)),
                                ("name", JsonNode::Null),
                                ("age", JsonNode::Float(30.5)),
                                ("salary", JsonNode::text("inf")),
                            ]),
                        ),
                        ("error", JsonNode::text("Missing required fields")),
                    ])]),
                ),
            ])
        );
    }

    #[test]
    fn test_non_finite_texts() {
        assert_eq!(sanitize(JsonNode::Float(f64::NEG_INFINITY)), JsonNode::text("-inf"));
        assert_eq!(sanitize(JsonNode::Float(f64::NAN)), JsonNode::text("nan"));
        assert_eq!(sanitize(JsonNode::Int(7)), JsonNode::Int(7));
        assert_eq!(sanitize(JsonNode::Bool(true)), JsonNode::Bool(true));
    }

    #[test]
    fn test_serialize_keeps_key_order() {
        let node = sanitize(JsonNode::map([
            ("salary", JsonNode::Float(f64::NAN)),
            ("age", JsonNode::Int(30)),
            ("id", JsonNode::Float(1.5)),
        ]));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"salary":"nan","age":30,"id":1.5}"#);
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(JsonNode::from(&CellValue::Number(50000.0)), JsonNode::Int(50000));
        assert_eq!(JsonNode::from(&CellValue::Number(0.5)), JsonNode::Float(0.5));
        assert_eq!(
            JsonNode::from(&CellValue::Number(f64::INFINITY)),
            JsonNode::Float(f64::INFINITY)
        );
        assert_eq!(JsonNode::from(&CellValue::Null), JsonNode::Null);
    }
}
