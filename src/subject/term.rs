//! Taxonomy term subject.
//!
//! Declared fields are typed struct members; anything else written to a term
//! lands in its [`DynamicTable`]. Two attributes are computed on read:
//! `data` (an object of the stored columns) and `link` (a permalink derived
//! from taxonomy and slug). Neither is reported present by `isset` until it
//! is written explicitly.

use super::{value_kind, DynamicProperties, DynamicTable, Subject};
use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Columns copied into the computed `data` attribute.
const DATA_COLUMNS: [&str; 9] = [
    "term_id",
    "name",
    "slug",
    "term_group",
    "term_taxonomy_id",
    "taxonomy",
    "description",
    "parent",
    "count",
];

/// Sanitization context stamped on terms fetched from the catalog.
const RAW_FILTER: &str = "raw";

/// Stored representation of a term, as read from a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermRecord {
    pub term_id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub term_group: i64,
    pub term_taxonomy_id: u64,
    pub taxonomy: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub count: u64,
}

#[cfg(test)]
impl TermRecord {
    pub(crate) fn sample() -> Self {
        Self {
            term_id: 1,
            name: "Uncategorized".into(),
            slug: "uncategorized".into(),
            term_group: 0,
            term_taxonomy_id: 1,
            taxonomy: "category".into(),
            description: String::new(),
            parent: 0,
            count: 3,
        }
    }
}

/// A live term instance with dynamic attribute support.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Term {
    pub term_id: u64,
    pub name: String,
    pub slug: String,
    pub term_group: i64,
    pub term_taxonomy_id: u64,
    pub taxonomy: String,
    pub description: String,
    pub parent: u64,
    pub count: u64,
    pub filter: String,
    #[serde(flatten)]
    dynamic: DynamicTable,
}

impl From<TermRecord> for Term {
    fn from(record: TermRecord) -> Self {
        Self {
            term_id: record.term_id,
            name: record.name,
            slug: record.slug,
            term_group: record.term_group,
            term_taxonomy_id: record.term_taxonomy_id,
            taxonomy: record.taxonomy,
            description: record.description,
            parent: record.parent,
            count: record.count,
            filter: RAW_FILTER.to_string(),
            dynamic: DynamicTable::new(),
        }
    }
}

impl Term {
    /// Dynamic attributes currently attached, in write order.
    pub fn dynamic(&self) -> &DynamicTable {
        &self.dynamic
    }

    /// Read a declared field; `None` if `name` is not declared.
    fn declared(&self, name: &str) -> Option<Value> {
        let value = match name {
            "term_id" => json!(self.term_id),
            "name" => json!(self.name),
            "slug" => json!(self.slug),
            "term_group" => json!(self.term_group),
            "term_taxonomy_id" => json!(self.term_taxonomy_id),
            "taxonomy" => json!(self.taxonomy),
            "description" => json!(self.description),
            "parent" => json!(self.parent),
            "count" => json!(self.count),
            "filter" => json!(self.filter),
            _ => return None,
        };
        Some(value)
    }

    /// Write a declared field; `None` if `name` is not declared.
    fn assign_declared(&mut self, name: &str, value: &Value) -> Option<Result<(), ProbeError>> {
        let result = match name {
            "term_id" => as_unsigned(name, value).map(|v| self.term_id = v),
            "name" => as_text(name, value).map(|v| self.name = v),
            "slug" => as_text(name, value).map(|v| self.slug = v),
            "term_group" => as_signed(name, value).map(|v| self.term_group = v),
            "term_taxonomy_id" => as_unsigned(name, value).map(|v| self.term_taxonomy_id = v),
            "taxonomy" => as_text(name, value).map(|v| self.taxonomy = v),
            "description" => as_text(name, value).map(|v| self.description = v),
            "parent" => as_unsigned(name, value).map(|v| self.parent = v),
            "count" => as_unsigned(name, value).map(|v| self.count = v),
            "filter" => as_text(name, value).map(|v| self.filter = v),
            _ => return None,
        };
        Some(result)
    }

    /// Attributes resolved on demand when nothing is stored under `name`.
    fn computed(&self, name: &str) -> Option<Value> {
        match name {
            "data" => {
                let data: Map<String, Value> = DATA_COLUMNS
                    .iter()
                    .filter_map(|column| self.declared(column).map(|v| (column.to_string(), v)))
                    .collect();
                Some(Value::Object(data))
            }
            "link" => Some(json!(format!("/{}/{}/", self.taxonomy, self.slug))),
            _ => None,
        }
    }
}

impl DynamicProperties for Term {
    fn get(&self, name: &str) -> Option<Value> {
        self.declared(name)
            .or_else(|| self.dynamic.get(name).cloned())
            .or_else(|| self.computed(name))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), ProbeError> {
        match self.assign_declared(name, &value) {
            Some(result) => result,
            None => {
                self.dynamic.set(name, value);
                Ok(())
            }
        }
    }

    fn isset(&self, name: &str) -> bool {
        self.declared(name).is_some() || self.dynamic.isset(name)
    }

    fn unset(&mut self, name: &str) {
        // Declared columns are typed members and cannot be detached.
        if self.declared(name).is_none() {
            self.dynamic.unset(name);
        }
    }
}

impl Subject for Term {
    fn type_name(&self) -> &str {
        "Term"
    }

    fn label(&self) -> String {
        format!("Term ID: {} (Name: {})", self.term_id, self.name)
    }

    fn to_array(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("term_id".into(), json!(self.term_id));
        out.insert("name".into(), json!(self.name));
        out.insert("slug".into(), json!(self.slug));
        out.insert("term_group".into(), json!(self.term_group));
        out.insert("term_taxonomy_id".into(), json!(self.term_taxonomy_id));
        out.insert("taxonomy".into(), json!(self.taxonomy));
        out.insert("description".into(), json!(self.description));
        out.insert("parent".into(), json!(self.parent));
        out.insert("count".into(), json!(self.count));
        out.insert("filter".into(), json!(self.filter));
        for (name, value) in self.dynamic.iter() {
            out.insert(name.clone(), value.clone());
        }
        out
    }
}

fn rejected(name: &str, expected: &str, value: &Value) -> ProbeError {
    ProbeError::ValueRejected {
        name: name.to_string(),
        reason: format!("expected {}, got {}", expected, value_kind(value)),
    }
}

fn as_text(name: &str, value: &Value) -> Result<String, ProbeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(rejected(name, "string", other)),
    }
}

fn as_unsigned(name: &str, value: &Value) -> Result<u64, ProbeError> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| rejected(name, "unsigned integer", value))
}

fn as_signed(name: &str, value: &Value) -> Result<i64, ProbeError> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| rejected(name, "integer", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::project_generic;

    fn term() -> Term {
        Term::from(TermRecord::sample())
    }

    #[test]
    fn computed_attributes_are_readable_but_not_set() {
        let t = term();
        let data = t.get("data").unwrap();
        assert_eq!(data["slug"], "uncategorized");
        assert!(data.get("filter").is_none());
        assert_eq!(t.get("link").unwrap(), "/category/uncategorized/");
        assert!(!t.isset("data"));
        assert!(!t.isset("link"));
    }

    #[test]
    fn written_link_shadows_derived_link() {
        let mut t = term();
        t.set("link", json!("https://example.com/")).unwrap();
        assert!(t.isset("link"));
        assert_eq!(t.get("link").unwrap(), "https://example.com/");
        t.unset("link");
        assert!(!t.isset("link"));
        assert_eq!(t.get("link").unwrap(), "/category/uncategorized/");
    }

    #[test]
    fn declared_fields_are_coerced_on_write() {
        let mut t = term();
        t.set("count", json!("42")).unwrap();
        assert_eq!(t.count, 42);
        t.set("name", json!(7)).unwrap();
        assert_eq!(t.name, "7");
        let err = t.set("parent", json!({ "id": 1 })).unwrap_err();
        assert!(matches!(err, ProbeError::ValueRejected { .. }));
        assert!(t.dynamic().is_empty());
    }

    #[test]
    fn declared_fields_survive_unset() {
        let mut t = term();
        t.unset("slug");
        assert!(t.isset("slug"));
        assert_eq!(t.slug, "uncategorized");
    }

    #[test]
    fn projections_agree_on_a_term() {
        let mut t = term();
        t.set("unknown", json!("x")).unwrap();
        let native: Vec<String> = t.to_array().keys().cloned().collect();
        let generic: Vec<String> = project_generic(&t).unwrap().keys().cloned().collect();
        assert_eq!(native, generic);
        assert_eq!(native.last().map(String::as_str), Some("unknown"));
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let record: TermRecord = serde_json::from_str(
            r#"{"term_id": 5, "name": "News", "slug": "news", "term_taxonomy_id": 5, "taxonomy": "category"}"#,
        )
        .unwrap();
        let t = Term::from(record);
        assert_eq!(t.filter, "raw");
        assert_eq!(t.count, 0);
        assert_eq!(t.label(), "Term ID: 5 (Name: News)");
    }
}
