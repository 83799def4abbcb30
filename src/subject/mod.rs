//! Subject capabilities probed by the engine.
//!
//! A subject exposes its dynamic attributes through four named operations
//! instead of relying on implicit interception, plus two independent ways of
//! flattening itself into an ordered key-value mapping:
//!
//! - `Subject::to_array`: the native projection the type defines itself.
//! - [`project_generic`]: a reflective enumeration of every attached field,
//!   driven by the subject's `Serialize` impl.
//!
//! ## Files
//! - `table.rs`: ordered side table for dynamic attributes.
//! - `term.rs`: taxonomy term subject.

mod table;
mod term;

pub use table::DynamicTable;
pub use term::{Term, TermRecord};

use crate::error::ProbeError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Named access to attributes outside the declared schema.
pub trait DynamicProperties {
    /// Resolve `name` to a value, including computed attributes.
    fn get(&self, name: &str) -> Option<Value>;

    /// Assign `name`. Subjects may refuse values they cannot store.
    fn set(&mut self, name: &str, value: Value) -> Result<(), ProbeError>;

    /// Whether `name` currently holds a non-null value.
    ///
    /// Reflects materialized state only: an attribute that `get` can compute
    /// on demand is not considered present.
    fn isset(&self, name: &str) -> bool;

    /// Remove `name`. Removing a missing attribute is a no-op.
    fn unset(&mut self, name: &str);
}

/// An object instance the probe engine can be pointed at.
pub trait Subject: DynamicProperties + Serialize {
    /// Type name used in report lines, e.g. `Term`.
    fn type_name(&self) -> &str;

    /// Identity shown in the report header.
    fn label(&self) -> String;

    /// Native export projection.
    fn to_array(&self) -> Map<String, Value>;
}

/// Generic export projection: serialize the whole subject and require a map.
pub fn project_generic<S: Serialize + ?Sized>(subject: &S) -> Result<Map<String, Value>, ProbeError> {
    match serde_json::to_value(subject)? {
        Value::Object(map) => Ok(map),
        other => Err(ProbeError::ProjectionFailed {
            reason: format!("subject serialized as {}, not a map", value_kind(&other)),
        }),
    }
}

/// Short name of a JSON value's kind, used in anomaly messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[derive(Serialize)]
    struct Tuple(u8, u8);

    #[test]
    fn generic_projection_rejects_non_maps() {
        let err = project_generic(&Tuple(1, 2)).unwrap_err();
        assert!(matches!(err, ProbeError::ProjectionFailed { .. }));
        assert!(err.message().contains("array"));
    }

    #[test]
    fn generic_projection_keeps_field_order() {
        let mut term = Term::from(TermRecord::sample());
        term.set("zeta", json!(1)).unwrap();
        term.set("alpha", json!(2)).unwrap();
        let map = project_generic(&term).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys.first(), Some(&"term_id"));
        assert_eq!(&keys[keys.len() - 2..], &["zeta", "alpha"]);
    }

    #[test]
    fn value_kinds() {
        assert_eq!(value_kind(&json!(null)), "null");
        assert_eq!(value_kind(&json!("x")), "string");
        assert_eq!(value_kind(&json!({ "k": 1 })), "object");
    }
}
