use serde::Serialize;
use serde_json::{Map, Value};

/// Insertion-ordered storage for dynamic attributes.
///
/// Serializes transparently as a map so it can be flattened into the owning
/// subject's generic projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DynamicTable {
    entries: Map<String, Value>,
}

impl DynamicTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Insert or overwrite; an overwritten entry keeps its position.
    pub fn set(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), value);
    }

    /// Present means stored and not null.
    pub fn isset(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(value) if !value.is_null())
    }

    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_preserves_order_of_remaining_entries() {
        let mut table = DynamicTable::new();
        table.set("a", json!(1));
        table.set("b", json!(2));
        table.set("c", json!(3));
        assert_eq!(table.unset("a"), Some(json!(1)));
        let keys: Vec<&String> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn null_entries_are_not_set() {
        let mut table = DynamicTable::new();
        table.set("maybe", Value::Null);
        assert!(!table.isset("maybe"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unset_missing_is_noop() {
        let mut table = DynamicTable::new();
        assert_eq!(table.unset("ghost"), None);
        assert!(table.is_empty());
    }
}
