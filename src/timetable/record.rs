use serde::Serialize;
use std::collections::BTreeMap;

/// Substitute for empty cells and missing class lists.
pub const PLACEHOLDER: &str = "---";

/// Untis writes empty cells as a lone non-breaking space.
pub const EMPTY_CELL: &str = "\u{a0}";

/// One row of a substitution table, for one class.
///
/// Always holds `date`, `day` and `updated`, plus one entry per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LessonRecord(BTreeMap<String, String>);

impl LessonRecord {
    pub fn new(date: &str, day: &str, updated: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("date".to_string(), date.to_string());
        fields.insert("day".to_string(), day.to_string());
        fields.insert("updated".to_string(), updated.to_string());
        Self(fields)
    }

    pub fn insert(&mut self, attribute: String, value: String) {
        self.0.insert(attribute, value);
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
