use crate::error::{DsbError, Result};
use serde::Deserialize;

/// The attribute name whose cell holds a comma separated class list.
pub const CLASS: &str = "class";

/// Names for the table columns, in column order.
///
/// The position of [`CLASS`] is looked up once here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct ColumnMapping {
    names: Vec<String>,
    class_index: Option<usize>,
}

impl ColumnMapping {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(DsbError::Config(format!("Duplicate column name `{}`", name)));
            }
        }
        let class_index = names.iter().position(|name| name == CLASS);

        Ok(Self { names, class_index })
    }

    /// Attribute name for the cell at `index`. Cells beyond the mapping get
    /// `col{index}`.
    pub fn attribute(&self, index: usize) -> String {
        match self.names.get(index) {
            Some(name) => name.clone(),
            None => format!("col{}", index),
        }
    }

    pub fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let names = [
            "type",
            "class",
            "lesson",
            "subject",
            "room",
            "new_subject",
            "new_teacher",
            "teacher",
        ];
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            class_index: Some(1),
        }
    }
}

impl TryFrom<Vec<String>> for ColumnMapping {
    type Error = DsbError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn class_index_is_found() {
        let mapping = ColumnMapping::new(["lesson", "class", "room"]).unwrap();
        assert_eq!(mapping.class_index(), Some(1));

        let mapping = ColumnMapping::new(["lesson", "room"]).unwrap();
        assert_eq!(mapping.class_index(), None);
    }

    #[test]
    fn default_matches_lookup() {
        let default = ColumnMapping::default();
        let looked_up = ColumnMapping::new(default.names().to_vec()).unwrap();
        assert_eq!(default, looked_up);
        assert_eq!(default.len(), 8);
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = ColumnMapping::new(["room", "class", "room"]).unwrap_err();
        assert!(matches!(err, DsbError::Config(_)));
    }

    #[test]
    fn extra_cells_get_synthetic_names() {
        let mapping = ColumnMapping::new(["lesson"]).unwrap();
        assert_eq!(mapping.attribute(0), "lesson");
        assert_eq!(mapping.attribute(3), "col3");
    }

    #[test]
    fn deserializes_from_list() {
        let mapping: ColumnMapping = serde_json::from_str(r#"["class", "lesson"]"#).unwrap();
        assert_eq!(mapping.class_index(), Some(0));

        let dup: std::result::Result<ColumnMapping, _> = serde_json::from_str(r#"["a", "a"]"#);
        assert!(dup.is_err());
    }
}
