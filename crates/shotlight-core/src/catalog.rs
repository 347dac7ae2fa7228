//! Tag catalog loading.
//!
//! The catalog is a JSON object mapping category name to an ordered array of
//! tag labels. It is loaded once at startup and immutable thereafter. Order
//! matters twice over: category order drives reporting order, and label
//! order within a category is the tie-break index for top-k selection.

use std::path::Path;

use crate::error::EngineError;
use crate::tagstring::{CATEGORY_SEP, LABEL_SEP, NAME_SEP};

/// A named category with its ordered label list.
#[derive(Debug, Clone)]
pub struct TagCategory {
    pub name: String,
    pub labels: Vec<String>,
}

/// The full categorized tag vocabulary, immutable after load.
#[derive(Debug)]
pub struct TagCatalog {
    categories: Vec<TagCategory>,
}

impl TagCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// A missing or malformed catalog is fatal. Category and label names
    /// containing tag-string separator characters are rejected so the
    /// serialized boundary format round-trips. Empty categories are
    /// tolerated with a warning; they contribute no tags downstream.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Catalog {
            path: path.to_path_buf(),
            message: format!("Failed to read catalog: {e}"),
        })?;
        Self::from_json(&content).map_err(|message| EngineError::Catalog {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a catalog from a JSON string, preserving category order.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {e}"))?;
        let object = value
            .as_object()
            .ok_or_else(|| "Catalog root must be an object of category -> labels".to_string())?;

        let mut categories = Vec::with_capacity(object.len());
        for (name, labels_value) in object {
            let labels_array = labels_value
                .as_array()
                .ok_or_else(|| format!("Category {name:?} must map to an array of labels"))?;

            let mut labels = Vec::with_capacity(labels_array.len());
            for label_value in labels_array {
                let label = label_value
                    .as_str()
                    .ok_or_else(|| format!("Category {name:?} contains a non-string label"))?;
                check_separators(name, label)?;
                labels.push(label.to_string());
            }

            check_separators(name, name)?;
            if labels.is_empty() {
                tracing::warn!("Catalog category {:?} has no labels", name);
            }
            categories.push(TagCategory {
                name: name.clone(),
                labels,
            });
        }

        if categories.is_empty() {
            return Err("Catalog contains no categories".to_string());
        }

        let label_count: usize = categories.iter().map(|c| c.labels.len()).sum();
        tracing::info!(
            "Loaded tag catalog: {} categories, {} labels",
            categories.len(),
            label_count
        );

        Ok(Self { categories })
    }

    /// All categories, in catalog order.
    pub fn categories(&self) -> &[TagCategory] {
        &self.categories
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Flatten all labels into a single lower-cased candidate list.
    ///
    /// Category structure is discarded; this is the candidate set the search
    /// scorer matches queries against.
    pub fn flat_labels_lowercase(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.labels.iter())
            .map(|l| l.to_lowercase())
            .collect()
    }
}

fn check_separators(category: &str, name: &str) -> Result<(), String> {
    for sep in [CATEGORY_SEP, NAME_SEP, LABEL_SEP] {
        if name.contains(sep) {
            return Err(format!(
                "Name {name:?} in category {category:?} contains reserved separator {sep:?}"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "Camera Angle": ["low angle", "high angle", "eye level"],
        "Relational Expression": ["two people arguing", "two people", "arguing"]
    }"#;

    #[test]
    fn test_load_preserves_category_and_label_order() {
        let catalog = TagCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.categories()[0].name, "Camera Angle");
        assert_eq!(catalog.categories()[1].name, "Relational Expression");
        assert_eq!(
            catalog.categories()[0].labels,
            vec!["low angle", "high angle", "eye level"]
        );
    }

    #[test]
    fn test_flat_labels_lowercase() {
        let catalog = TagCatalog::from_json(r#"{"A": ["Close-Up"], "B": ["Two People"]}"#).unwrap();
        assert_eq!(
            catalog.flat_labels_lowercase(),
            vec!["close-up", "two people"]
        );
    }

    #[test]
    fn test_rejects_separator_in_label() {
        let err = TagCatalog::from_json(r#"{"A": ["good", "bad; label"]}"#).unwrap_err();
        assert!(err.contains("reserved separator"));
    }

    #[test]
    fn test_rejects_separator_in_category() {
        let err = TagCatalog::from_json(r#"{"A: B": ["label"]}"#).unwrap_err();
        assert!(err.contains("reserved separator"));
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(TagCatalog::from_json(r#"["not", "an", "object"]"#).is_err());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(TagCatalog::from_json("{}").is_err());
    }

    #[test]
    fn test_empty_category_tolerated() {
        let catalog = TagCatalog::from_json(r#"{"Empty": [], "Full": ["x"]}"#).unwrap();
        assert_eq!(catalog.categories()[0].labels.len(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tag_list.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{SAMPLE}").unwrap();

        let catalog = TagCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = TagCatalog::load(Path::new("/nonexistent/tag_list.json"));
        assert!(matches!(result, Err(EngineError::Catalog { .. })));
    }
}
