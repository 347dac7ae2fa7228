//! The serialized tag-string boundary format.
//!
//! Tagged rows persist their category -> labels mapping as a single string:
//! `"<category>: <label1>, <label2>; <category2>: <label3>"`. Categories are
//! joined by `"; "`, labels by `", "`, and category/labels by `": "`. Both
//! the validator and the search scorer consume this format, so it must
//! round-trip: names containing any separator character are rejected at
//! serialization time (and at catalog load).

use crate::error::EngineError;
use crate::types::CategoryTags;

/// Separates category blocks.
pub const CATEGORY_SEP: char = ';';
/// Separates a category name from its labels.
pub const NAME_SEP: char = ':';
/// Separates labels within a category.
pub const LABEL_SEP: char = ',';

/// Serialize selected tags to the boundary string format.
///
/// Fails if any category or label contains a separator character, since the
/// result could not be parsed back into the same mapping.
pub fn format(tags: &[CategoryTags]) -> Result<String, EngineError> {
    let mut blocks = Vec::with_capacity(tags.len());
    for entry in tags {
        for name in std::iter::once(&entry.category).chain(&entry.labels) {
            if name.contains([CATEGORY_SEP, NAME_SEP, LABEL_SEP]) {
                return Err(EngineError::TagFormat {
                    message: format!("Name {name:?} contains a reserved separator character"),
                });
            }
        }
        blocks.push(format!("{}: {}", entry.category, entry.labels.join(", ")));
    }
    Ok(blocks.join("; "))
}

/// Parse a boundary tag string back into the category -> labels mapping.
///
/// Tolerant of surrounding whitespace; empty blocks are dropped.
pub fn parse(tag_string: &str) -> Vec<CategoryTags> {
    tag_string
        .split(CATEGORY_SEP)
        .filter_map(|block| {
            let block = block.trim();
            if block.is_empty() {
                return None;
            }
            let (category, labels) = block.split_once(NAME_SEP)?;
            let labels: Vec<String> = labels
                .split(LABEL_SEP)
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            Some(CategoryTags {
                category: category.trim().to_string(),
                labels,
            })
        })
        .collect()
}
