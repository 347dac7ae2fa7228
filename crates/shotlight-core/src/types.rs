//! Core data types for the Shotlight tagging and search engine.

use serde::{Deserialize, Serialize};

use crate::tagstring;

/// A structured shot description, produced by the upstream PDF extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Shot identifier (e.g., "3.4")
    pub id: String,

    /// Title of the shot
    pub shot_title: String,

    /// Prose description of the shot
    pub description: String,
}

/// Selected labels for one catalog category, in descending-similarity order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTags {
    pub category: String,
    pub labels: Vec<String>,
}

/// Structured tagging output for one image variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingResult {
    /// Variant id (record id plus variant suffix, e.g., "3.4a")
    pub id: String,

    /// Selected labels per category, in catalog category order
    pub tags: Vec<CategoryTags>,
}

/// The persisted tagging row: one line per image variant.
///
/// `tags` carries the serialized boundary format consumed by both the
/// validator and the search scorer (see [`crate::tagstring`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedShot {
    pub id: String,
    pub shot_title: String,
    pub description: String,
    pub tags: String,
}

impl TaggedShot {
    /// Parse the serialized tag string back into the structured mapping.
    pub fn parsed_tags(&self) -> Vec<CategoryTags> {
        tagstring::parse(&self.tags)
    }
}

/// A label flagged by the validator, with its similarity score retained so
/// consumers can re-threshold without recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreliableTag {
    pub category: String,
    pub label: String,
    pub score: f32,
}

impl UnreliableTag {
    /// Render as the boundary form `"<category>: <label> (score=<2-decimal>)"`.
    pub fn format(&self) -> String {
        format!("{}: {} (score={:.2})", self.category, self.label, self.score)
    }
}

/// Structured validation output for one tagged image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub id: String,
    pub unreliable: Vec<UnreliableTag>,
}

impl ValidationResult {
    /// Convert to the persisted row format.
    pub fn to_record(&self) -> ValidationRecord {
        let unreliable_tags = self
            .unreliable
            .iter()
            .map(UnreliableTag::format)
            .collect::<Vec<_>>()
            .join("; ");
        ValidationRecord {
            id: self.id.clone(),
            unreliable_tags,
        }
    }
}

/// The persisted validation row. An empty `unreliable_tags` string means
/// every tag cleared the validator (a result, not an error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: String,
    pub unreliable_tags: String,
}

/// A ranked search hit over the tagged corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub shot_title: String,

    /// Number of query-matched tags present in this row's tag string
    pub score: usize,

    /// The row's serialized tag string, echoed for display
    pub tags: String,
}

/// Accounting for a batch run (tagging or validation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Images processed successfully
    pub processed: usize,

    /// Images skipped because the file was absent
    pub skipped_missing: usize,

    /// Images that failed to decode
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_shot_roundtrip_json() {
        let row = TaggedShot {
            id: "3.4a".to_string(),
            shot_title: "The Reveal".to_string(),
            description: "Two characters face off across a table.".to_string(),
            tags: "Relational Expression: two people, arguing".to_string(),
        };
        let json = serde_json::to_string(&row).unwrap();
        let parsed: TaggedShot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "3.4a");
        assert_eq!(parsed.tags, row.tags);
    }

    #[test]
    fn test_tagged_shot_parsed_tags() {
        let row = TaggedShot {
            id: "1.1a".to_string(),
            shot_title: "t".to_string(),
            description: "d".to_string(),
            tags: "Camera Angle: low angle; Relational Expression: two people, arguing"
                .to_string(),
        };
        let tags = row.parsed_tags();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].labels, vec!["two people", "arguing"]);
    }

    #[test]
    fn test_unreliable_tag_format_two_decimals() {
        let tag = UnreliableTag {
            category: "Camera Angle".to_string(),
            label: "high angle".to_string(),
            score: 0.1234,
        };
        assert_eq!(tag.format(), "Camera Angle: high angle (score=0.12)");
    }

    #[test]
    fn test_validation_result_to_record_joins_entries() {
        let result = ValidationResult {
            id: "2.1".to_string(),
            unreliable: vec![
                UnreliableTag {
                    category: "A".to_string(),
                    label: "x".to_string(),
                    score: 0.1,
                },
                UnreliableTag {
                    category: "B".to_string(),
                    label: "y".to_string(),
                    score: 0.2,
                },
            ],
        };
        let record = result.to_record();
        assert_eq!(record.unreliable_tags, "A: x (score=0.10); B: y (score=0.20)");
    }

    #[test]
    fn test_validation_result_empty_is_empty_string() {
        let result = ValidationResult {
            id: "2.1".to_string(),
            unreliable: vec![],
        };
        assert_eq!(result.to_record().unreliable_tags, "");
    }
}
