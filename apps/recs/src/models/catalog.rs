use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

fn default_min_level() -> i64 {
    1
}

fn default_kind() -> String {
    "game".to_string()
}

/// A knowledge node an activity exercises, with its relative weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWeight {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl NodeWeight {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: default_weight(),
        }
    }
}

/// A recommendable learning activity ("unit"). The loader produces exactly
/// one knowledge node per unit, but scoring accepts any number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityUnit {
    pub id: String,
    pub title: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Normalized to 1..=3.
    pub difficulty: u8,
    #[serde(default)]
    pub knowledge_nodes: Vec<NodeWeight>,
}

impl ActivityUnit {
    /// The node used for next-level selection.
    pub fn primary_node(&self) -> Option<&str> {
        self.knowledge_nodes.first().map(|kn| kn.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredKnowledge {
    /// Entries without a node are ignored by coverage.
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default = "default_min_level")]
    pub min_level: i64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub id: String,
    pub title: String,
    /// The gate: skill code → minimum level, in catalog order.
    #[serde(default)]
    pub min_skill_levels: IndexMap<String, i64>,
    #[serde(default)]
    pub required_knowledge: Vec<RequiredKnowledge>,
    /// Minimum covered weight for a full pass. 0 means no requirement.
    #[serde(default)]
    pub threshold: f64,
    /// `threshold` as written in the catalog, for evidence lines.
    #[serde(default)]
    pub threshold_text: String,
    #[serde(default)]
    pub discipline: Option<String>,
}

impl Career {
    /// The threshold the way the catalog spelled it (`2` and `2.0` stay distinct).
    pub fn threshold_label(&self) -> String {
        if self.threshold_text.is_empty() {
            self.threshold.to_string()
        } else {
            self.threshold_text.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub career_id: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Everything the engine scores against, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub units: Vec<ActivityUnit>,
    pub careers: Vec<Career>,
    pub videos: Vec<Video>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_career_defaults_when_fields_missing() {
        let career: Career = serde_json::from_value(json!({
            "id": "c1",
            "title": "Biologist",
            "required_knowledge": [{ "node": "BIO.Y7.cells" }]
        }))
        .unwrap();

        assert!(career.min_skill_levels.is_empty());
        assert_eq!(career.threshold, 0.0);
        assert_eq!(career.discipline, None);
        assert_eq!(career.required_knowledge[0].min_level, 1);
        assert_eq!(career.required_knowledge[0].weight, 1.0);
    }

    #[test]
    fn test_unit_primary_node_is_first() {
        let unit = ActivityUnit {
            id: "g1".to_string(),
            title: "Cells".to_string(),
            kind: default_kind(),
            difficulty: 1,
            knowledge_nodes: vec![NodeWeight::new("BIO.Y7.cells"), NodeWeight::new("BIO.Y7.organs")],
        };
        assert_eq!(unit.primary_node(), Some("BIO.Y7.cells"));
    }

    #[test]
    fn test_unit_without_nodes_has_no_primary() {
        let unit: ActivityUnit = serde_json::from_value(json!({
            "id": "g2",
            "title": "Free play",
            "difficulty": 2
        }))
        .unwrap();
        assert_eq!(unit.kind, "game");
        assert_eq!(unit.primary_node(), None);
    }
}
