use serde::{Deserialize, Serialize};

/// Render metadata attached to the finalized nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub node_type: String,
    pub edge_type: String,
    pub marker_type: String,
    pub father_color: String,
    pub mother_color: String,
    pub father_class: String,
    pub mother_class: String,
}

impl Theme {
    pub fn family_default() -> Self {
        Self {
            node_type: "familyNode".to_string(),
            edge_type: "smoothstep".to_string(),
            marker_type: "arrowclosed".to_string(),
            father_color: "#0d6efd".to_string(),
            mother_color: "#d63384".to_string(),
            father_class: "edge-father".to_string(),
            mother_class: "edge-mother".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::family_default()
    }
}
