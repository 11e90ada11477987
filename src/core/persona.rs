use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp;

/// A named participant in the relationship graph.
///
/// The name itself is the key in the graph's persona map and is not repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Free-form attributes supplied when the persona was added
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Number of conversations this persona has taken part in
    #[serde(default)]
    pub total_conversations: u64,
}

impl Persona {
    pub fn new(metadata: Option<Map<String, Value>>) -> Self {
        Self {
            created_at: Utc::now(),
            metadata: metadata.unwrap_or_default(),
            total_conversations: 0,
        }
    }
}
