use serde::Serialize;

use super::graph::RelationshipGraph;
use super::relationship::RelationshipType;
use super::store::GraphStore;

/// What the graph knows about a conversation, in the shape a persona prompt needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationContext {
    pub persona: String,
    pub talking_to: Option<String>,
    pub relationship: RelationshipType,
    /// Friend group members other than the persona itself, sorted by name
    pub friend_group: Vec<String>,
}

impl ConversationContext {
    pub fn build<S: GraphStore>(
        graph: &RelationshipGraph<S>,
        persona: &str,
        talking_to: Option<&str>,
    ) -> Self {
        let relationship = talking_to
            .map(|other| graph.get_relationship_type(persona, other))
            .unwrap_or(RelationshipType::Stranger);

        let mut friend_group: Vec<String> = graph
            .get_friend_group(persona)
            .into_iter()
            .filter(|name| name != persona)
            .collect();
        friend_group.sort();

        Self {
            persona: persona.to_string(),
            talking_to: talking_to.map(str::to_string),
            relationship,
            friend_group,
        }
    }

    /// Only present when the persona has at least one friend to mention.
    pub fn friend_group_line(&self) -> Option<String> {
        if self.friend_group.is_empty() {
            return None;
        }
        Some(format!(
            "Your friend group includes: {}",
            self.friend_group.join(", ")
        ))
    }
}
