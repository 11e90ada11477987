use chrono::Utc;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use super::error::{GraphError, Result};
use super::persona::Persona;
use super::relationship::{PairKey, Relationship, RelationshipType};
use super::store::{GraphState, GraphStore, JsonFileStore};

/// A persona seen from the other side of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Friend {
    pub name: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub interactions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_personas: usize,
    pub total_relationships: usize,
    pub total_interactions: u64,
    pub by_type: BTreeMap<RelationshipType, usize>,
}

/// Personas and the relationships between them, mirrored to a store on every change.
pub struct RelationshipGraph<S: GraphStore = JsonFileStore> {
    store: S,
    state: GraphState,
    /// Position of each pair's record in `state.relationships`
    index: HashMap<PairKey, usize>,
}

impl RelationshipGraph<JsonFileStore> {
    /// Open (or start) the graph stored in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_store(JsonFileStore::new(dir)?)
    }
}

impl<S: GraphStore> RelationshipGraph<S> {
    pub fn with_store(store: S) -> Result<Self> {
        let state = store.load()?.unwrap_or_default();

        let mut index = HashMap::with_capacity(state.relationships.len());
        for (position, rel) in state.relationships.iter().enumerate() {
            if index.insert(rel.key(), position).is_some() {
                return Err(GraphError::Corrupt(format!(
                    "duplicate relationship between {} and {}",
                    rel.persona_a, rel.persona_b
                )));
            }
        }

        Ok(Self { store, state, index })
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a persona unless it already exists. Returns whether it was added.
    ///
    /// An existing persona keeps its creation time, metadata and counters.
    /// If the graph cannot be saved the persona is not added.
    pub fn add_persona(&mut self, name: &str, metadata: Option<Map<String, Value>>) -> Result<bool> {
        if !self.insert_persona(name, metadata) {
            return Ok(false);
        }

        if let Err(e) = self.save() {
            self.state.personas.shift_remove(name);
            return Err(e);
        }
        Ok(true)
    }

    /// Count one interaction between `persona_a` and `persona_b`.
    ///
    /// Both personas and the relationship record are created on first use.
    /// A persona may interact with itself; the pair is then recorded as a loop.
    /// If the graph cannot be saved nothing is changed.
    pub fn record_interaction(&mut self, persona_a: &str, persona_b: &str) -> Result<&Relationship> {
        let added_a = self.insert_persona(persona_a, None);
        let added_b = self.insert_persona(persona_b, None);

        let key = PairKey::new(persona_a, persona_b);
        let (position, previous) = match self.index.get(&key) {
            Some(&position) => (position, Some(self.state.relationships[position].clone())),
            None => {
                self.state
                    .relationships
                    .push(Relationship::new(persona_a, persona_b));
                let position = self.state.relationships.len() - 1;
                self.index.insert(key.clone(), position);
                (position, None)
            }
        };

        let rel = &mut self.state.relationships[position];
        let before = rel.relationship_type;
        let promoted = rel.record(Utc::now());

        if let Err(e) = self.save() {
            match previous {
                Some(previous) => self.state.relationships[position] = previous,
                None => {
                    self.state.relationships.pop();
                    self.index.remove(&key);
                }
            }
            if added_b {
                self.state.personas.shift_remove(persona_b);
            }
            if added_a {
                self.state.personas.shift_remove(persona_a);
            }
            warn!(persona_a, persona_b, error = %e, "interaction not saved, rolled back");
            return Err(e);
        }

        let rel = &self.state.relationships[position];
        if promoted {
            info!(
                persona_a = %rel.persona_a,
                persona_b = %rel.persona_b,
                from = %before,
                to = %rel.relationship_type,
                interactions = rel.interaction_count,
                "relationship promoted"
            );
        }
        Ok(rel)
    }

    /// Count one conversation for `name`, adding the persona if needed.
    /// Returns the new total. If the graph cannot be saved nothing is changed.
    pub fn record_conversation(&mut self, name: &str) -> Result<u64> {
        let added = self.insert_persona(name, None);
        let persona = &mut self.state.personas[name];
        persona.total_conversations += 1;
        let total = persona.total_conversations;

        if let Err(e) = self.save() {
            if added {
                self.state.personas.shift_remove(name);
            } else {
                self.state.personas[name].total_conversations -= 1;
            }
            return Err(e);
        }
        Ok(total)
    }

    /// Everyone `name` has a relationship with, in order of first interaction.
    pub fn get_friends(&self, name: &str) -> Vec<Friend> {
        self.state
            .relationships
            .iter()
            .filter_map(|rel| {
                rel.other(name).map(|other| Friend {
                    name: other.to_string(),
                    relationship_type: rel.relationship_type,
                    interactions: rel.interaction_count,
                })
            })
            .collect()
    }

    /// `name` plus every persona reachable from it over friend, close friend
    /// or best friend relationships. Callers should treat the order as unspecified.
    pub fn get_friend_group(&self, name: &str) -> Vec<String> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for rel in self
            .state
            .relationships
            .iter()
            .filter(|rel| rel.relationship_type.is_friendship())
        {
            adjacency.entry(&rel.persona_a).or_default().push(&rel.persona_b);
            adjacency.entry(&rel.persona_b).or_default().push(&rel.persona_a);
        }

        let mut group: IndexSet<&str> = IndexSet::new();
        let mut stack = vec![name];
        while let Some(current) = stack.pop() {
            if !group.insert(current) {
                continue;
            }
            if let Some(neighbours) = adjacency.get(current) {
                stack.extend(neighbours.iter().rev().filter(|n| !group.contains(**n)));
            }
        }

        group.into_iter().map(str::to_string).collect()
    }

    pub fn get_relationship(&self, persona_a: &str, persona_b: &str) -> Option<&Relationship> {
        self.index
            .get(&PairKey::new(persona_a, persona_b))
            .map(|&position| &self.state.relationships[position])
    }

    /// The stored type for the pair, or `Stranger` if they have never interacted.
    pub fn get_relationship_type(&self, persona_a: &str, persona_b: &str) -> RelationshipType {
        self.get_relationship(persona_a, persona_b)
            .map(|rel| rel.relationship_type)
            .unwrap_or(RelationshipType::Stranger)
    }

    pub fn get_persona(&self, name: &str) -> Option<&Persona> {
        self.state.personas.get(name)
    }

    /// All persona names in the order they were added.
    pub fn get_all_personas(&self) -> Vec<&str> {
        self.state.personas.keys().map(String::as_str).collect()
    }

    pub fn stats(&self) -> GraphStats {
        let mut by_type: BTreeMap<RelationshipType, usize> = RelationshipType::ALL
            .into_iter()
            .filter(|t| *t != RelationshipType::Stranger)
            .map(|t| (t, 0))
            .collect();
        for rel in &self.state.relationships {
            *by_type.entry(rel.relationship_type).or_insert(0) += 1;
        }

        GraphStats {
            total_personas: self.state.personas.len(),
            total_relationships: self.state.relationships.len(),
            total_interactions: self
                .state
                .relationships
                .iter()
                .map(|rel| u64::from(rel.interaction_count))
                .sum(),
            by_type,
        }
    }

    fn insert_persona(&mut self, name: &str, metadata: Option<Map<String, Value>>) -> bool {
        if self.state.personas.contains_key(name) {
            return false;
        }

        debug!(persona = name, "adding persona");
        self.state
            .personas
            .insert(name.to_string(), Persona::new(metadata));
        true
    }

    fn save(&mut self) -> Result<()> {
        self.store.save(&self.state)
    }
}
