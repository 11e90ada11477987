//! Relationship graph for digital persona simulation.
//!
//! Personas are created the first time they are mentioned. Every recorded
//! interaction between two personas strengthens their relationship, and
//! relationships of friend strength or above link personas into friend groups.
//!
//! ```no_run
//! use persona_graph::RelationshipGraph;
//!
//! let mut graph = RelationshipGraph::open("./relationships")?;
//! graph.record_interaction("Alice", "Bob")?;
//! println!("{}", graph.get_relationship_type("Bob", "Alice"));
//! # Ok::<(), persona_graph::GraphError>(())
//! ```

pub mod config;
pub mod core;

pub use crate::config::Config;
pub use crate::core::{
    ConversationContext, Friend, GraphError, GraphState, GraphStats, GraphStore, InMemoryStore,
    JsonFileStore, PairKey, Persona, Relationship, RelationshipGraph, RelationshipType, Result,
};
