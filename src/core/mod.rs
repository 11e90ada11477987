pub mod context;
pub mod error;
pub mod graph;
pub mod persona;
pub mod relationship;
pub mod store;
pub mod timestamp;

pub use context::ConversationContext;
pub use error::{GraphError, Result};
pub use graph::{Friend, GraphStats, RelationshipGraph};
pub use persona::Persona;
pub use relationship::{PairKey, Relationship, RelationshipType};
pub use store::{GraphState, GraphStore, InMemoryStore, JsonFileStore};
