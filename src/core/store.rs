use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{GraphError, Result};
use super::persona::Persona;
use super::relationship::Relationship;

/// File name of the graph document inside a storage directory
pub const GRAPH_FILE: &str = "relationship_graph.json";

/// The full persisted graph: personas in insertion order plus relationship records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    pub personas: IndexMap<String, Persona>,
    pub relationships: Vec<Relationship>,
}

/// Where a relationship graph is loaded from and saved to.
pub trait GraphStore {
    /// Load the stored graph, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<GraphState>>;

    /// Replace the stored graph with `state`.
    fn save(&mut self, state: &GraphState) -> Result<()>;
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use `dir/relationship_graph.json`, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(GRAPH_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl GraphStore for JsonFileStore {
    fn load(&self) -> Result<Option<GraphState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored graph");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let state: GraphState = serde_json::from_str(&content).map_err(|e| {
            GraphError::Corrupt(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(
            path = %self.path.display(),
            personas = state.personas.len(),
            relationships = state.relationships.len(),
            "loaded graph"
        );
        Ok(Some(state))
    }

    fn save(&mut self, state: &GraphState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;

        // Write next to the target and rename over it so readers never see a partial file
        let temp = self.temp_path();
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), "saved graph");
        Ok(())
    }
}

/// Keeps the graph in process. Nothing survives the store being dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    saved: Option<GraphState>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already stored graph.
    pub fn with_state(state: GraphState) -> Self {
        Self {
            saved: Some(state),
            saves: 0,
        }
    }

    /// The last saved graph.
    pub fn snapshot(&self) -> Option<&GraphState> {
        self.saved.as_ref()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl GraphStore for InMemoryStore {
    fn load(&self) -> Result<Option<GraphState>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, state: &GraphState) -> Result<()> {
        self.saved = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}
