use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use persona_graph::RelationshipType;

#[derive(Parser)]
#[command(name = "persona-graph")]
#[command(about = "Relationship graph for digital personas")]
#[command(version)]
pub struct Args {
    /// Data directory (defaults to $PERSONA_GRAPH_DIR, then the user config directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a persona (existing personas are left untouched)
    AddPersona {
        name: String,
        /// Metadata entry, KEY=VALUE; VALUE is read as JSON when it parses
        #[arg(long = "meta", value_parser = parse_meta)]
        meta: Vec<(String, Value)>,
    },
    /// Record interactions between two personas
    Interact {
        persona_a: String,
        persona_b: String,
        /// Number of interactions to record
        #[arg(long, default_value = "1")]
        times: u32,
    },
    /// List everyone a persona has a relationship with
    Friends {
        name: String,
        /// Only show relationships of this type (acquaintance, friend, close_friend, best_friend)
        #[arg(long = "type")]
        relationship_type: Option<RelationshipType>,
        #[arg(long)]
        json: bool,
    },
    /// Show the friend group a persona belongs to
    Group {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the relationship type between two personas
    Relationship {
        persona_a: String,
        persona_b: String,
    },
    /// List all personas
    Personas {
        #[arg(long)]
        json: bool,
    },
    /// Show graph statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Show the conversation context for a persona
    Context {
        persona: String,
        /// Who the persona is talking to
        #[arg(long = "with")]
        talking_to: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn parse_meta(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err("metadata key must not be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
