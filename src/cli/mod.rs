use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use persona_graph::{Config, ConversationContext, RelationshipGraph, RelationshipType};

pub use commands::{Args, Commands};

mod commands;

fn open_graph(data_dir: Option<PathBuf>) -> Result<RelationshipGraph> {
    let config = Config::new(data_dir).context("Failed to resolve data directory")?;
    let dir = config.graph_dir();
    RelationshipGraph::open(&dir)
        .with_context(|| format!("Failed to open relationship graph in {}", dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run(args: Args) -> Result<()> {
    let data_dir = args.data_dir;

    match args.command {
        Commands::AddPersona { name, meta } => handle_add_persona(data_dir, &name, meta),
        Commands::Interact { persona_a, persona_b, times } => {
            handle_interact(data_dir, &persona_a, &persona_b, times)
        }
        Commands::Friends { name, relationship_type, json } => {
            handle_friends(data_dir, &name, relationship_type, json)
        }
        Commands::Group { name, json } => handle_group(data_dir, &name, json),
        Commands::Relationship { persona_a, persona_b } => {
            handle_relationship(data_dir, &persona_a, &persona_b)
        }
        Commands::Personas { json } => handle_personas(data_dir, json),
        Commands::Stats { json } => handle_stats(data_dir, json),
        Commands::Context { persona, talking_to, json } => {
            handle_context(data_dir, &persona, talking_to.as_deref(), json)
        }
    }
}

pub fn handle_add_persona(data_dir: Option<PathBuf>, name: &str, meta: Vec<(String, Value)>) -> Result<()> {
    let mut graph = open_graph(data_dir)?;
    let metadata = (!meta.is_empty()).then(|| meta.into_iter().collect::<Map<_, _>>());

    if graph.add_persona(name, metadata)? {
        println!("Added persona {}", name);
    } else {
        println!("Persona {} already exists", name);
    }
    Ok(())
}

pub fn handle_interact(data_dir: Option<PathBuf>, persona_a: &str, persona_b: &str, times: u32) -> Result<()> {
    let mut graph = open_graph(data_dir)?;

    for _ in 0..times {
        graph.record_interaction(persona_a, persona_b)?;
    }
    if times > 0 {
        graph.record_conversation(persona_a)?;
    }

    match graph.get_relationship(persona_a, persona_b) {
        Some(rel) => println!(
            "{} <-> {}: {} ({} interactions)",
            persona_a, persona_b, rel.relationship_type, rel.interaction_count
        ),
        None => println!("{} <-> {}: stranger", persona_a, persona_b),
    }
    Ok(())
}

pub fn handle_friends(
    data_dir: Option<PathBuf>,
    name: &str,
    relationship_type: Option<RelationshipType>,
    json: bool,
) -> Result<()> {
    let graph = open_graph(data_dir)?;
    let mut friends = graph.get_friends(name);
    if let Some(relationship_type) = relationship_type {
        friends.retain(|friend| friend.relationship_type == relationship_type);
    }

    if json {
        return print_json(&friends);
    }
    if friends.is_empty() {
        println!("No relationships found for {}.", name);
        return Ok(());
    }

    println!("Relationships of {} ({}):", name, friends.len());
    for friend in &friends {
        println!(
            "  {} - {} (Interactions: {})",
            friend.name, friend.relationship_type, friend.interactions
        );
    }
    Ok(())
}

pub fn handle_group(data_dir: Option<PathBuf>, name: &str, json: bool) -> Result<()> {
    let graph = open_graph(data_dir)?;
    let mut group = graph.get_friend_group(name);
    group.sort();

    if json {
        return print_json(&group);
    }
    println!("Friend group of {} ({}):", name, group.len());
    for member in &group {
        println!("  {}", member);
    }
    Ok(())
}

pub fn handle_relationship(data_dir: Option<PathBuf>, persona_a: &str, persona_b: &str) -> Result<()> {
    let graph = open_graph(data_dir)?;
    println!("{}", graph.get_relationship_type(persona_a, persona_b));
    Ok(())
}

pub fn handle_personas(data_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let graph = open_graph(data_dir)?;
    let personas = graph.get_all_personas();

    if json {
        return print_json(&personas);
    }
    if personas.is_empty() {
        println!("No personas found.");
        return Ok(());
    }
    for name in personas {
        println!("{}", name);
    }
    Ok(())
}

pub fn handle_stats(data_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let graph = open_graph(data_dir)?;
    let stats = graph.stats();

    if json {
        return print_json(&stats);
    }
    println!("Personas: {}", stats.total_personas);
    println!("Relationships: {}", stats.total_relationships);
    println!("Interactions: {}", stats.total_interactions);
    for (relationship_type, count) in &stats.by_type {
        println!("  {}: {}", relationship_type, count);
    }
    Ok(())
}

pub fn handle_context(data_dir: Option<PathBuf>, persona: &str, talking_to: Option<&str>, json: bool) -> Result<()> {
    let graph = open_graph(data_dir)?;
    let context = ConversationContext::build(&graph, persona, talking_to);

    if json {
        return print_json(&context);
    }
    println!("Persona: {}", context.persona);
    if let Some(other) = &context.talking_to {
        println!("Talking to: {}", other);
    }
    println!("Relationship: {}", context.relationship);
    if let Some(line) = context.friend_group_line() {
        println!("{}", line);
    }
    Ok(())
}
