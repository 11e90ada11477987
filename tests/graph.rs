use persona_graph::{GraphError, RelationshipGraph, RelationshipType};
use serde_json::{json, Map, Value};
use std::fs;

fn meta(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

#[test]
fn test_reopen_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let before = {
        let mut graph = RelationshipGraph::open(dir.path()).unwrap();
        graph.add_persona("Zed", Some(meta("created_from", json!("Alice")))).unwrap();
        for _ in 0..6 {
            graph.record_interaction("Alice", "Bob").unwrap();
        }
        graph.record_interaction("Bob", "Carol").unwrap();
        graph.record_conversation("Alice").unwrap();
        graph.state().clone()
    };

    let graph = RelationshipGraph::open(dir.path()).unwrap();
    assert_eq!(graph.state(), &before);
    assert_eq!(graph.get_all_personas(), vec!["Zed", "Alice", "Bob", "Carol"]);
    assert_eq!(graph.get_relationship_type("Bob", "Alice"), RelationshipType::Friend);
    assert_eq!(graph.get_persona("Alice").unwrap().total_conversations, 1);
    assert_eq!(graph.get_persona("Zed").unwrap().metadata["created_from"], "Alice");
}

#[test]
fn test_stored_document_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut graph = RelationshipGraph::open(dir.path()).unwrap();
    graph.record_interaction("Alice", "Bob").unwrap();

    let raw = fs::read_to_string(dir.path().join("relationship_graph.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();

    let top: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(top.len(), 2);
    assert!(value["personas"]["Alice"]["created_at"].is_string());
    assert_eq!(value["personas"]["Bob"]["total_conversations"], 0);
    assert_eq!(value["personas"]["Bob"]["metadata"], json!({}));

    let rel = &value["relationships"][0];
    assert_eq!(rel["persona_a"], "Alice");
    assert_eq!(rel["persona_b"], "Bob");
    assert_eq!(rel["interaction_count"], 1);
    assert_eq!(rel["relationship_type"], "acquaintance");
    assert!(rel["last_interaction"].is_string());
}

#[test]
fn test_loads_existing_store() {
    let dir = tempfile::tempdir().unwrap();
    let document = r#"{
  "personas": {
    "Zed": {"created_at": "2024-05-02T09:14:11.402113", "metadata": {}, "total_conversations": 0},
    "Bob": {"created_at": "2024-05-02T09:14:11.402987", "metadata": {}, "total_conversations": 0},
    "Alice": {"created_at": "2024-05-02T09:20:40.118004", "metadata": {"created_from": "Zed"}, "total_conversations": 0}
  },
  "relationships": [
    {
      "persona_a": "Zed",
      "persona_b": "Bob",
      "interaction_count": 20,
      "last_interaction": "2024-05-03T21:02:19.550210",
      "relationship_type": "friend"
    },
    {
      "persona_a": "Alice",
      "persona_b": "Bob",
      "interaction_count": 0,
      "last_interaction": null,
      "relationship_type": "acquaintance"
    }
  ]
}"#;
    fs::write(dir.path().join("relationship_graph.json"), document).unwrap();

    let mut graph = RelationshipGraph::open(dir.path()).unwrap();
    assert_eq!(graph.get_all_personas(), vec!["Zed", "Bob", "Alice"]);
    assert!(graph.get_relationship("Bob", "Alice").unwrap().last_interaction.is_none());

    let rel = graph.record_interaction("Bob", "Zed").unwrap();
    assert_eq!(rel.interaction_count, 21);
    assert_eq!(rel.relationship_type, RelationshipType::CloseFriend);
    assert_eq!(graph.state().relationships.len(), 2);

    let reopened = RelationshipGraph::open(dir.path()).unwrap();
    assert_eq!(reopened.get_all_personas(), vec!["Zed", "Bob", "Alice"]);
}

#[test]
fn test_malformed_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("relationship_graph.json"), "not json").unwrap();

    assert!(matches!(
        RelationshipGraph::open(dir.path()),
        Err(GraphError::Corrupt(_))
    ));
}

#[test]
fn test_friend_group_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut graph = RelationshipGraph::open(dir.path()).unwrap();
        for _ in 0..6 {
            graph.record_interaction("Alice", "Bob").unwrap();
            graph.record_interaction("Bob", "Carol").unwrap();
        }
        graph.record_interaction("Carol", "Dave").unwrap();
    }

    let graph = RelationshipGraph::open(dir.path()).unwrap();
    let mut group = graph.get_friend_group("Carol");
    group.sort();
    assert_eq!(group, vec!["Alice", "Bob", "Carol"]);
    assert_eq!(graph.get_friend_group("Dave"), vec!["Dave".to_string()]);
    assert!(graph.get_friends("Eve").is_empty());
}
