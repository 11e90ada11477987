use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::timestamp;

/// Interaction count a pair must exceed to become friends.
pub const FRIEND_THRESHOLD: u32 = 5;
/// Interaction count a pair must exceed to become close friends.
pub const CLOSE_FRIEND_THRESHOLD: u32 = 20;
/// Interaction count a pair must exceed to become best friends.
pub const BEST_FRIEND_THRESHOLD: u32 = 50;

/// Strength of a relationship, ordered from weakest to strongest.
///
/// Stored types only ever move forward through this order. `Stranger` is
/// never stored: it is what a lookup reports when no record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Stranger,
    Acquaintance,
    Friend,
    CloseFriend,
    BestFriend,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 5] = [
        RelationshipType::Stranger,
        RelationshipType::Acquaintance,
        RelationshipType::Friend,
        RelationshipType::CloseFriend,
        RelationshipType::BestFriend,
    ];

    /// Classify an interaction count.
    pub fn for_count(interaction_count: u32) -> Self {
        match interaction_count {
            n if n > BEST_FRIEND_THRESHOLD => RelationshipType::BestFriend,
            n if n > CLOSE_FRIEND_THRESHOLD => RelationshipType::CloseFriend,
            n if n > FRIEND_THRESHOLD => RelationshipType::Friend,
            _ => RelationshipType::Acquaintance,
        }
    }

    /// Whether an edge of this type links two members of a friend group.
    pub fn is_friendship(self) -> bool {
        matches!(
            self,
            RelationshipType::Friend | RelationshipType::CloseFriend | RelationshipType::BestFriend
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Stranger => "stranger",
            RelationshipType::Acquaintance => "acquaintance",
            RelationshipType::Friend => "friend",
            RelationshipType::CloseFriend => "close_friend",
            RelationshipType::BestFriend => "best_friend",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown relationship type: {}", s))
    }
}

/// Canonical key for an unordered pair of persona names.
///
/// The two names are stored sorted, so `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            PairKey(a.to_string(), b.to_string())
        } else {
            PairKey(b.to_string(), a.to_string())
        }
    }
}

/// A relationship record between two personas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub persona_a: String,
    pub persona_b: String,
    pub interaction_count: u32,
    #[serde(default, with = "timestamp::option")]
    pub last_interaction: Option<DateTime<Utc>>,
    pub relationship_type: RelationshipType,
}

impl Relationship {
    /// A fresh record: no interactions yet, acquaintances by default.
    pub fn new(persona_a: &str, persona_b: &str) -> Self {
        Self {
            persona_a: persona_a.to_string(),
            persona_b: persona_b.to_string(),
            interaction_count: 0,
            last_interaction: None,
            relationship_type: RelationshipType::Acquaintance,
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(&self.persona_a, &self.persona_b)
    }

    /// The persona on the other side of this relationship from `name`.
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.persona_a == name {
            Some(self.persona_b.as_str())
        } else if self.persona_b == name {
            Some(self.persona_a.as_str())
        } else {
            None
        }
    }

    /// Count one interaction at `now` and promote the type if a threshold was crossed.
    ///
    /// Returns true when the type changed.
    pub fn record(&mut self, now: DateTime<Utc>) -> bool {
        self.interaction_count = self.interaction_count.saturating_add(1);
        self.last_interaction = Some(now);

        let earned = RelationshipType::for_count(self.interaction_count);
        if earned > self.relationship_type {
            self.relationship_type = earned;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_count_thresholds() {
        assert_eq!(RelationshipType::for_count(0), RelationshipType::Acquaintance);
        assert_eq!(RelationshipType::for_count(5), RelationshipType::Acquaintance);
        assert_eq!(RelationshipType::for_count(6), RelationshipType::Friend);
        assert_eq!(RelationshipType::for_count(20), RelationshipType::Friend);
        assert_eq!(RelationshipType::for_count(21), RelationshipType::CloseFriend);
        assert_eq!(RelationshipType::for_count(50), RelationshipType::CloseFriend);
        assert_eq!(RelationshipType::for_count(51), RelationshipType::BestFriend);
    }

    #[test]
    fn test_is_friendship() {
        assert!(!RelationshipType::Stranger.is_friendship());
        assert!(!RelationshipType::Acquaintance.is_friendship());
        assert!(RelationshipType::Friend.is_friendship());
        assert!(RelationshipType::CloseFriend.is_friendship());
        assert!(RelationshipType::BestFriend.is_friendship());
    }

    #[test]
    fn test_labels() {
        for t in RelationshipType::ALL {
            assert_eq!(t.as_str().parse::<RelationshipType>().unwrap(), t);
            assert_eq!(
                serde_json::to_string(&t).unwrap(),
                format!("\"{}\"", t.as_str())
            );
        }
        assert!("frenemy".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(PairKey::new("Alice", "Bob"), PairKey::new("Bob", "Alice"));
        assert_ne!(PairKey::new("Alice", "Bob"), PairKey::new("alice", "Bob"));
    }

    #[test]
    fn test_other() {
        let rel = Relationship::new("Alice", "Bob");
        assert_eq!(rel.other("Alice"), Some("Bob"));
        assert_eq!(rel.other("Bob"), Some("Alice"));
        assert_eq!(rel.other("Carol"), None);
    }

    #[test]
    fn test_record_promotes() {
        let mut rel = Relationship::new("Alice", "Bob");
        let now = Utc::now();

        for _ in 0..5 {
            assert!(!rel.record(now));
        }
        assert_eq!(rel.relationship_type, RelationshipType::Acquaintance);

        assert!(rel.record(now));
        assert_eq!(rel.interaction_count, 6);
        assert_eq!(rel.relationship_type, RelationshipType::Friend);
        assert_eq!(rel.last_interaction, Some(now));
    }

    #[test]
    fn test_record_never_demotes() {
        let mut rel = Relationship::new("Alice", "Bob");
        rel.relationship_type = RelationshipType::BestFriend;

        rel.record(Utc::now());
        assert_eq!(rel.interaction_count, 1);
        assert_eq!(rel.relationship_type, RelationshipType::BestFriend);
    }
}
