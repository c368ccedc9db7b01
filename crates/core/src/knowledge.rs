//! The business knowledge base: an immutable, ordered topic → fact table.

use crate::error::ProfileError;
use crate::schedule::WeeklySchedule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single canned fact the assistant may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: String,
    pub fact: String,
}

/// Where an entry's fact comes from when the knowledge base is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactSource {
    /// Literal text
    Text(String),
    /// Rendered from the weekly schedule at initialization
    Schedule,
}

/// Ordered, immutable collection of [`KnowledgeEntry`] with unique topics.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self, ProfileError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.topic.as_str()) {
                return Err(ProfileError::DuplicateTopic(entry.topic.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Build from definitions, rendering schedule-derived facts once.
    pub fn resolve(
        definitions: impl IntoIterator<Item = (String, FactSource)>,
        schedule: &WeeklySchedule,
    ) -> Result<Self, ProfileError> {
        let schedule_text = schedule.render_text();
        let entries = definitions
            .into_iter()
            .map(|(topic, source)| KnowledgeEntry {
                topic,
                fact: match source {
                    FactSource::Text(text) => text,
                    FactSource::Schedule => schedule_text.clone(),
                },
            })
            .collect();
        Self::new(entries)
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn get(&self, topic: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.topic == topic)
            .map(|e| e.fact.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<(String, FactSource)> {
        vec![
            ("ubicacion".into(), FactSource::Text("Avenida Siempre Viva 742".into())),
            ("horarios".into(), FactSource::Schedule),
            ("carta".into(), FactSource::Text("Ver la web".into())),
        ]
    }

    #[test]
    fn schedule_fact_is_rendered() {
        let schedule = WeeklySchedule::default();
        let kb = KnowledgeBase::resolve(defs(), &schedule).unwrap();
        assert_eq!(kb.get("horarios"), Some(schedule.render_text().as_str()));
    }

    #[test]
    fn preserves_definition_order() {
        let kb = KnowledgeBase::resolve(defs(), &WeeklySchedule::default()).unwrap();
        let topics: Vec<&str> = kb.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, ["ubicacion", "horarios", "carta"]);
        assert_eq!(kb.len(), 3);
    }

    #[test]
    fn duplicate_topics_rejected() {
        let entries = vec![
            KnowledgeEntry {
                topic: "carta".into(),
                fact: "a".into(),
            },
            KnowledgeEntry {
                topic: "carta".into(),
                fact: "b".into(),
            },
        ];
        assert_eq!(
            KnowledgeBase::new(entries).unwrap_err(),
            ProfileError::DuplicateTopic("carta".into())
        );
    }

    #[test]
    fn unknown_topic_is_none() {
        let kb = KnowledgeBase::default();
        assert!(kb.is_empty());
        assert!(kb.get("horarios").is_none());
    }
}
