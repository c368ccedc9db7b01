//! Builds the instruction turn sent ahead of every conversation.
//!
//! Assembly is deterministic: the same knowledge base and the same `now`
//! always produce the same string. Nothing is cached between calls, so the
//! day, time and open/closed status are always current.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use relaybot_config::{AppConfig, ConfigError};
use relaybot_core::knowledge::KnowledgeBase;
use relaybot_core::schedule::WeeklySchedule;

use super::calendar::{capitalize, day_name, status_word};

/// Combines the persona prompt, the knowledge base and the schedule verdict.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    persona_prompt: String,
    business_name: String,
    location: String,
    knowledge: Arc<KnowledgeBase>,
    schedule: WeeklySchedule,
}

impl ContextAssembler {
    pub fn new(
        persona_prompt: impl Into<String>,
        business_name: impl Into<String>,
        location: impl Into<String>,
        knowledge: Arc<KnowledgeBase>,
        schedule: WeeklySchedule,
    ) -> Self {
        Self {
            persona_prompt: persona_prompt.into(),
            business_name: business_name.into(),
            location: location.into(),
            knowledge,
            schedule,
        }
    }

    /// Build from the `[assistant]` and `[business]` sections.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let business = &config.business;
        Ok(Self::new(
            config.assistant.persona_prompt.clone(),
            business.name.clone(),
            business.location.clone(),
            Arc::new(business.knowledge_base()?),
            business.weekly_schedule()?,
        ))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// The knowledge block: intro, one `- Topic: fact` line per entry, usage note.
    pub fn render_knowledge(&self) -> String {
        let mut out = format!(
            "Aquí tienes información de referencia sobre {} que puedes usar para responder:\n",
            self.business_name
        );
        for entry in self.knowledge.iter() {
            let _ = writeln!(out, "- {}: {}", capitalize(&entry.topic), entry.fact);
        }
        out.push_str("\nUsa esta información solo si aplica a la pregunta del usuario.\n");
        out
    }

    /// Knowledge block followed by the current day, time and open/closed status.
    ///
    /// `now` must be in the business's zone.
    pub fn build_context(&self, now: &DateTime<Tz>) -> String {
        let mut out = self.render_knowledge();
        let _ = write!(
            out,
            "\nHoy es {} en {}, y son las {}.\n\
             El local está actualmente **{}**.\n\
             Si el usuario pregunta si están abiertos, responde según este estado actual. \
             No inventes ni supongas horarios distintos.\n",
            day_name(now.weekday()),
            self.location,
            now.format("%H:%M"),
            status_word(self.schedule.is_open(now)),
        );
        out
    }

    /// Persona prompt and assembled context, as one instruction turn.
    pub fn system_prompt(&self, now: &DateTime<Tz>) -> String {
        format!("{}\n\n{}", self.persona_prompt, self.build_context(now))
    }
}
