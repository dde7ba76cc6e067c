use crate::error::AnalyticsError;
use crate::types::{Actor, Message};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A loaded chat: its participants and their messages in send order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Participants in canonical order. Derived from the messages when the
    /// export carries no actor list.
    #[serde(default)]
    pub actors: Vec<Actor>,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(actors: Vec<Actor>, messages: Vec<Message>) -> Self {
        Self { actors, messages }
    }

    /// Build a chat whose actors are listed in first-seen order.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let mut chat = Self {
            actors: Vec::new(),
            messages,
        };
        chat.derive_actors();
        chat
    }

    fn derive_actors(&mut self) {
        let mut seen: HashSet<&str> = self.actors.iter().map(|a| a.id.as_str()).collect();
        let mut derived = Vec::new();
        for msg in &self.messages {
            if seen.insert(msg.actor.as_str()) {
                derived.push(Actor::new(msg.actor.clone()));
            }
        }
        self.actors.extend(derived);
    }

    /// Fail if an actor id appears more than once in the actor list.
    pub fn check_actors(&self) -> Result<(), AnalyticsError> {
        let mut seen = HashSet::new();
        match self.actors.iter().find(|a| !seen.insert(a.id.as_str())) {
            Some(dup) => Err(AnalyticsError::DuplicateActor(dup.id.clone())),
            None => Ok(()),
        }
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// The actor's own messages, in chat order.
    pub fn actor_messages(&self, id: &str) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.actor == id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Load a chat export from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, AnalyticsError> {
        let json = std::fs::read_to_string(path)?;
        let mut chat: Self = serde_json::from_str(&json)?;
        chat.check_actors()?;
        chat.derive_actors();
        tracing::debug!(
            "Loaded chat from {}: {} messages, {} actors",
            path.display(),
            chat.messages.len(),
            chat.actors.len()
        );
        Ok(chat)
    }

    /// Write the chat to a JSON file.
    pub fn save_to(&self, path: &Path) -> Result<(), AnalyticsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
