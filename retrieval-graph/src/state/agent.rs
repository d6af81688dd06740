//! Top-level graph state, its delta type, and the reducer that merges them.

use serde::{Deserialize, Serialize};

use crate::channels::StateUpdater;
use crate::message::Message;

use super::{Document, Router};

/// State of one conversational turn through the retrieval graph.
///
/// `messages` and `documents` only ever grow; `router` is written at most once
/// per run; `plan_steps` shrinks by one per research iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Conversation history (User and Assistant turns).
    pub messages: Vec<Message>,
    /// Routing decision; `None` until the router runs unless the caller pre-seeds it.
    #[serde(default)]
    pub router: Option<Router>,
    /// Research steps not yet executed; the head is the next one.
    #[serde(default)]
    pub plan_steps: Vec<String>,
    /// Documents accumulated across all completed research steps, in step order.
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl AgentState {
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Pre-seeds the router; a router with non-empty logic skips classification.
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Content of the final assistant message, if the run produced one.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(c) => Some(c.as_str()),
            _ => None,
        })
    }
}

/// Partial update returned by a top-level node.
///
/// Fields left at their default mean "no change".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentUpdate {
    /// Appended to `AgentState::messages`.
    pub messages: Vec<Message>,
    /// Written to `AgentState::router` only if no router is set yet.
    pub router: Option<Router>,
    /// Replaces `AgentState::plan_steps` when `Some`.
    pub plan_steps: Option<Vec<String>>,
    /// Appended to `AgentState::documents`.
    pub documents: Vec<Document>,
}

impl AgentUpdate {
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
            ..Default::default()
        }
    }

    pub fn router(router: Router) -> Self {
        Self {
            router: Some(router),
            ..Default::default()
        }
    }

    pub fn plan_steps(steps: Vec<String>) -> Self {
        Self {
            plan_steps: Some(steps),
            ..Default::default()
        }
    }
}

/// Merges [`AgentUpdate`]s into [`AgentState`], one named rule per field.
#[derive(Debug, Clone, Default)]
pub struct AgentStateReducer;

impl AgentStateReducer {
    pub fn append_messages(current: &mut Vec<Message>, update: Vec<Message>) {
        current.extend(update);
    }

    /// First write wins. A router without logic counts as unset, so the router
    /// node may still replace an empty pre-seed.
    pub fn set_router_once(current: &mut Option<Router>, update: Option<Router>) {
        let Some(update) = update else { return };
        match current {
            Some(existing) if existing.is_set() => {
                if *existing != update {
                    tracing::debug!(
                        kept = %existing.route_type,
                        ignored = %update.route_type,
                        "router already set; ignoring update"
                    );
                }
            }
            _ => *current = Some(update),
        }
    }

    pub fn replace_plan_steps(current: &mut Vec<String>, update: Option<Vec<String>>) {
        if let Some(steps) = update {
            *current = steps;
        }
    }

    pub fn append_documents(current: &mut Vec<Document>, update: Vec<Document>) {
        current.extend(update);
    }
}

impl StateUpdater<AgentState, AgentUpdate> for AgentStateReducer {
    fn apply_update(&self, current: &mut AgentState, update: AgentUpdate) {
        Self::append_messages(&mut current.messages, update.messages);
        Self::set_router_once(&mut current.router, update.router);
        Self::replace_plan_steps(&mut current.plan_steps, update.plan_steps);
        Self::append_documents(&mut current.documents, update.documents);
    }
}
