//! Routing decision produced by the query router.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The classifier's category for the latest user message.
///
/// `Other` only appears when a caller pre-seeds a router with a value outside
/// the three known categories; routing then fails with `UnknownRoute`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteType {
    /// The question is about the library but lacks detail; ask the user.
    MoreInfo,
    /// The question is about the library; research it.
    Langchain,
    /// Anything else; answer politely without research.
    General,
    Other(String),
}

impl RouteType {
    pub fn as_str(&self) -> &str {
        match self {
            RouteType::MoreInfo => "more-info",
            RouteType::Langchain => "langchain",
            RouteType::General => "general",
            RouteType::Other(s) => s,
        }
    }
}

impl From<&str> for RouteType {
    fn from(s: &str) -> Self {
        match s {
            "more-info" => RouteType::MoreInfo,
            "langchain" => RouteType::Langchain,
            "general" => RouteType::General,
            other => RouteType::Other(other.to_string()),
        }
    }
}

impl From<String> for RouteType {
    fn from(s: String) -> Self {
        RouteType::from(s.as_str())
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RouteType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RouteType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RouteType::from)
    }
}

/// Classification of the latest user message plus the model's reasoning.
///
/// `logic` doubles as instructions for the clarification and general-answer
/// responders, which receive it in their system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    #[serde(rename = "type")]
    pub route_type: RouteType,
    #[serde(default)]
    pub logic: String,
}

impl Router {
    pub fn new(route_type: RouteType, logic: impl Into<String>) -> Self {
        Self {
            route_type,
            logic: logic.into(),
        }
    }

    /// True once the router carries reasoning. A set router bypasses classification
    /// and is never overwritten for the rest of the run.
    pub fn is_set(&self) -> bool {
        !self.logic.is_empty()
    }
}
