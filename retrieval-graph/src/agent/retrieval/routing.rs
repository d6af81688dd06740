//! Routing functions for the conditional edges.

use crate::error::AgentError;
use crate::state::{AgentState, RouteType};

use super::{
    ASK_FOR_MORE_INFO, CONDUCT_RESEARCH, CREATE_RESEARCH_PLAN, RESPOND, RESPOND_TO_GENERAL_QUERY,
};

/// Picks the branch after classification.
///
/// A missing router or a route type outside the three known categories is
/// [`AgentError::UnknownRoute`].
pub fn route_query(state: &AgentState) -> Result<String, AgentError> {
    let router = state
        .router
        .as_ref()
        .ok_or_else(|| AgentError::UnknownRoute("<unset>".into()))?;
    let next = match &router.route_type {
        RouteType::MoreInfo => ASK_FOR_MORE_INFO,
        RouteType::General => RESPOND_TO_GENERAL_QUERY,
        RouteType::Langchain => CREATE_RESEARCH_PLAN,
        RouteType::Other(other) => return Err(AgentError::UnknownRoute(other.clone())),
    };
    Ok(next.to_string())
}

/// Loops through `conduct_research` while plan steps remain, then `respond`.
pub fn check_finished(state: &AgentState) -> Result<String, AgentError> {
    Ok(if state.plan_steps.is_empty() {
        RESPOND
    } else {
        CONDUCT_RESEARCH
    }
    .to_string())
}
