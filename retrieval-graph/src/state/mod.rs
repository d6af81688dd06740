//! State types for the retrieval graph.
//!
//! # Main types
//!
//! - [`AgentState`]: what the top-level graph carries between nodes: the
//!   conversation, the routing decision, the remaining research plan and the
//!   documents collected so far.
//! - [`AgentUpdate`]: the delta a top-level node returns. [`AgentStateReducer`]
//!   folds it into [`AgentState`] field by field.
//! - [`Router`] / [`RouteType`]: the classifier's decision.
//! - [`Document`]: one retrieved chunk with its source.
//! - [`ResearcherState`]: the research sub-workflow's own state.
//!
//! # Example
//!
//! ```rust
//! use retrieval_graph::{AgentState, Message};
//!
//! let state = AgentState::from_messages(vec![Message::user("How do I add memory?")]);
//! assert!(state.router.is_none());
//! ```

mod agent;
mod document;
mod researcher;
mod router;

pub use agent::{AgentState, AgentStateReducer, AgentUpdate};
pub use document::Document;
pub use researcher::ResearcherState;
pub use router::{RouteType, Router};
