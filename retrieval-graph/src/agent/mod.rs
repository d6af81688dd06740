//! Agents built on the graph engine.
//!
//! - [`researcher`]: per-step research sub-workflow (generate queries, retrieve).
//! - [`retrieval`]: the conversational graph (route, clarify / answer / plan,
//!   research loop, respond).

pub mod researcher;
pub mod retrieval;
