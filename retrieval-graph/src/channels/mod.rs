//! State update channels: how a node's update is merged into graph state.

mod updater;

pub use updater::{BoxedStateUpdater, FieldBasedUpdater, ReplaceUpdater, StateUpdater};
