//! Collaborator traits consumed by the pipeline.

pub mod completion;
pub mod search;
pub mod store;
