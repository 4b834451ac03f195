//! Cairn Core Library
//!
//! Memory-graph engine for long-running agents: a spine of ingested
//! content with topic branches, an age-driven compression ladder, orphan
//! pruning, and a budgeted briefing rendered from the tree.

pub mod compaction;
pub mod config;
pub mod curation;
pub mod deadline;
pub mod error;
pub mod graph;
pub mod id;
pub mod ingest;
pub mod logging;
pub mod render;
pub mod store;
pub mod summarize;
pub mod text;
pub mod tree;
