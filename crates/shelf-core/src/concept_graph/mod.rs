//! Concept graph (mind-map) domain module.
//!
//! A concept graph is a single-depth tree: the book title sits at the root
//! and every keyword extracted from an assistant reply becomes a first-layer
//! child of it.
//!
//! # Module Structure
//!
//! - `model`: Graph data types (`ConceptGraph`, `ConceptNode`, `ConceptEdge`, `Position`)
//! - `builder`: Incremental layout and id management (`ConceptGraphBuilder`)

mod builder;
mod model;

// Re-export public API
pub use builder::{
    ConceptGraphBuilder, HORIZONTAL_SPACING, ROOT_ANCHOR, VERTICAL_LAYER_SPACING, resume_counter,
};
pub use model::{
    ConceptEdge, ConceptGraph, ConceptNode, NODE_PALETTE, Position, ROOT_NODE_ID, concept_node_id,
    edge_id_for, palette_color,
};
