use serde::{Deserialize, Serialize};

/// Id of the root node of every concept graph.
pub const ROOT_NODE_ID: &str = "root";

/// Fixed, cyclic colour palette for concept nodes and their edges.
pub const NODE_PALETTE: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#06b6d4", "#10b981", "#f59e0b", "#ef4444",
];

/// Returns the palette colour for a palette index (wrapping).
pub fn palette_color(index: usize) -> &'static str {
    NODE_PALETTE[index % NODE_PALETTE.len()]
}

/// Returns the node id for concept number `n`.
pub fn concept_node_id(n: u64) -> String {
    format!("node-{n}")
}

/// Returns the id of the root edge pointing at `target`.
pub fn edge_id_for(target: &str) -> String {
    format!("e-{ROOT_NODE_ID}-{target}")
}

/// A point on the mind-map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node of the concept graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptNode {
    /// `"root"` or `"node-<N>"`.
    pub id: String,
    pub label: String,
    pub position: Position,
    /// Palette slot (`N mod palette size`); `None` for the root.
    pub palette_index: Option<usize>,
}

impl ConceptNode {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_NODE_ID
    }

    /// Colour hint for rendering, if this node has one.
    pub fn color(&self) -> Option<&'static str> {
        self.palette_index.map(palette_color)
    }
}

/// An edge from the root to a concept node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub palette_index: Option<usize>,
}

impl ConceptEdge {
    pub fn color(&self) -> Option<&'static str> {
        self.palette_index.map(palette_color)
    }
}

/// Nodes, edges and the id counter of one book's mind-map.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptGraph {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
    /// Highest `N` used by a `node-<N>` id (0 when none exist).
    pub next_id: u64,
}

impl ConceptGraph {
    pub fn root(&self) -> Option<&ConceptNode> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn node(&self, id: &str) -> Option<&ConceptNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Number of concept nodes, root excluded.
    pub fn concept_count(&self) -> usize {
        self.nodes.iter().filter(|node| !node.is_root()).count()
    }
}
