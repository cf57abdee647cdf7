use super::model::{
    ConceptEdge, ConceptGraph, ConceptNode, NODE_PALETTE, Position, ROOT_NODE_ID,
    concept_node_id, edge_id_for,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canvas position of the root node of a freshly initialized graph.
pub const ROOT_ANCHOR: Position = Position::new(300.0, 10.0);

/// Horizontal distance between neighbouring concepts of one layer.
pub const HORIZONTAL_SPACING: f64 = 200.0;

/// Vertical distance between the root and its concept layer.
pub const VERTICAL_LAYER_SPACING: f64 = 150.0;

static CONCEPT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^node-(\d+)$").expect("concept id pattern is valid"));

/// Recovers the id counter from an existing node set.
///
/// Returns the largest `N` among ids of the form `node-<N>`, or 0 when no
/// node matches. Ids with any other shape (including the root) are ignored,
/// as are suffixes that do not fit in a `u64`. Adding nodes after resuming
/// from this value can never collide with the scanned ids.
pub fn resume_counter<'a, I>(ids: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(|id| CONCEPT_ID.captures(id))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

/// Grows a concept graph one layer of keywords at a time.
///
/// `ConceptGraphBuilder` is responsible for:
/// - Creating the root node labelled with the book title
/// - Assigning strictly increasing `node-<N>` ids
/// - Centering each keyword batch under the root
/// - Restoring a persisted graph without breaking id uniqueness
#[derive(Debug, Clone)]
pub struct ConceptGraphBuilder {
    root_label: String,
    graph: ConceptGraph,
}

impl ConceptGraphBuilder {
    /// Creates a graph holding only the root node.
    pub fn new(root_label: impl Into<String>) -> Self {
        let root_label = root_label.into();
        let graph = ConceptGraph {
            nodes: vec![root_node(&root_label, ROOT_ANCHOR)],
            edges: Vec::new(),
            next_id: 0,
        };
        Self { root_label, graph }
    }

    /// Replaces the graph with a previously persisted one.
    ///
    /// The counter is recomputed from the restored node ids; whatever
    /// `next_id` the input carries is ignored. A graph without a root gets
    /// one at the anchor position.
    pub fn restore(&mut self, mut graph: ConceptGraph) {
        if graph.root().is_none() {
            tracing::debug!("[ConceptGraph] Restored graph has no root, inserting one");
            graph
                .nodes
                .insert(0, root_node(&self.root_label, ROOT_ANCHOR));
        }
        graph.next_id = resume_counter(graph.nodes.iter().map(|node| node.id.as_str()));
        self.graph = graph;
    }

    /// Adds one layer of concept nodes, one per keyword, in order.
    ///
    /// Each keyword consumes the next id, is coloured by `id mod palette`,
    /// and is placed at `root + (offset * HORIZONTAL_SPACING, VERTICAL_LAYER_SPACING)`
    /// where offsets are centered around zero. Duplicate labels are kept.
    /// An empty batch changes nothing, and so does a batch arriving after the
    /// counter has reached `u64::MAX`.
    pub fn add_layer<S: AsRef<str>>(&mut self, keywords: &[S]) -> &ConceptGraph {
        if keywords.is_empty() {
            return &self.graph;
        }

        let origin = self
            .graph
            .root()
            .map(|root| root.position)
            .unwrap_or(ROOT_ANCHOR);
        let center = (keywords.len() as f64 - 1.0) / 2.0;

        for (index, keyword) in keywords.iter().enumerate() {
            let Some(n) = self.graph.next_id.checked_add(1) else {
                tracing::warn!(
                    "[ConceptGraph] Id counter exhausted at {}, dropping remaining concepts",
                    self.graph.next_id
                );
                break;
            };
            self.graph.next_id = n;
            let id = concept_node_id(n);
            let palette_index = Some((n % NODE_PALETTE.len() as u64) as usize);
            let offset = index as f64 - center;

            self.graph.edges.push(ConceptEdge {
                id: edge_id_for(&id),
                source: ROOT_NODE_ID.to_string(),
                target: id.clone(),
                palette_index,
            });
            self.graph.nodes.push(ConceptNode {
                id,
                label: keyword.as_ref().to_string(),
                position: Position::new(
                    origin.x + offset * HORIZONTAL_SPACING,
                    origin.y + VERTICAL_LAYER_SPACING,
                ),
                palette_index,
            });
        }

        tracing::debug!(
            "[ConceptGraph] Added {} concept(s), counter now {}",
            keywords.len(),
            self.graph.next_id
        );
        &self.graph
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn into_graph(self) -> ConceptGraph {
        self.graph
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    /// Number of concepts shown by the "N concepts" indicator.
    pub fn concept_count(&self) -> usize {
        self.graph.nodes.len().saturating_sub(1)
    }

    pub fn next_id(&self) -> u64 {
        self.graph.next_id
    }
}

fn root_node(label: &str, position: Position) -> ConceptNode {
    ConceptNode {
        id: ROOT_NODE_ID.to_string(),
        label: label.to_string(),
        position,
        palette_index: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_counter_adds_nothing() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.restore(ConceptGraph {
            nodes: vec![
                root_node("Dune", ROOT_ANCHOR),
                ConceptNode {
                    id: concept_node_id(u64::MAX),
                    label: "last".into(),
                    position: Position::new(300.0, 160.0),
                    palette_index: None,
                },
            ],
            edges: Vec::new(),
            next_id: 0,
        });
        assert_eq!(builder.next_id(), u64::MAX);

        let before = builder.graph().clone();
        builder.add_layer(&["next", "after"]);

        assert_eq!(builder.graph(), &before);
        assert_eq!(builder.next_id(), u64::MAX);
    }

    fn offsets(builder: &ConceptGraphBuilder, ids: &[&str]) -> Vec<f64> {
        let root = builder.graph().root().unwrap().position;
        ids.iter()
            .map(|id| (builder.graph().node(id).unwrap().position.x - root.x) / HORIZONTAL_SPACING)
            .collect()
    }

    #[test]
    fn test_new_graph_has_only_root() {
        let builder = ConceptGraphBuilder::new("Dune");
        let graph = builder.graph();

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.next_id, 0);
        let root = graph.root().unwrap();
        assert_eq!(root.label, "Dune");
        assert_eq!(root.position, ROOT_ANCHOR);
        assert_eq!(builder.concept_count(), 0);
    }

    #[test]
    fn test_ids_increase_without_gaps_across_layers() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.add_layer(&["spice", "desert"]);
        builder.add_layer(&["prophecy"]);
        builder.add_layer(&["water", "sand", "worms", "fremen"]);

        let ids: Vec<&str> = builder
            .graph()
            .nodes
            .iter()
            .skip(1)
            .map(|n| n.id.as_str())
            .collect();
        let expected: Vec<String> = (1..=7).map(concept_node_id).collect();
        assert_eq!(ids, expected);
        assert_eq!(builder.next_id(), 7);
        assert_eq!(builder.concept_count(), 7);
    }

    #[test]
    fn test_batch_offsets_are_symmetric() {
        let mut builder = ConceptGraphBuilder::new("root");
        builder.add_layer(&["a"]);
        assert_eq!(offsets(&builder, &["node-1"]), vec![0.0]);

        builder.add_layer(&["b", "c", "d"]);
        assert_eq!(offsets(&builder, &["node-2", "node-3", "node-4"]), vec![-1.0, 0.0, 1.0]);

        builder.add_layer(&["e", "f", "g", "h"]);
        assert_eq!(
            offsets(&builder, &["node-5", "node-6", "node-7", "node-8"]),
            vec![-1.5, -0.5, 0.5, 1.5]
        );

        for node in builder.graph().nodes.iter().skip(1) {
            assert_eq!(node.position.y, ROOT_ANCHOR.y + VERTICAL_LAYER_SPACING);
        }
    }

    #[test]
    fn test_empty_layer_is_noop() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.add_layer(&["spice"]);
        let before = builder.graph().clone();

        let empty: [&str; 0] = [];
        builder.add_layer(&empty);

        assert_eq!(builder.graph(), &before);
    }

    #[test]
    fn test_every_concept_has_one_root_edge_with_matching_color() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.add_layer(&["a", "b", "c", "d", "e", "f", "g"]);

        let graph = builder.graph();
        for node in graph.nodes.iter().filter(|n| !n.is_root()) {
            let incoming: Vec<&ConceptEdge> =
                graph.edges.iter().filter(|e| e.target == node.id).collect();
            assert_eq!(incoming.len(), 1);
            assert_eq!(incoming[0].source, ROOT_NODE_ID);
            assert_eq!(incoming[0].palette_index, node.palette_index);
        }
        // node-6 wraps back to the first palette slot
        assert_eq!(graph.node("node-6").unwrap().palette_index, Some(0));
        assert_eq!(graph.node("node-7").unwrap().color(), Some(NODE_PALETTE[1]));
    }

    #[test]
    fn test_duplicate_keywords_create_new_nodes() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.add_layer(&["spice"]);
        builder.add_layer(&["spice"]);

        assert_eq!(builder.concept_count(), 2);
        assert_eq!(builder.graph().node("node-2").unwrap().label, "spice");
    }

    #[test]
    fn test_two_keyword_scenario() {
        let mut builder = ConceptGraphBuilder::new("Chapter book");
        builder.add_layer(&["motif", "foreshadowing"]);

        let graph = builder.graph();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(offsets(&builder, &["node-1", "node-2"]), vec![-0.5, 0.5]);
        assert_eq!(graph.node("node-1").unwrap().label, "motif");
    }

    #[test]
    fn test_resume_counter() {
        assert_eq!(resume_counter(Vec::<&str>::new()), 0);
        assert_eq!(resume_counter(["root"]), 0);
        assert_eq!(resume_counter(["root", "node-3", "node-11", "node-7"]), 11);
        assert_eq!(resume_counter(["node-x", "my-node-4", "node-2b", "node-5"]), 5);
    }

    #[test]
    fn test_restore_recomputes_counter_and_continues() {
        let mut original = ConceptGraphBuilder::new("Dune");
        original.add_layer(&["a", "b", "c"]);
        let mut persisted = original.graph().clone();
        persisted.nodes.retain(|n| n.id != "node-2");
        persisted.next_id = 0;

        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.restore(persisted);
        assert_eq!(builder.next_id(), 3);

        builder.add_layer(&["d"]);
        assert!(builder.graph().node("node-4").is_some());
    }

    #[test]
    fn test_restore_inserts_missing_root() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        builder.restore(ConceptGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: 9,
        });

        let graph = builder.graph();
        assert_eq!(graph.root().unwrap().label, "Dune");
        assert_eq!(graph.next_id, 0);
    }

    #[test]
    fn test_layout_follows_restored_root_position() {
        let mut builder = ConceptGraphBuilder::new("Dune");
        let mut graph = builder.graph().clone();
        graph.nodes[0].position = Position::new(0.0, 0.0);
        builder.restore(graph);

        builder.add_layer(&["a", "b"]);

        let node = builder.graph().node("node-1").unwrap();
        assert_eq!(node.position, Position::new(-100.0, VERTICAL_LAYER_SPACING));
    }
}
