//! Text codec for the `Chat_History` and `Mind_Map_Data` record fields.
//!
//! The mind-map shape (`{nodes: [{id, position, data: {label}, style}], edges: [...]}`)
//! is shared with the web front end, so style objects are written alongside
//! the data even though they are ignored on read.

use crate::concept_graph::{
    ConceptEdge, ConceptGraph, ConceptNode, NODE_PALETTE, Position, palette_color, resume_counter,
};
use crate::conversation::Turn;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Stored value of a transcript that was never saved.
pub const EMPTY_TRANSCRIPT: &str = "[]";

/// Stored value of a mind-map that was never saved.
pub const EMPTY_GRAPH: &str = "{}";

#[derive(Debug, Serialize, Deserialize)]
struct MindMapDto {
    #[serde(default)]
    nodes: Vec<NodeDto>,
    #[serde(default)]
    edges: Vec<EdgeDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeDto {
    id: String,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: NodeDataDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NodeDataDto {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeDto {
    id: String,
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<Value>,
}

fn is_empty_marker(raw: &str, marker: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == marker
}

/// Encodes a transcript as a JSON array of `{role, content}`.
pub fn encode_transcript(turns: &[Turn]) -> Result<String> {
    Ok(serde_json::to_string(turns)?)
}

/// Decodes a stored transcript.
///
/// Returns `None` for absent values, the `"[]"` marker and malformed text.
pub fn decode_transcript(raw: Option<&str>) -> Option<Vec<Turn>> {
    let raw = raw?;
    if is_empty_marker(raw, EMPTY_TRANSCRIPT) {
        return None;
    }
    match serde_json::from_str::<Vec<Turn>>(raw) {
        Ok(turns) if turns.is_empty() => None,
        Ok(turns) => Some(turns),
        Err(err) => {
            tracing::warn!("[SessionCodec] Ignoring malformed chat history: {}", err);
            None
        }
    }
}

/// Encodes a graph as `{nodes, edges}` in the front end's mind-map shape.
pub fn encode_graph(graph: &ConceptGraph) -> Result<String> {
    let dto = MindMapDto {
        nodes: graph.nodes.iter().map(node_to_dto).collect(),
        edges: graph.edges.iter().map(edge_to_dto).collect(),
    };
    Ok(serde_json::to_string(&dto)?)
}

/// Decodes a stored graph.
///
/// Returns `None` for absent values, the `"{}"` marker and malformed text.
/// Palette indices are derived from node ids and `next_id` from the resume
/// counter, so the stored styles never matter.
pub fn decode_graph(raw: Option<&str>) -> Option<ConceptGraph> {
    let raw = raw?;
    if is_empty_marker(raw, EMPTY_GRAPH) {
        return None;
    }
    let dto = match serde_json::from_str::<MindMapDto>(raw) {
        Ok(dto) => dto,
        Err(err) => {
            tracing::warn!("[SessionCodec] Ignoring malformed mind-map data: {}", err);
            return None;
        }
    };

    let nodes: Vec<ConceptNode> = dto
        .nodes
        .into_iter()
        .map(|node| ConceptNode {
            palette_index: palette_index_of(&node.id),
            id: node.id,
            label: node.data.label,
            position: node.position,
        })
        .collect();
    let edges = dto
        .edges
        .into_iter()
        .map(|edge| ConceptEdge {
            palette_index: palette_index_of(&edge.target),
            id: edge.id,
            source: edge.source,
            target: edge.target,
        })
        .collect();
    let next_id = resume_counter(nodes.iter().map(|node| node.id.as_str()));

    Some(ConceptGraph {
        nodes,
        edges,
        next_id,
    })
}

fn palette_index_of(id: &str) -> Option<usize> {
    match resume_counter([id]) {
        0 => None,
        n => Some((n % NODE_PALETTE.len() as u64) as usize),
    }
}

fn node_to_dto(node: &ConceptNode) -> NodeDto {
    let style = match node.palette_index {
        Some(index) => {
            let color = palette_color(index);
            json!({
                "background": format!("{color}22"),
                "color": "#e2e8f0",
                "border": format!("1.5px solid {color}88"),
                "borderRadius": "12px",
            })
        }
        None => json!({
            "background": "linear-gradient(135deg, #3b82f6, #6366f1)",
            "color": "#fff",
            "borderRadius": "16px",
            "fontWeight": "bold",
        }),
    };
    NodeDto {
        id: node.id.clone(),
        position: node.position,
        data: NodeDataDto {
            label: node.label.clone(),
        },
        style: Some(style),
    }
}

fn edge_to_dto(edge: &ConceptEdge) -> EdgeDto {
    EdgeDto {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        animated: Some(true),
        style: edge
            .color()
            .map(|color| json!({ "stroke": color, "strokeWidth": 2, "opacity": 0.6 })),
    }
}
