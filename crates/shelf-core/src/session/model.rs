use crate::concept_graph::ConceptGraph;
use crate::conversation::Turn;

/// What a load recovered for one book.
///
/// `None` means the stored value was absent, an empty marker, or malformed;
/// the caller keeps its in-memory defaults in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSession {
    pub transcript: Option<Vec<Turn>>,
    pub graph: Option<ConceptGraph>,
}

impl LoadedSession {
    pub fn is_empty(&self) -> bool {
        self.transcript.is_none() && self.graph.is_none()
    }
}
