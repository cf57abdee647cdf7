use super::message::{OutboundTurn, Turn};

/// Returns the fixed greeting that opens every conversation about `title`.
pub fn greeting_for(title: &str) -> String {
    format!(
        "Hi! I'm your AI reading assistant. What would you like to dig into about \"{title}\"? \
         As we talk, I'll collect the key ideas into the concept map."
    )
}

/// Ordered, append-only transcript of one book conversation.
///
/// The store always starts with a single assistant greeting. That greeting is
/// part of the displayed and persisted transcript but is never sent to the
/// completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    /// Creates a store seeded with the greeting for `title`.
    pub fn for_book(title: &str) -> Self {
        Self::with_greeting(greeting_for(title))
    }

    /// Creates a store seeded with an arbitrary greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Appends `turn` to the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Replaces the whole transcript with a restored one.
    ///
    /// An empty restore keeps the current transcript (the seeded greeting).
    pub fn restore(&mut self, turns: Vec<Turn>) {
        if turns.is_empty() {
            return;
        }
        self.turns = turns;
    }

    /// Turns to use as conversation context, greeting excluded.
    pub fn to_outbound_history(&self) -> Vec<OutboundTurn> {
        self.turns.iter().skip(1).map(OutboundTurn::from).collect()
    }

    /// True when only the greeting exists.
    pub fn is_fresh(&self) -> bool {
        self.turns.len() <= 1
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{OutboundRole, Role};

    #[test]
    fn test_new_store_holds_only_greeting() {
        let store = ConversationStore::for_book("Dune");

        assert_eq!(store.len(), 1);
        assert_eq!(store.turns()[0].role, Role::Assistant);
        assert!(store.turns()[0].content.contains("Dune"));
        assert!(store.is_fresh());
        assert!(store.to_outbound_history().is_empty());
    }

    #[test]
    fn test_outbound_history_skips_greeting_and_maps_roles() {
        let mut store = ConversationStore::for_book("Dune");
        store.append(Turn::user("Who is Paul?"));
        store.append(Turn::assistant("The heir of House Atreides."));

        let history = store.to_outbound_history();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, OutboundRole::User);
        assert_eq!(history[0].text, "Who is Paul?");
        assert_eq!(history[1].role, OutboundRole::Model);
        assert!(!store.is_fresh());
    }

    #[test]
    fn test_append_preserves_earlier_turns() {
        let mut store = ConversationStore::with_greeting("hello");
        store.append(Turn::user("one"));
        let before = store.turns()[..2].to_vec();

        store.append(Turn::assistant("two"));

        assert_eq!(&store.turns()[..2], before.as_slice());
        assert_eq!(store.last().map(|t| t.content.as_str()), Some("two"));
    }

    #[test]
    fn test_restore_replaces_transcript() {
        let mut store = ConversationStore::for_book("Dune");
        let restored = vec![
            Turn::assistant("saved greeting"),
            Turn::user("saved question"),
        ];

        store.restore(restored.clone());

        assert_eq!(store.turns(), restored.as_slice());
        assert_eq!(store.to_outbound_history().len(), 1);
    }

    #[test]
    fn test_restore_with_empty_keeps_greeting() {
        let mut store = ConversationStore::for_book("Dune");

        store.restore(Vec::new());

        assert_eq!(store.len(), 1);
        assert!(store.is_fresh());
    }
}
