use std::collections::VecDeque;

use crate::core::message::{Message, MessageId, Role};

/// Append-only transcript for a single session.
///
/// Turns are never mutated or reordered once appended. Ids are allocated
/// here and strictly increase in insertion order, so insertion order and id
/// order always agree. Nothing is persisted; the transcript lives and dies
/// with the app instance that owns it.
pub struct Conversation {
    messages: VecDeque<Message>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Append a user turn and return its id.
    pub fn push_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Role::User, content.into())
    }

    /// Append a bot turn and return its id.
    pub fn push_bot(&mut self, content: impl Into<String>) -> MessageId {
        self.push(Role::Bot, content.into())
    }

    fn push(&mut self, role: Role, content: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push_back(Message::new(id, role, content));
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_keep_insertion_order() {
        let mut convo = Conversation::new();
        convo.push_user("first");
        convo.push_bot("second");
        convo.push_user("third");

        let contents: Vec<&str> = convo.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut convo = Conversation::new();
        let a = convo.push_user("a");
        let b = convo.push_bot("b");
        let c = convo.push_user("c");

        assert!(a < b && b < c);

        let ids: Vec<MessageId> = convo.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn appended_turns_are_not_rewritten_by_later_appends() {
        let mut convo = Conversation::new();
        convo.push_user("keep me");
        convo.push_bot("reply");
        convo.push_user("more");

        let first = convo.iter().next().unwrap();
        assert_eq!(first.content, "keep me");
        assert_eq!(first.id, MessageId(0));
        assert!(first.is_user());
    }

    #[test]
    fn roles_alternate_as_pushed() {
        let mut convo = Conversation::new();
        convo.push_user("q");
        convo.push_bot("a");
        assert!(convo.iter().next().unwrap().is_user());
        assert!(convo.last().unwrap().is_bot());
    }
}
