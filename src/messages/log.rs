use super::types::Message;

/// Ordered, append-only conversation log.
///
/// Messages can only be appended or cleared wholesale; readers get shared
/// slices so appended content is never edited in place.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;

    #[test]
    fn test_push_preserves_order() {
        let mut log = MessageLog::new();
        log.push(Message::user("one"));
        log.push(Message::assistant("two"));
        log.push(Message::user("three"));

        let contents: Vec<&str> = log.as_slice().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(log.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = MessageLog::new();
        log.push(Message::user("one"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
