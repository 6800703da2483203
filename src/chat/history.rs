use crate::gemini::{Message, Role};

/// Ordered conversation turns for one session.
///
/// Turns are only ever added in user/model pairs, so roles strictly
/// alternate starting with the user.
#[derive(Debug, Clone, Default)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Records a completed exchange.
    pub fn push_exchange(&mut self, user: Message, model: Message) {
        debug_assert_eq!(user.role, Role::User);
        debug_assert_eq!(model.role, Role::Model);
        self.messages.push(user);
        self.messages.push(model);
    }

    /// Removes every message and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.messages.len();
        self.messages.clear();
        removed
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed user/model exchanges.
    pub fn exchanges(&self) -> usize {
        self.messages.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::Part;

    fn user(text: &str) -> Message {
        Message::new(Role::User, vec![Part::text(text)])
    }

    #[test]
    fn test_push_exchange_alternates_roles() {
        let mut history = History::new();
        history.push_exchange(user("hi"), Message::model_text("hello"));
        history.push_exchange(user("how are you"), Message::model_text("fine"));

        let roles: Vec<_> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User, Role::Model]);
        assert_eq!(history.exchanges(), 2);
    }

    #[test]
    fn test_clear_reports_removed() {
        let mut history = History::new();
        history.push_exchange(user("hi"), Message::model_text("hello"));

        assert_eq!(history.clear(), 2);
        assert!(history.is_empty());
        assert_eq!(history.clear(), 0);
    }
}
