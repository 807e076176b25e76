/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Style class used for the bubble wrapper.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::User => "message user",
            Self::Bot => "message bot",
        }
    }

    /// Short label for text front-ends.
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Bot => "bot",
        }
    }
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_classes_match_the_page_stylesheet() {
        assert_eq!(Sender::User.css_class(), "message user");
        assert_eq!(Sender::Bot.css_class(), "message bot");
    }

    #[test]
    fn labels_and_constructors() {
        assert_eq!(Sender::User.label(), "you");
        assert_eq!(Sender::Bot.label(), "bot");

        let message = Message::bot("Irrigate at dawn.");
        assert_eq!(message.sender, Sender::Bot);
        assert_eq!(message.text, "Irrigate at dawn.");
        assert_eq!(Message::user("hi"), Message::new(Sender::User, "hi"));
    }
}
