/// Raw input event coming from a front-end control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Click on the send control.
    SendClicked,
    /// Key pressed while the text field has focus.
    KeyDown { key: String, shift: bool },
    /// Click on the attach control.
    AttachClicked,
}

/// What the widget does in response to a [`Trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    OpenFilePicker,
}

impl Trigger {
    pub fn key_down(key: impl Into<String>, shift: bool) -> Self {
        Self::KeyDown {
            key: key.into(),
            shift,
        }
    }

    /// Maps the trigger to an action; `None` means the event is left alone.
    ///
    /// Shift+Enter keeps its default behavior so multi-line fields can still
    /// insert a newline.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::SendClicked => Some(Action::Submit),
            Self::KeyDown { key, shift } if key == "Enter" && !shift => Some(Action::Submit),
            Self::KeyDown { .. } => None,
            Self::AttachClicked => Some(Action::OpenFilePicker),
        }
    }

    /// Returns true when the front-end must suppress the event's default action.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::KeyDown { .. }) && self.action().is_some()
    }
}
