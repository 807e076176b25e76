use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C; the current line is discarded.
    Interrupted,
}

impl From<Result<ReadlineEvent, ReadlineError>> for InputEvent {
    fn from(event: Result<ReadlineEvent, ReadlineError>) -> Self {
        match event {
            Ok(ReadlineEvent::Line(line)) => Self::Line(line),
            Ok(ReadlineEvent::Eof) => Self::Eof,
            Ok(ReadlineEvent::Interrupted) => Self::Interrupted,
            Err(error) => {
                tracing::warn!(error = %error, "readline failed; ending session");
                Self::Eof
            }
        }
    }
}

/// Line editor for the chat prompt.
///
/// Output written through the returned [`SharedWriter`] is printed above the
/// prompt instead of tearing through the line being edited.
pub struct ChatInput {
    readline: Readline,
}

impl ChatInput {
    pub fn new(prompt: impl Into<String>) -> Result<(Self, SharedWriter), ReadlineError> {
        let (readline, writer) = Readline::new(prompt.into())?;
        Ok((Self { readline }, writer))
    }

    pub fn update_prompt(&mut self, prompt: &str) {
        if let Err(error) = self.readline.update_prompt(prompt) {
            tracing::debug!(error = %error, "failed to update prompt");
        }
    }

    pub async fn read_line(&mut self) -> InputEvent {
        let event = InputEvent::from(self.readline.readline().await);
        if let InputEvent::Line(line) = &event {
            if !line.trim().is_empty() {
                self.readline.add_history_entry(line.clone());
            }
        }
        event
    }

    /// Prints pending output and restores the terminal.
    pub fn finish(mut self) {
        if let Err(error) = self.readline.flush() {
            tracing::debug!(error = %error, "failed to flush terminal output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readline_events_map_to_input_events() {
        assert_eq!(
            InputEvent::from(Ok(ReadlineEvent::Line("/help".to_string()))),
            InputEvent::Line("/help".to_string())
        );
        assert_eq!(InputEvent::from(Ok(ReadlineEvent::Eof)), InputEvent::Eof);
        assert_eq!(
            InputEvent::from(Ok(ReadlineEvent::Interrupted)),
            InputEvent::Interrupted
        );
    }

    #[test]
    fn readline_errors_end_the_session() {
        let error = ReadlineError::from(std::io::Error::other("tty closed"));
        assert_eq!(InputEvent::from(Err(error)), InputEvent::Eof);
    }
}
