/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text, submitted as if Enter was pressed in the text field.
    Send(String),
    /// `/attach [path]`; without a path it only explains how to pick a file.
    Attach(Option<String>),
    Detach,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  <text>          send a chat message
  /attach <path>  select a file; the next Enter sends it for analysis
  /detach         drop the selected file
  /help           show this help
  /quit           exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };
        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match name {
            "attach" if argument.is_empty() => Self::Attach(None),
            "attach" => Self::Attach(Some(argument.to_string())),
            "detach" => Self::Detach,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            // Unknown slash words are ordinary chat text, e.g. "/s is a unit".
            _ => Self::Send(line.to_string()),
        }
    }
}
