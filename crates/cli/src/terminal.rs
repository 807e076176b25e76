use std::cell::{Cell, RefCell};
use std::io::Write;

use agrochat::{ChatView, Message};

use crate::http::LocalFile;

/// Line-oriented transcript on a writer (the line editor's shared writer in
/// the binary).
pub struct TerminalView<W: Write> {
    out: RefCell<W>,
    input: RefCell<String>,
    attachment: RefCell<Option<LocalFile>>,
    send_enabled: Cell<bool>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            input: RefCell::new(String::new()),
            attachment: RefCell::new(None),
            send_enabled: Cell::new(true),
        }
    }

    /// Stores a typed line as the text field contents.
    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.borrow_mut() = text.into();
    }

    pub fn select_attachment(&self, file: LocalFile) {
        self.notice(&format!(
            "attached {}; press Enter to send it for analysis",
            file.name()
        ));
        *self.attachment.borrow_mut() = Some(file);
    }

    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled.get()
    }

    /// Prompt for the next line; empty while a request is in flight.
    pub fn prompt_text(&self) -> String {
        if !self.is_send_enabled() {
            return String::new();
        }
        match self.attachment.borrow().as_ref() {
            Some(file) => format!("[📎 {}] > ", file.name()),
            None => "> ".to_string(),
        }
    }

    /// Out-of-band line that is not part of the transcript.
    pub fn notice(&self, text: &str) {
        for line in text.lines() {
            self.write(format_args!("  {line}\n"));
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, args: std::fmt::Arguments<'_>) {
        let mut out = self.out.borrow_mut();
        if let Err(error) = out.write_fmt(args).and_then(|()| out.flush()) {
            tracing::warn!(error = %error, "failed to write to terminal");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    type Attachment = LocalFile;

    fn append_bubble(&self, message: &Message) {
        let label = message.sender.label();
        let mut lines = message.text.lines();
        let first = lines.next().unwrap_or_default();
        self.write(format_args!("{label} › {first}\n"));

        let indent = " ".repeat(label.chars().count() + 3);
        for line in lines {
            self.write(format_args!("{indent}{line}\n"));
        }
    }

    fn scroll_to_latest(&self) {
        // Terminals follow the tail on their own.
    }

    fn input_text(&self) -> String {
        self.input.borrow().clone()
    }

    fn clear_input(&self) {
        self.input.borrow_mut().clear();
    }

    fn focus_input(&self) {
        tracing::trace!("input ready");
    }

    fn selected_attachment(&self) -> Option<LocalFile> {
        self.attachment.borrow().clone()
    }

    fn clear_attachment(&self) {
        self.attachment.borrow_mut().take();
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.send_enabled.set(enabled);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use agrochat::{
        ChatBackend, ChatConfig, Dispatcher, ReplyBody, RequestError, RequestResult,
        SubmitOutcome,
    };
    use futures::FutureExt;
    use futures::executor::block_on;
    use futures::future::LocalBoxFuture;

    use super::*;

    struct CannedBackend {
        fail: bool,
    }

    impl ChatBackend for CannedBackend {
        type Attachment = LocalFile;

        fn chat<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
            let reply = if self.fail {
                Err(RequestError::Transport {
                    stage: "send-chat",
                    endpoint: "http://127.0.0.1:5000/api/chat".to_string(),
                    details: "connection refused".to_string(),
                })
            } else {
                Ok(ReplyBody::new(Some(format!("echo: {message}").as_str()), None))
            };
            futures::future::ready(reply).boxed_local()
        }

        fn analyze_file<'a>(
            &'a self,
            attachment: &'a LocalFile,
        ) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
            let error = format!("cannot read {}", attachment.name());
            let reply = ReplyBody::new(None, Some(error.as_str()));
            futures::future::ready(Ok(reply)).boxed_local()
        }
    }

    fn transcript(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn bubbles_are_labelled_and_multiline_text_is_indented() {
        let view = TerminalView::new(Vec::new());

        view.append_bubble(&Message::user("hello"));
        view.append_bubble(&Message::bot("Sow in rows.\nWater weekly."));

        assert_eq!(
            transcript(view),
            "you › hello\nbot › Sow in rows.\n      Water weekly.\n"
        );
    }

    #[test]
    fn prompt_shows_pending_attachment_and_hides_while_sending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soil.png");
        std::fs::File::create(&path).unwrap().write_all(b"png").unwrap();
        let file = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(LocalFile::open(&path))
            .unwrap();

        let view = TerminalView::new(Vec::new());
        assert_eq!(view.prompt_text(), "> ");

        view.select_attachment(file);
        assert_eq!(view.prompt_text(), "[📎 soil.png] > ");
        view.set_send_enabled(false);
        assert_eq!(view.prompt_text(), "");

        let output = transcript(view);
        assert_eq!(
            output,
            "  attached soil.png; press Enter to send it for analysis\n"
        );
    }

    #[test]
    fn submit_clears_input_and_re_enables_send() {
        let view = TerminalView::new(Vec::new());
        view.set_input("hello");
        let dispatcher = Dispatcher::new(
            CannedBackend { fail: false },
            view,
            ChatConfig::default(),
        );

        assert_eq!(block_on(dispatcher.submit()), SubmitOutcome::Replied);
        assert!(dispatcher.view().is_send_enabled());
        assert!(dispatcher.view().input_text().is_empty());
    }

    #[test]
    fn failed_request_prints_connection_error() {
        let view = TerminalView::new(Vec::new());
        view.set_input("hello");
        let dispatcher =
            Dispatcher::new(CannedBackend { fail: true }, view, ChatConfig::default());

        assert_eq!(block_on(dispatcher.submit()), SubmitOutcome::Failed);
        assert!(dispatcher.view().is_send_enabled());

        let output = transcript(dispatcher.into_view());
        assert!(output.ends_with("bot › ⚠️ Error connecting to server.\n"));
    }

    #[test]
    fn attachment_exchange_shows_file_notice_and_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.jpg");
        std::fs::File::create(&path).unwrap().write_all(b"jpg").unwrap();
        let file = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(LocalFile::open(&path))
            .unwrap();

        let view = TerminalView::new(Vec::new());
        view.set_input("ignored text");
        *view.attachment.borrow_mut() = Some(file);
        let dispatcher = Dispatcher::new(
            CannedBackend { fail: false },
            view,
            ChatConfig::default(),
        );

        block_on(dispatcher.submit());
        assert!(dispatcher.view().selected_attachment().is_none());

        let output = transcript(dispatcher.into_view());
        assert_eq!(
            output,
            "you › 📎 Sent file: leaf.jpg\nbot › cannot read leaf.jpg\n"
        );
    }

    #[test]
    fn transcript_of_a_text_exchange() {
        let view = TerminalView::new(Vec::new());
        view.set_input("  rain tomorrow? ");
        let dispatcher = Dispatcher::new(
            CannedBackend { fail: false },
            view,
            ChatConfig::default(),
        );
        block_on(dispatcher.submit());

        let output = transcript(dispatcher.into_view());
        assert_eq!(output, "you › rain tomorrow?\nbot › echo: rain tomorrow?\n");
    }
}
