use crate::backend::{Attachment, ChatBackend};
use crate::config::ChatConfig;
use crate::message::{Message, Sender};
use crate::view::ChatView;

/// Result of one [`Dispatcher::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// Nothing to send; no request was made and nothing was rendered.
    Ignored,
    /// The backend answered and its reply (or a fallback text) was rendered.
    Replied,
    /// The request failed and the connection error bubble was rendered.
    Failed,
}

enum Submission<A> {
    File(A),
    Text(String),
}

/// Keeps the send control disabled for the lifetime of one request.
///
/// Dropping the guard is the only way the control comes back, so it is
/// restored on success, on failure and when the submit future is dropped.
struct InFlight<'a, V: ChatView> {
    view: &'a V,
    clears_attachment: bool,
}

impl<'a, V: ChatView> InFlight<'a, V> {
    fn begin(view: &'a V, clears_attachment: bool) -> Self {
        view.set_send_enabled(false);
        view.clear_input();
        Self {
            view,
            clears_attachment,
        }
    }
}

impl<V: ChatView> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if self.clears_attachment {
            self.view.clear_attachment();
        }
        self.view.set_send_enabled(true);
        self.view.focus_input();
    }
}

/// Turns submits into backend calls and renders the exchange.
pub struct Dispatcher<B, V> {
    backend: B,
    view: V,
    config: ChatConfig,
}

impl<B, V> Dispatcher<B, V>
where
    B: ChatBackend,
    V: ChatView<Attachment = B::Attachment>,
{
    pub fn new(backend: B, view: V, config: ChatConfig) -> Self {
        Self {
            backend,
            view,
            config: config.normalized(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Appends a bubble and scrolls to it.
    pub fn render_message(&self, sender: Sender, text: impl Into<String>) {
        let message = Message::new(sender, text);
        self.view.append_bubble(&message);
        self.view.scroll_to_latest();
    }

    /// Sends whatever the user prepared: the attachment if one is selected,
    /// otherwise the trimmed text. Never fails; errors become a bubble.
    pub async fn submit(&self) -> SubmitOutcome {
        let text = self.view.input_text().trim().to_string();
        let submission = match self.view.selected_attachment() {
            Some(attachment) => Submission::File(attachment),
            None if !text.is_empty() => Submission::Text(text),
            None => {
                tracing::trace!("submit ignored: no text and no attachment");
                return SubmitOutcome::Ignored;
            }
        };

        let texts = &self.config.texts;
        let is_file = matches!(submission, Submission::File(_));
        let user_text = match &submission {
            Submission::File(attachment) => texts.file_notice(&attachment.file_name()),
            Submission::Text(text) => text.clone(),
        };
        self.render_message(Sender::User, user_text);

        let _in_flight = InFlight::begin(&self.view, is_file);

        let result = match &submission {
            Submission::File(attachment) => {
                tracing::debug!(
                    endpoint = %self.config.endpoints.analyze_url(),
                    file_name = %attachment.file_name(),
                    "sending attachment for analysis"
                );
                self.backend
                    .analyze_file(attachment)
                    .await
                    .map(|reply| reply.analysis_text(&texts.analysis_failed).to_string())
            }
            Submission::Text(text) => {
                tracing::debug!(
                    endpoint = %self.config.endpoints.chat_url(),
                    length = text.len(),
                    "sending chat message"
                );
                self.backend
                    .chat(text)
                    .await
                    .map(|reply| reply.chat_text(&texts.no_response).to_string())
            }
        };

        match result {
            Ok(reply) => {
                self.render_message(Sender::Bot, reply);
                SubmitOutcome::Replied
            }
            Err(error) => {
                tracing::error!(
                    stage = error.stage(),
                    attachment = is_file,
                    error = %error,
                    "chat request failed"
                );
                self.render_message(Sender::Bot, texts.connection_error.clone());
                SubmitOutcome::Failed
            }
        }
    }
}
