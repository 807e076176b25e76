use crate::message::Message;

/// Rendering and input surface the dispatcher drives.
///
/// Every method takes `&self`: front-ends hold shared handles (DOM nodes) or
/// interior state, so the view can be read again after an `await`.
pub trait ChatView {
    /// Selected file type handed to the backend.
    type Attachment;

    /// Appends one bubble at the end of the transcript.
    fn append_bubble(&self, message: &Message);

    /// Brings the newest bubble into view.
    fn scroll_to_latest(&self);

    /// Current raw contents of the text field.
    fn input_text(&self) -> String;

    fn clear_input(&self);

    fn focus_input(&self);

    /// The pending attachment, if one is selected.
    fn selected_attachment(&self) -> Option<Self::Attachment>;

    fn clear_attachment(&self);

    fn set_send_enabled(&self, enabled: bool);
}
