use futures::future::LocalBoxFuture;

use crate::error::RequestResult;
use crate::reply::ReplyBody;

/// A selected file as far as the dispatcher is concerned.
pub trait Attachment {
    fn file_name(&self) -> String;
}

/// The two REST calls behind the widget.
///
/// Futures are not `Send`: browser fetch futures live on the page's event loop.
pub trait ChatBackend {
    type Attachment: Attachment;

    /// `POST` `{message}` as JSON to the chat endpoint.
    fn chat<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, RequestResult<ReplyBody>>;

    /// `POST` the file as multipart field `file` to the analysis endpoint.
    fn analyze_file<'a>(
        &'a self,
        attachment: &'a Self::Attachment,
    ) -> LocalBoxFuture<'a, RequestResult<ReplyBody>>;
}
