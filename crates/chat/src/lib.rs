#![deny(unsafe_code)]

//! Front-end agnostic core of the AgroChat widget.
//!
//! The [`Dispatcher`] turns a submit into one backend call and renders the
//! exchange into a [`ChatView`]. Browser and terminal front-ends provide the
//! view and the [`ChatBackend`].

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
/// Trigger to action mapping for input controls.
pub mod events;
/// Transcript entities.
pub mod message;
pub mod reply;
pub mod view;

pub use backend::{Attachment, ChatBackend};
pub use config::{ChatConfig, Endpoints, FallbackTexts};
pub use dispatcher::{Dispatcher, SubmitOutcome};
pub use error::{RequestError, RequestResult};
pub use events::{Action, Trigger};
pub use message::{Message, Sender};
pub use reply::ReplyBody;
pub use view::ChatView;
