#![deny(unsafe_code)]

//! Browser build of the AgroChat widget.
//!
//! Binds the page's transcript, text field, send and attach controls to the
//! shared [`agrochat::Dispatcher`] and talks to the backend through `fetch`.

use std::rc::Rc;

use agrochat::{Action, Dispatcher, Trigger};
use snafu::OptionExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent};

pub mod dom;
pub mod error;
pub mod fetch;
pub mod options;

pub use dom::{DomView, SelectedFile};
pub use error::{MountError, MountResult};
pub use fetch::FetchBackend;
pub use options::{ElementIds, WidgetOptions};

use crate::error::{ListenerSnafu, NoDocumentSnafu, NoWindowSnafu, describe_js_error};

type WidgetDispatcher = Dispatcher<FetchBackend, DomView>;

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("AgroChat widget module initialized");

    #[cfg(feature = "auto-mount")]
    schedule_auto_mount();
}

/// Mounts the widget with the given options object (or defaults).
///
/// Pages that call this themselves should build without the `auto-mount`
/// feature, otherwise the controls are bound twice.
#[wasm_bindgen]
pub fn mount(options: JsValue) -> Result<(), JsValue> {
    let options = WidgetOptions::from_js(options)?;
    mount_with(options)?;
    Ok(())
}

/// Resolves the controls, wires their listeners and keeps them for the page lifetime.
pub fn mount_with(options: WidgetOptions) -> MountResult<()> {
    let options = options.normalized();
    let window = web_sys::window().context(NoWindowSnafu { stage: "mount" })?;
    let document = window.document().context(NoDocumentSnafu { stage: "mount" })?;

    let view = DomView::resolve(&document, &options.elements)?;
    let backend = FetchBackend::new(window, options.chat.endpoints.clone());
    let dispatcher = Rc::new(Dispatcher::new(backend, view, options.chat));

    bind_controls(&dispatcher)?;
    log::info!(
        "chat widget mounted on '#{}' (chat endpoint {})",
        options.elements.messages,
        dispatcher.config().endpoints.chat_url()
    );
    Ok(())
}

#[cfg(feature = "auto-mount")]
fn schedule_auto_mount() {
    if let Err(error) = mount_when_ready() {
        log::error!("failed to schedule chat widget mount: {error}");
    }
}

#[cfg(feature = "auto-mount")]
fn mount_when_ready() -> MountResult<()> {
    let window = web_sys::window().context(NoWindowSnafu {
        stage: "mount-when-ready",
    })?;
    let document = window.document().context(NoDocumentSnafu {
        stage: "mount-when-ready",
    })?;

    let mount_default = |_: Event| {
        if let Err(error) = mount_with(WidgetOptions::default()) {
            log::error!("failed to mount chat widget: {error}");
        }
    };

    if document_is_loading(&document.ready_state()) {
        listen(&document, "DOMContentLoaded", mount_default)
    } else {
        mount_with(WidgetOptions::default())
    }
}

#[cfg(any(feature = "auto-mount", test))]
fn document_is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn bind_controls(dispatcher: &Rc<WidgetDispatcher>) -> MountResult<()> {
    let view = dispatcher.view();

    let on_send = Rc::clone(dispatcher);
    listen(view.send_button(), "click", move |event| {
        dispatch(&on_send, Trigger::SendClicked, &event);
    })?;

    let on_key = Rc::clone(dispatcher);
    listen(view.input(), "keydown", move |event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let trigger = Trigger::key_down(key_event.key(), key_event.shift_key());
        dispatch(&on_key, trigger, &event);
    })?;

    if let Some(attach_button) = view.attach_button() {
        let on_attach = Rc::clone(dispatcher);
        listen(attach_button, "click", move |event| {
            dispatch(&on_attach, Trigger::AttachClicked, &event);
        })?;
    }

    Ok(())
}

fn dispatch(dispatcher: &Rc<WidgetDispatcher>, trigger: Trigger, event: &Event) {
    if trigger.prevents_default() {
        event.prevent_default();
    }

    match trigger.action() {
        Some(Action::Submit) => {
            let dispatcher = Rc::clone(dispatcher);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = dispatcher.submit().await;
                log::debug!("submit finished: {outcome:?}");
            });
        }
        Some(Action::OpenFilePicker) => dispatcher.view().open_file_picker(),
        None => {}
    }
}

fn listen(
    target: &EventTarget,
    event_name: &str,
    handler: impl FnMut(Event) + 'static,
) -> MountResult<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
        .map_err(|error| {
            ListenerSnafu {
                stage: "add-event-listener",
                event: event_name,
                details: describe_js_error(&error),
            }
            .build()
        })?;
    // Listeners stay registered for the page lifetime.
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_loading_state_defers_the_mount() {
        assert!(document_is_loading("loading"));
        assert!(!document_is_loading("interactive"));
        assert!(!document_is_loading("complete"));
    }
}
