use agrochat::{Attachment, ChatView, Message};
use snafu::OptionExt;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, EventTarget, File, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use crate::error::{MissingElementSnafu, MountResult, WrongElementKindSnafu, describe_js_error};
use crate::options::ElementIds;

/// A file picked through the hidden file input.
#[derive(Debug, Clone)]
pub struct SelectedFile(pub File);

impl Attachment for SelectedFile {
    fn file_name(&self) -> String {
        self.0.name()
    }
}

/// The text field can be a single-line input or a textarea.
enum TextField {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl TextField {
    fn value(&self) -> String {
        match self {
            Self::Input(input) => input.value(),
            Self::TextArea(area) => area.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Self::Input(input) => input.set_value(value),
            Self::TextArea(area) => area.set_value(value),
        }
    }

    fn element(&self) -> &HtmlElement {
        match self {
            Self::Input(input) => &**input,
            Self::TextArea(area) => &**area,
        }
    }
}

/// Transcript and controls resolved from the page.
pub struct DomView {
    document: Document,
    messages: Element,
    input: TextField,
    send_button: HtmlButtonElement,
    attach_button: Option<HtmlElement>,
    file_input: Option<HtmlInputElement>,
}

impl DomView {
    /// Looks up every control by id. The attach button and file input are
    /// optional; without them the widget only sends text.
    pub fn resolve(document: &Document, ids: &ElementIds) -> MountResult<Self> {
        let messages = lookup(document, &ids.messages, "message list")?;
        let input = resolve_text_field(document, &ids.input)?;
        let send_button = required::<HtmlButtonElement>(document, &ids.send_button, "send button")?;
        let attach_button = optional::<HtmlElement>(document, &ids.attach_button, "attach button");
        let file_input = optional::<HtmlInputElement>(document, &ids.file_input, "file input");

        Ok(Self {
            document: document.clone(),
            messages,
            input,
            send_button,
            attach_button,
            file_input,
        })
    }

    pub fn send_button(&self) -> &EventTarget {
        &self.send_button
    }

    pub fn input(&self) -> &EventTarget {
        self.input.element()
    }

    pub fn attach_button(&self) -> Option<&EventTarget> {
        self.attach_button
            .as_ref()
            .map(|button| AsRef::<EventTarget>::as_ref(button))
    }

    /// Opens the native file picker.
    pub fn open_file_picker(&self) {
        match &self.file_input {
            Some(file_input) => file_input.click(),
            None => log::warn!("attach requested but the page has no file input"),
        }
    }

    fn try_append_bubble(&self, message: &Message) -> Result<(), JsValue> {
        let row = self.document.create_element("div")?;
        row.set_class_name(message.sender.css_class());

        let bubble = self.document.create_element("div")?;
        bubble.set_class_name("bubble");
        bubble.set_text_content(Some(&message.text));

        row.append_child(&bubble)?;
        self.messages.append_child(&row)?;
        Ok(())
    }
}

impl ChatView for DomView {
    type Attachment = SelectedFile;

    fn append_bubble(&self, message: &Message) {
        if let Err(error) = self.try_append_bubble(message) {
            log::error!("failed to render chat bubble: {}", describe_js_error(&error));
        }
    }

    fn scroll_to_latest(&self) {
        self.messages.set_scroll_top(self.messages.scroll_height());
    }

    fn input_text(&self) -> String {
        self.input.value()
    }

    fn clear_input(&self) {
        self.input.set_value("");
    }

    fn focus_input(&self) {
        if let Err(error) = self.input.element().focus() {
            log::debug!("could not focus chat input: {}", describe_js_error(&error));
        }
    }

    fn selected_attachment(&self) -> Option<SelectedFile> {
        self.file_input
            .as_ref()?
            .files()?
            .get(0)
            .map(SelectedFile)
    }

    fn clear_attachment(&self) {
        if let Some(file_input) = &self.file_input {
            file_input.set_value("");
        }
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.send_button.set_disabled(!enabled);
    }
}

fn lookup(document: &Document, id: &str, role: &'static str) -> MountResult<Element> {
    document.get_element_by_id(id).context(MissingElementSnafu {
        stage: "resolve-elements",
        role,
        id,
    })
}

fn required<T: JsCast>(document: &Document, id: &str, role: &'static str) -> MountResult<T> {
    lookup(document, id, role)?.dyn_into::<T>().map_err(|_| {
        WrongElementKindSnafu {
            stage: "resolve-elements",
            role,
            id,
        }
        .build()
    })
}

fn optional<T: JsCast>(document: &Document, id: &str, role: &'static str) -> Option<T> {
    let Some(element) = document.get_element_by_id(id) else {
        log::warn!("optional {role} '#{id}' not found; attachments are disabled");
        return None;
    };
    match element.dyn_into::<T>() {
        Ok(element) => Some(element),
        Err(_) => {
            log::warn!("element '#{id}' cannot be used as the {role}; ignoring it");
            None
        }
    }
}

fn resolve_text_field(document: &Document, id: &str) -> MountResult<TextField> {
    let element = lookup(document, id, "text input")?;
    let element = match element.dyn_into::<HtmlInputElement>() {
        Ok(input) => return Ok(TextField::Input(input)),
        Err(element) => element,
    };
    match element.dyn_into::<HtmlTextAreaElement>() {
        Ok(area) => Ok(TextField::TextArea(area)),
        Err(_) => WrongElementKindSnafu {
            stage: "resolve-elements",
            role: "text input",
            id,
        }
        .fail(),
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::*;
    use web_sys::DataTransfer;

    use super::*;
    use crate::error::MountError;

    wasm_bindgen_test_configure!(run_in_browser);

    const FULL_PAGE: &str = r#"
        <div id="{p}-messages"></div>
        <input id="{p}-msg">
        <button id="{p}-send">Send</button>
        <button id="{p}-attach">Attach</button>
        <input type="file" id="{p}-file" hidden>
    "#;

    const TEXT_ONLY_PAGE: &str = r#"
        <div id="{p}-messages"></div>
        <textarea id="{p}-msg"></textarea>
        <button id="{p}-send">Send</button>
    "#;

    /// Page fragment mounted under `<body>` for one test; ids carry a prefix.
    struct Page {
        root: Element,
        ids: ElementIds,
    }

    impl Page {
        fn mount(prefix: &str, markup: &str) -> Self {
            let document = document();
            let root = document.create_element("div").unwrap();
            root.set_inner_html(&markup.replace("{p}", prefix));
            document.body().unwrap().append_child(&root).unwrap();

            let ids = ElementIds {
                messages: format!("{prefix}-messages"),
                input: format!("{prefix}-msg"),
                send_button: format!("{prefix}-send"),
                attach_button: format!("{prefix}-attach"),
                file_input: format!("{prefix}-file"),
            };
            Self { root, ids }
        }

        fn view(&self) -> MountResult<DomView> {
            DomView::resolve(&document(), &self.ids)
        }
    }

    impl Drop for Page {
        fn drop(&mut self) {
            self.root.remove();
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    #[wasm_bindgen_test]
    fn full_page_resolves_with_attachments() {
        let page = Page::mount("full", FULL_PAGE);
        let view = page.view().unwrap();

        assert!(view.attach_button().is_some());
        assert!(view.selected_attachment().is_none());
    }

    #[wasm_bindgen_test]
    fn missing_attach_controls_leave_a_text_only_view() {
        let page = Page::mount("text-only", TEXT_ONLY_PAGE);
        let view = page.view().unwrap();

        assert!(view.attach_button().is_none());
        assert!(view.selected_attachment().is_none());
        view.open_file_picker();
        view.clear_attachment();

        view.input.set_value("  hello ");
        assert_eq!(view.input_text(), "  hello ");
        view.clear_input();
        assert_eq!(view.input_text(), "");
    }

    #[wasm_bindgen_test]
    fn missing_required_control_fails_the_mount() {
        let page = Page::mount(
            "no-send",
            r#"<div id="no-send-messages"></div><input id="no-send-msg">"#,
        );

        let error = page.view().err().unwrap();
        assert!(matches!(
            error,
            MountError::MissingElement { role: "send button", .. }
        ));
        assert!(error.to_string().contains("#no-send-send"));
    }

    #[wasm_bindgen_test]
    fn send_control_of_the_wrong_kind_is_rejected() {
        let page = Page::mount(
            "bad-send",
            r#"<div id="bad-send-messages"></div><input id="bad-send-msg"><div id="bad-send-send"></div>"#,
        );

        assert!(matches!(
            page.view().err().unwrap(),
            MountError::WrongElementKind { role: "send button", .. }
        ));
    }

    #[wasm_bindgen_test]
    fn bubbles_are_nested_and_set_as_plain_text() {
        let page = Page::mount("bubbles", FULL_PAGE);
        let view = page.view().unwrap();

        view.append_bubble(&Message::user("<b>npk?</b>"));
        view.append_bubble(&Message::bot("10-10-10"));

        assert_eq!(view.messages.child_element_count(), 2);
        let row = view.messages.first_element_child().unwrap();
        assert_eq!(row.class_name(), "message user");
        let bubble = row.first_element_child().unwrap();
        assert_eq!(bubble.class_name(), "bubble");
        assert_eq!(bubble.text_content().unwrap(), "<b>npk?</b>");
        assert_eq!(bubble.child_element_count(), 0);

        let last = view.messages.last_element_child().unwrap();
        assert_eq!(last.class_name(), "message bot");
    }

    #[wasm_bindgen_test]
    fn clearing_the_attachment_empties_the_file_input() {
        let page = Page::mount("files", FULL_PAGE);
        let view = page.view().unwrap();

        let parts = js_sys::Array::of1(&JsValue::from_str("jpeg bytes"));
        let file = File::new_with_str_sequence(&parts, "leaf.jpg").unwrap();
        let transfer = DataTransfer::new().unwrap();
        transfer.items().add_with_file(&file).unwrap();
        let file_input = view.file_input.as_ref().unwrap();
        file_input.set_files(transfer.files().as_ref());

        let selected = view.selected_attachment().map(|file| file.file_name());
        assert_eq!(selected.as_deref(), Some("leaf.jpg"));

        view.clear_attachment();
        assert!(view.selected_attachment().is_none());
    }

    #[wasm_bindgen_test]
    fn send_control_toggles_disabled() {
        let page = Page::mount("toggle", FULL_PAGE);
        let view = page.view().unwrap();

        view.set_send_enabled(false);
        assert!(view.send_button.disabled());
        view.set_send_enabled(true);
        assert!(!view.send_button.disabled());
    }
}
