use agrochat::ChatConfig;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use wasm_bindgen::JsValue;

use crate::error::{InvalidOptionsSnafu, MountResult};

pub const DEFAULT_MESSAGES_ID: &str = "messages";
pub const DEFAULT_INPUT_ID: &str = "msg";
pub const DEFAULT_SEND_BUTTON_ID: &str = "sendBtn";
pub const DEFAULT_ATTACH_BUTTON_ID: &str = "attachBtn";
pub const DEFAULT_FILE_INPUT_ID: &str = "file-input";

/// DOM ids of the widget's controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub messages: String,
    pub input: String,
    pub send_button: String,
    pub attach_button: String,
    pub file_input: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES_ID.to_string(),
            input: DEFAULT_INPUT_ID.to_string(),
            send_button: DEFAULT_SEND_BUTTON_ID.to_string(),
            attach_button: DEFAULT_ATTACH_BUTTON_ID.to_string(),
            file_input: DEFAULT_FILE_INPUT_ID.to_string(),
        }
    }
}

impl ElementIds {
    pub fn normalized(self) -> Self {
        Self {
            messages: id_or_default(self.messages, DEFAULT_MESSAGES_ID),
            input: id_or_default(self.input, DEFAULT_INPUT_ID),
            send_button: id_or_default(self.send_button, DEFAULT_SEND_BUTTON_ID),
            attach_button: id_or_default(self.attach_button, DEFAULT_ATTACH_BUTTON_ID),
            file_input: id_or_default(self.file_input, DEFAULT_FILE_INPUT_ID),
        }
    }
}

/// Options accepted by `mount`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    #[serde(flatten)]
    pub chat: ChatConfig,
    pub elements: ElementIds,
}

impl WidgetOptions {
    /// Decodes a JS options object; `undefined` and `null` mean defaults.
    pub fn from_js(value: JsValue) -> MountResult<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }

        let options: Self = serde_wasm_bindgen::from_value(value).context(InvalidOptionsSnafu {
            stage: "decode-widget-options",
        })?;
        Ok(options.normalized())
    }

    pub fn normalized(self) -> Self {
        Self {
            chat: self.chat.normalized(),
            elements: self.elements.normalized(),
        }
    }
}

fn id_or_default(id: String, default: &str) -> String {
    let id = id.trim().trim_start_matches('#');
    if id.is_empty() {
        default.to_string()
    } else {
        id.to_string()
    }
}
