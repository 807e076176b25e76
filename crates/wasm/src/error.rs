use snafu::Snafu;
use wasm_bindgen::JsValue;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MountError {
    #[snafu(display("no global window is available"))]
    NoWindow { stage: &'static str },
    #[snafu(display("window has no document"))]
    NoDocument { stage: &'static str },
    #[snafu(display("required {role} element '#{id}' was not found"))]
    MissingElement {
        stage: &'static str,
        role: &'static str,
        id: String,
    },
    #[snafu(display("element '#{id}' cannot be used as the {role}"))]
    WrongElementKind {
        stage: &'static str,
        role: &'static str,
        id: String,
    },
    #[snafu(display("invalid widget options"))]
    InvalidOptions {
        stage: &'static str,
        source: serde_wasm_bindgen::Error,
    },
    #[snafu(display("failed to register '{event}' listener: {details}"))]
    Listener {
        stage: &'static str,
        event: String,
        details: String,
    },
}

pub type MountResult<T> = Result<T, MountError>;

impl From<MountError> for JsValue {
    fn from(error: MountError) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}

/// Best-effort readable text for a thrown JS value.
pub(crate) fn describe_js_error(value: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
