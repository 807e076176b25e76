use serde_json::Value;
use snafu::ResultExt;

use crate::error::{DecodeSnafu, RequestResult};

/// JSON body returned by both endpoints.
///
/// Fields are kept as raw values so an unexpected type degrades to the
/// fallback text instead of failing the whole reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyBody {
    response: Option<Value>,
    error: Option<Value>,
}

impl ReplyBody {
    pub fn new(response: Option<&str>, error: Option<&str>) -> Self {
        Self {
            response: response.map(|text| Value::String(text.to_string())),
            error: error.map(|text| Value::String(text.to_string())),
        }
    }

    /// Decodes a raw response body received from `endpoint`.
    ///
    /// Only a body that is not JSON at all is an error. Any JSON value other
    /// than an object carries no fields and decodes to an empty reply.
    pub fn decode(endpoint: &str, body: &str) -> RequestResult<Self> {
        let value: Value = serde_json::from_str(body).context(DecodeSnafu {
            stage: "decode-reply",
            endpoint: endpoint.to_string(),
        })?;

        let Value::Object(mut fields) = value else {
            return Ok(Self::default());
        };
        Ok(Self {
            response: fields.remove("response"),
            error: fields.remove("error"),
        })
    }

    pub fn response(&self) -> Option<&str> {
        non_empty_text(self.response.as_ref())
    }

    pub fn error(&self) -> Option<&str> {
        non_empty_text(self.error.as_ref())
    }

    /// Text shown for a chat reply.
    pub fn chat_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.response().unwrap_or(fallback)
    }

    /// Text shown for a file analysis reply; the server's error wins over the fallback.
    pub fn analysis_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.response().or_else(|| self.error()).unwrap_or(fallback)
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    }
}
