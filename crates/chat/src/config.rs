use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
pub const DEFAULT_ANALYZE_PATH: &str = "/api/file-analyze";

pub const DEFAULT_NO_RESPONSE_TEXT: &str = "No response received.";
pub const DEFAULT_ANALYSIS_FAILED_TEXT: &str = "Could not analyze file.";
pub const DEFAULT_CONNECTION_ERROR_TEXT: &str = "⚠️ Error connecting to server.";
pub const DEFAULT_FILE_NOTICE_PREFIX: &str = "📎 Sent file: ";

/// Where the two backend endpoints live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Origin prefix; empty means same origin as the page.
    pub base_url: String,
    pub chat_path: String,
    pub analyze_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
        }
    }
}

impl Endpoints {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    pub fn analyze_url(&self) -> String {
        join_url(&self.base_url, &self.analyze_path)
    }

    pub fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self.chat_path = normalize_path(&self.chat_path, DEFAULT_CHAT_PATH);
        self.analyze_path = normalize_path(&self.analyze_path, DEFAULT_ANALYZE_PATH);
        self
    }
}

/// Fixed user-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackTexts {
    pub no_response: String,
    pub analysis_failed: String,
    pub connection_error: String,
    pub file_notice_prefix: String,
}

impl Default for FallbackTexts {
    fn default() -> Self {
        Self {
            no_response: DEFAULT_NO_RESPONSE_TEXT.to_string(),
            analysis_failed: DEFAULT_ANALYSIS_FAILED_TEXT.to_string(),
            connection_error: DEFAULT_CONNECTION_ERROR_TEXT.to_string(),
            file_notice_prefix: DEFAULT_FILE_NOTICE_PREFIX.to_string(),
        }
    }
}

impl FallbackTexts {
    /// User bubble text for an attachment submit.
    pub fn file_notice(&self, file_name: &str) -> String {
        format!("{}{}", self.file_notice_prefix, file_name)
    }

    pub fn normalized(self) -> Self {
        Self {
            no_response: or_default(self.no_response, DEFAULT_NO_RESPONSE_TEXT),
            analysis_failed: or_default(self.analysis_failed, DEFAULT_ANALYSIS_FAILED_TEXT),
            connection_error: or_default(self.connection_error, DEFAULT_CONNECTION_ERROR_TEXT),
            // Trailing space separates the prefix from the name, so only blank prefixes reset.
            file_notice_prefix: if self.file_notice_prefix.trim().is_empty() {
                DEFAULT_FILE_NOTICE_PREFIX.to_string()
            } else {
                self.file_notice_prefix
            },
        }
    }
}

/// Configuration shared by every front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoints: Endpoints,
    pub texts: FallbackTexts,
}

impl ChatConfig {
    pub fn normalized(self) -> Self {
        Self {
            endpoints: self.endpoints.normalized(),
            texts: self.texts.normalized(),
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn normalize_path(path: &str, default: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        default.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn or_default(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_same_origin_api() {
        let config = ChatConfig::default();
        assert_eq!(config.endpoints.chat_url(), "/api/chat");
        assert_eq!(config.endpoints.analyze_url(), "/api/file-analyze");
        assert_eq!(config.texts.file_notice("report.pdf"), "📎 Sent file: report.pdf");
    }

    #[test]
    fn base_url_is_joined_without_double_slash() {
        let endpoints = Endpoints::default()
            .with_base_url("http://127.0.0.1:5000/")
            .normalized();
        assert_eq!(endpoints.chat_url(), "http://127.0.0.1:5000/api/chat");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: ChatConfig =
            serde_json::from_str(r#"{"texts":{"no_response":"Nothing yet"}}"#).unwrap();
        assert_eq!(config.texts.no_response, "Nothing yet");
        assert_eq!(config.texts.analysis_failed, DEFAULT_ANALYSIS_FAILED_TEXT);
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn normalization_repairs_blank_and_relative_values() {
        let config = ChatConfig {
            endpoints: Endpoints {
                base_url: "  https://agro.example/ ".to_string(),
                chat_path: "chat".to_string(),
                analyze_path: " ".to_string(),
            },
            texts: FallbackTexts {
                connection_error: "   ".to_string(),
                ..FallbackTexts::default()
            },
        }
        .normalized();

        assert_eq!(config.endpoints.chat_url(), "https://agro.example/chat");
        assert_eq!(
            config.endpoints.analyze_url(),
            "https://agro.example/api/file-analyze"
        );
        assert_eq!(config.texts.connection_error, DEFAULT_CONNECTION_ERROR_TEXT);
    }
}
