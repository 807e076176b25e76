use std::path::{Path, PathBuf};
use std::time::Duration;

use agrochat::{ChatConfig, Endpoints, FallbackTexts};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu, ensure};

/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Prefix for environment overrides, e.g. `AGROCHAT_ENDPOINTS__BASE_URL`.
pub const ENV_PREFIX: &str = "AGROCHAT_";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("settings file {} does not exist", path.display()))]
    MissingFile { stage: &'static str, path: PathBuf },
    #[snafu(display("failed to load settings ({origin}): {source}"))]
    Extract {
        stage: &'static str,
        origin: String,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Terminal client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub endpoints: Endpoints,
    pub texts: FallbackTexts,
    pub request_timeout_secs: u64,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default().with_base_url(DEFAULT_BASE_URL),
            texts: FallbackTexts::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl CliSettings {
    /// `<config dir>/agrochat/settings.json`, when the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("agrochat").join("settings.json"))
    }

    /// Layers defaults, the JSON file, `AGROCHAT_*` variables and the
    /// command-line base URL, later layers winning.
    ///
    /// An explicit `config_path` must exist; the default path is optional.
    pub fn load(config_path: Option<&Path>, base_url: Option<&str>) -> SettingsResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = match config_path {
            Some(path) => {
                ensure!(
                    path.is_file(),
                    MissingFileSnafu {
                        stage: "locate-settings-file",
                        path: path.to_path_buf(),
                    }
                );
                Some(path.to_path_buf())
            }
            None => Self::default_config_path().filter(|path| path.is_file()),
        };

        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "loading settings file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(base_url) = base_url {
            figment = figment.merge(Serialized::default("endpoints.base_url", base_url));
        }

        let origin = match &file {
            Some(path) => path.display().to_string(),
            None => "defaults and environment".to_string(),
        };
        let settings: Self = figment.extract().context(ExtractSnafu {
            stage: "extract-settings",
            origin,
        })?;

        Ok(settings.normalized())
    }

    pub fn normalized(self) -> Self {
        let chat = self.chat_config().normalized();
        Self {
            endpoints: chat.endpoints,
            texts: chat.texts,
            request_timeout_secs: if self.request_timeout_secs == 0 {
                DEFAULT_REQUEST_TIMEOUT_SECS
            } else {
                self.request_timeout_secs
            },
        }
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            endpoints: self.endpoints.clone(),
            texts: self.texts.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
